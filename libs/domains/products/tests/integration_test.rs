//! Integration tests for Products domain
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - The upsert and paging queries behave as expected
//! - Missing rows surface as NotFound
//! - Updates are applied inside a transaction

use domain_products::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

async fn repository(db: &TestDatabase) -> PgProductRepository {
    let repo = PgProductRepository::new(db.connection());
    repo.ensure_schema().await.unwrap();
    repo
}

fn product(builder: &TestDataBuilder, n: u16, price: f64) -> Product {
    Product {
        id: builder.product_id(n),
        name: builder.name("product", &n.to_string()),
        price,
        stock: i32::from(n),
    }
}

#[tokio::test]
async fn test_save_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = repository(&db).await;
    let builder = TestDataBuilder::from_test_name("save_and_find");

    let input = product(&builder, 1, 19.99);
    repo.save(&input).await.unwrap();

    let found = repo.find_by_id(&input.id).await.unwrap();
    assert_eq!(found.id, input.id);
    assert_eq!(found.name, input.name);
    assert_price_eq(found.price, 19.99, "stored price");
    assert_eq!(found.stock, 1);
}

#[tokio::test]
async fn test_ensure_schema_is_idempotent() {
    let db = TestDatabase::new().await;
    let repo = repository(&db).await;

    repo.ensure_schema().await.unwrap();
}

#[tokio::test]
async fn test_save_upserts_existing_id() {
    let db = TestDatabase::new().await;
    let repo = repository(&db).await;
    let builder = TestDataBuilder::from_test_name("upsert");

    let mut input = product(&builder, 1, 10.0);
    repo.save(&input).await.unwrap();

    // Same values again is a no-op, not an error
    repo.save(&input).await.unwrap();

    input.name = "renamed".to_string();
    input.price = 12.5;
    repo.save(&input).await.unwrap();

    let found = repo.find_by_id(&input.id).await.unwrap();
    assert_eq!(found.name, "renamed");
    assert_price_eq(found.price, 12.5, "upserted price");
    assert_eq!(repo.find_all(Page::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_find_all_pages_by_id() {
    let db = TestDatabase::new().await;
    let repo = repository(&db).await;
    let builder = TestDataBuilder::from_test_name("paging");

    // Insert out of order
    for n in [3, 0, 4, 1, 2] {
        repo.save(&product(&builder, n, 1.0)).await.unwrap();
    }

    let first = repo.find_all(Page::new(2, 0)).await.unwrap();
    let ids: Vec<String> = first.into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![builder.product_id(0), builder.product_id(1)]);

    let tail = repo.find_all(Page::new(2, 4)).await.unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].id, builder.product_id(4));

    // limit=0 from a query string falls back to the default page size
    let defaulted = repo
        .find_all(Page::from_query(Some("0"), None))
        .await
        .unwrap();
    assert_eq!(defaulted.len(), 5);
}

#[tokio::test]
async fn test_missing_rows_are_not_found() {
    let db = TestDatabase::new().await;
    let repo = repository(&db).await;

    assert!(matches!(
        repo.find_by_id("missing").await,
        Err(ProductError::NotFound(_))
    ));
    assert!(matches!(
        repo.delete_by_id("missing").await,
        Err(ProductError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_twice() {
    let db = TestDatabase::new().await;
    let repo = repository(&db).await;
    let builder = TestDataBuilder::from_test_name("delete_twice");

    let input = product(&builder, 1, 3.0);
    repo.save(&input).await.unwrap();

    repo.delete_by_id(&input.id).await.unwrap();
    assert!(matches!(
        repo.delete_by_id(&input.id).await,
        Err(ProductError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_update_in_transaction() {
    let db = TestDatabase::new().await;
    let repo = repository(&db).await;
    let builder = TestDataBuilder::from_test_name("update");

    let input = product(&builder, 1, 3.0);
    repo.save(&input).await.unwrap();

    let updated = repo
        .update(
            &input.id,
            ProductChanges {
                name: "updated".to_string(),
                price: 4.25,
                stock: 40,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, input.id);
    assert_eq!(updated.name, "updated");

    let found = repo.find_by_id(&input.id).await.unwrap();
    assert_price_eq(found.price, 4.25, "updated price");
    assert_eq!(found.stock, 40);

    assert!(matches!(
        repo.update(
            "missing",
            ProductChanges {
                name: "x".to_string(),
                price: 1.0,
                stock: 0,
            },
        )
        .await,
        Err(ProductError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_service_over_postgres() {
    let db = TestDatabase::new().await;
    let service = ProductService::new(repository(&db).await);

    let created = service
        .create_product(CreateProduct {
            name: "Moka pot".to_string(),
            price: 35.0,
            stock: 8,
        })
        .await
        .unwrap();

    let fetched = assert_some(
        service
            .list_products(Page::default())
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.id == created.id),
        "created product should be listed",
    );
    assert_eq!(fetched, created);

    service.delete_product(&created.id).await.unwrap();
    assert!(matches!(
        service.get_product(&created.id).await,
        Err(ProductError::NotFound(_))
    ));
}
