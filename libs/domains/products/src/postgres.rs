use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, QueryOrder,
    QuerySelect, Statement, TransactionTrait,
};
use std::future::Future;
use std::time::Duration;

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{Page, Product, ProductChanges},
    repository::ProductRepository,
};

/// Ceiling for a single repository call, including pool acquisition
pub const OPERATION_TIMEOUT: Duration = Duration::from_secs(3);

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id    TEXT PRIMARY KEY,
        name  TEXT NOT NULL,
        price DOUBLE PRECISION NOT NULL,
        stock INTEGER NOT NULL
    )
"#;

// The WHERE clause skips the write when nothing changed.
const UPSERT_SQL: &str = r#"
    INSERT INTO products (id, name, price, stock)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (id) DO UPDATE
    SET name = EXCLUDED.name, price = EXCLUDED.price, stock = EXCLUDED.stock
    WHERE products.name IS DISTINCT FROM EXCLUDED.name
       OR products.price IS DISTINCT FROM EXCLUDED.price
       OR products.stock IS DISTINCT FROM EXCLUDED.stock
"#;

/// PostgreSQL implementation of ProductRepository using SeaORM
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            timeout: OPERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create the products table if it does not exist yet
    pub async fn ensure_schema(&self) -> ProductResult<()> {
        self.bounded("ensure_schema", async {
            self.db.execute_unprepared(CREATE_TABLE_SQL).await?;
            Ok(())
        })
        .await?;

        tracing::info!("Products table ready");
        Ok(())
    }

    /// Runs `op` under the per-call timeout; expiry is a storage failure.
    async fn bounded<T, F>(&self, operation: &'static str, op: F) -> ProductResult<T>
    where
        F: Future<Output = ProductResult<T>>,
    {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, timeout = ?self.timeout, "Database call timed out");
                Err(ProductError::Storage(format!(
                    "{} timed out after {:?}",
                    operation, self.timeout
                )))
            }
        }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn save(&self, product: &Product) -> ProductResult<()> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            UPSERT_SQL,
            [
                product.id.clone().into(),
                product.name.clone().into(),
                product.price.into(),
                product.stock.into(),
            ],
        );

        let result = self
            .bounded("save", async { Ok(self.db.execute_raw(stmt).await?) })
            .await?;

        tracing::debug!(
            product_id = %product.id,
            rows_affected = result.rows_affected(),
            "Upserted product"
        );
        Ok(())
    }

    async fn find_all(&self, page: Page) -> ProductResult<Vec<Product>> {
        let models = self
            .bounded("find_all", async {
                Ok(entity::Entity::find()
                    .order_by_asc(entity::Column::Id)
                    .limit(page.limit)
                    .offset(page.offset)
                    .all(&self.db)
                    .await?)
            })
            .await?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> ProductResult<Product> {
        let model = self
            .bounded("find_by_id", async {
                Ok(entity::Entity::find_by_id(id.to_string())
                    .one(&self.db)
                    .await?)
            })
            .await?;

        model
            .map(Product::from)
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    async fn delete_by_id(&self, id: &str) -> ProductResult<()> {
        let result = self
            .bounded("delete_by_id", async {
                Ok(entity::Entity::delete_by_id(id.to_string())
                    .exec(&self.db)
                    .await?)
            })
            .await?;

        if result.rows_affected == 0 {
            return Err(ProductError::NotFound(id.to_string()));
        }

        tracing::debug!(product_id = %id, "Deleted product");
        Ok(())
    }

    async fn update(&self, id: &str, changes: ProductChanges) -> ProductResult<Product> {
        self.bounded("update", async {
            let txn = self.db.begin().await?;

            let current = entity::Entity::find_by_id(id.to_string())
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or_else(|| ProductError::NotFound(id.to_string()))?;

            let mut product = Product::from(current);
            product.apply_changes(changes);

            let active_model: entity::ActiveModel = product.into();
            let updated = active_model.update(&txn).await?;
            txn.commit().await?;

            tracing::debug!(product_id = %id, "Updated product");
            Ok(Product::from(updated))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn model(id: &str, name: &str) -> entity::Model {
        entity::Model {
            id: id.to_string(),
            name: name.to_string(),
            price: 5.0,
            stock: 2,
        }
    }

    #[tokio::test]
    async fn test_stalled_call_times_out_as_storage_failure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgProductRepository::new(db).with_timeout(Duration::from_millis(10));

        let result = repo
            .bounded("find_all", std::future::pending::<ProductResult<()>>())
            .await;

        assert!(matches!(result, Err(ProductError::Storage(msg)) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn test_find_by_id_without_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let result = repo.find_by_id("missing").await;
        assert!(matches!(result, Err(ProductError::NotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_driver_error_is_storage_failure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let result = repo.find_by_id("any").await;
        assert!(matches!(result, Err(ProductError::Storage(msg)) if msg.contains("connection reset")));
    }

    #[tokio::test]
    async fn test_find_all_maps_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("a", "Mug"), model("b", "Cup")]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let products = repo.find_all(Page::new(2, 0)).await.unwrap();
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[tokio::test]
    async fn test_delete_without_rows_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert!(matches!(
            repo.delete_by_id("gone").await,
            Err(ProductError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_save_succeeds() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let product = Product::from(model("a", "Mug"));
        assert!(repo.save(&product).await.is_ok());
    }

    #[tokio::test]
    async fn test_save_reports_driver_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("disk full".to_string())])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let product = Product::from(model("a", "Mug"));
        assert!(matches!(
            repo.save(&product).await,
            Err(ProductError::Storage(_))
        ));
    }
}
