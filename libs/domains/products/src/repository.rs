use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{Page, Product, ProductChanges};

/// Repository trait for Product persistence
///
/// Implementations list in id-ascending order and report a missing id as
/// [`ProductError::NotFound`]; every other failure is [`ProductError::Storage`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert or overwrite the product with this id
    async fn save(&self, product: &Product) -> ProductResult<()>;

    /// One page of products ordered by id
    async fn find_all(&self, page: Page) -> ProductResult<Vec<Product>>;

    async fn find_by_id(&self, id: &str) -> ProductResult<Product>;

    async fn delete_by_id(&self, id: &str) -> ProductResult<()>;

    /// Atomically overlay `changes` onto the stored product and return it
    async fn update(&self, id: &str, changes: ProductChanges) -> ProductResult<Product>;
}

/// In-memory implementation of ProductRepository
///
/// Clones share the same map.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<String, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn save(&self, product: &Product) -> ProductResult<()> {
        let mut products = self.products.write().await;
        products.insert(product.id.clone(), product.clone());

        tracing::debug!(product_id = %product.id, "Saved product");
        Ok(())
    }

    async fn find_all(&self, page: Page) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products.values().cloned().collect();
        result.sort_by(|a, b| a.id.cmp(&b.id));

        let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);

        Ok(result.into_iter().skip(offset).take(limit).collect())
    }

    async fn find_by_id(&self, id: &str) -> ProductResult<Product> {
        let products = self.products.read().await;
        products
            .get(id)
            .cloned()
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    async fn delete_by_id(&self, id: &str) -> ProductResult<()> {
        let mut products = self.products.write().await;

        if products.remove(id).is_some() {
            tracing::debug!(product_id = %id, "Deleted product");
            Ok(())
        } else {
            Err(ProductError::NotFound(id.to_string()))
        }
    }

    async fn update(&self, id: &str, changes: ProductChanges) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        let product = products
            .get_mut(id)
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;
        product.apply_changes(changes);

        tracing::debug!(product_id = %id, "Updated product");
        Ok(product.clone())
    }
}
