//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Page, Product, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Input is validated here before any repository call; repository errors
/// are returned unchanged.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

fn require_id(id: &str) -> ProductResult<()> {
    if id.trim().is_empty() {
        return Err(ProductError::Validation("id must not be empty".to_string()));
    }
    Ok(())
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate, assign a new id and persist
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;

        let product = Product::new(input);
        self.repository.save(&product).await?;

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> ProductResult<Product> {
        require_id(id)?;
        self.repository.find_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, page: Page) -> ProductResult<Vec<Product>> {
        self.repository.find_all(page).await
    }

    /// Replace name, price and stock of an existing product.
    ///
    /// The path id wins; a non-empty `idProduct` that differs is rejected.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        require_id(id)?;
        input.validate()?;

        if let Some(body_id) = input.body_id() {
            if body_id != id {
                return Err(ProductError::Validation(format!(
                    "idProduct '{}' does not match path id '{}'",
                    body_id, id
                )));
            }
        }

        let product = self.repository.update(id, input.into()).await?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> ProductResult<()> {
        require_id(id)?;

        // Surface NotFound before attempting the delete
        self.repository.find_by_id(id).await?;
        self.repository.delete_by_id(id).await?;

        tracing::info!(product_id = %id, "Deleted product");
        Ok(())
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
