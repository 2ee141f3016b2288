//! Products API routes

use axum::Router;
use domain_products::{handlers, PgProductRepository, ProductService};

use crate::state::{AppState, Store};

/// Create products router for the configured store
pub fn router(state: &AppState) -> Router {
    match &state.store {
        Store::Memory(repository) => handlers::router(ProductService::new(repository.clone())),
        Store::Postgres(db) => {
            handlers::router(ProductService::new(PgProductRepository::new(db.clone())))
        }
    }
}
