//! Application state management

use domain_products::InMemoryProductRepository;
use sea_orm::DatabaseConnection;
use tracing::{error, info};

/// Backing store chosen at startup
#[derive(Clone)]
pub enum Store {
    Memory(InMemoryProductRepository),
    Postgres(DatabaseConnection),
}

impl Store {
    /// Release connections during shutdown
    pub async fn close(self) {
        match self {
            Store::Memory(_) => info!("In-memory store dropped"),
            Store::Postgres(db) => match db.close().await {
                Ok(()) => info!("PostgreSQL connection pool closed"),
                Err(e) => error!("Error closing PostgreSQL connection pool: {}", e),
            },
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub store: Store,
}
