//! Products API - product catalog REST server

use axum_helpers::server::{create_production_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::connect_from_config_with_retry;
use domain_products::{InMemoryProductRepository, PgProductRepository};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StoreKind};
use state::{AppState, Store};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        store = %config.store,
        "Starting {} v{}",
        config.app.name,
        config.app.version
    );

    let store = match config.store {
        StoreKind::Memory => Store::Memory(InMemoryProductRepository::new()),
        StoreKind::Postgres => {
            let db = connect_from_config_with_retry(config.database.clone(), None).await?;
            PgProductRepository::new(db.clone()).ensure_schema().await?;
            Store::Postgres(db)
        }
    };

    let state = AppState {
        config: config.clone(),
        store,
    };

    let router = create_router::<openapi::ApiDoc>(api::routes(&state), &config.server)?;

    create_production_app(router, &config.server, async move {
        info!("Shutting down: releasing {} store", state.config.store);
        state.store.close().await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
