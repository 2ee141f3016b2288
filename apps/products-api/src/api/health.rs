//! Health check endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_helpers::{health_router, run_health_checks, HealthCheckFuture};
use serde_json::Value;

use crate::state::{AppState, Store};

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let mut checks: Vec<(&str, HealthCheckFuture)> = Vec::new();

    if let Store::Postgres(db) = &state.store {
        checks.push((
            "database",
            Box::pin(async move {
                database::postgres::check_health(db)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ));
    }

    run_health_checks(state.config.app, checks).await
}

/// `/health` (liveness) and `/ready` (store reachability)
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(state)
        .merge(health_router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment, StoreKind};
    use axum::body::Body;
    use axum::http::Request;
    use core_config::{app_info, server::ServerConfig};
    use database::postgres::PostgresConfig;
    use domain_products::InMemoryProductRepository;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn memory_state() -> AppState {
        AppState {
            config: Config {
                app: app_info!(),
                server: ServerConfig::default(),
                store: StoreKind::Memory,
                database: PostgresConfig::default(),
                environment: Environment::Development,
            },
            store: Store::Memory(InMemoryProductRepository::new()),
        }
    }

    #[tokio::test]
    async fn test_memory_store_is_ready() {
        let response = router(memory_state())
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ready");
        assert_eq!(body["service"], "products_api");
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let response = router(memory_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
