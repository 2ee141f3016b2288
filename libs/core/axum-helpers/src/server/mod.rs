//! Server infrastructure module.
//!
//! This module provides:
//! - Router assembly with OpenAPI documentation and middleware
//! - Health and readiness helpers
//! - Graceful shutdown coordination
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes.merge(health_router()), &config.server)?;
//! create_production_app(router, &config.server, async { /* close pools */ }).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router, serve, with_middleware};
pub use health::{HealthCheckFuture, health_router, run_health_checks};
pub use shutdown::ShutdownCoordinator;
