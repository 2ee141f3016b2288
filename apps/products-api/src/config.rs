//! Configuration for Products API

use core_config::{app_info, env_parse_or_default, server::ServerConfig, AppInfo, FromEnv};
use database::postgres::PostgresConfig;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Which repository backs the service
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreKind {
    Memory,
    #[default]
    Postgres,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub store: StoreKind,
    pub database: PostgresConfig,
    pub environment: Environment,
}

impl Config {
    /// Reads `PRODUCTS_STORE` (`memory` or `postgres`, default `postgres`)
    /// plus the server and database variables.
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let database = PostgresConfig::from_env()?;

        let store: StoreKind =
            env_parse_or_default("PRODUCTS_STORE", &StoreKind::default().to_string())?;

        Ok(Self {
            app: app_info!(),
            server,
            store,
            database,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::ConfigError;

    #[test]
    fn test_defaults() {
        temp_env::with_vars_unset(
            ["PRODUCTS_STORE", "PORT", "DATABASE_URL", "APP_ENV"],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.store, StoreKind::Postgres);
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.app.name, "products_api");
                assert!(config.environment.is_development());
            },
        );
    }

    #[test]
    fn test_memory_store_any_case() {
        temp_env::with_var("PRODUCTS_STORE", Some("Memory"), || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.store, StoreKind::Memory);
        });
    }

    #[test]
    fn test_unknown_store_is_rejected() {
        temp_env::with_var("PRODUCTS_STORE", Some("mongodb"), || {
            let err = Config::from_env().unwrap_err();
            match err.downcast_ref::<ConfigError>() {
                Some(ConfigError::ParseError { key, .. }) => assert_eq!(key, "PRODUCTS_STORE"),
                other => panic!("expected ParseError, got {:?}", other),
            }
        });
    }

    #[test]
    fn test_bad_port_is_rejected() {
        temp_env::with_var("PORT", Some("not-a-port"), || {
            assert!(Config::from_env().is_err());
        });
    }
}
