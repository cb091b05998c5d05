//! Configuration for the Catalog API

use core_config::{app_info, env_or_default, server::ServerConfig, AppInfo, FromEnv};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Storage backend selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatabaseBackend {
    /// In-memory concurrent map, seeded with sample data
    Memory,
    /// MongoDB document store
    MongoDb,
}

impl DatabaseBackend {
    /// Reads `DATABASE_BACKEND`; anything other than `mongodb` means memory.
    pub fn from_env() -> Self {
        match env_or_default("DATABASE_BACKEND", "memory").to_lowercase().as_str() {
            "mongodb" | "mongo" => DatabaseBackend::MongoDb,
            _ => DatabaseBackend::Memory,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub backend: DatabaseBackend,
    /// Present only when the mongodb backend is selected
    pub mongodb: Option<MongoConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let backend = DatabaseBackend::from_env();

        let mongodb = match backend {
            DatabaseBackend::MongoDb => Some(MongoConfig::from_env()?),
            DatabaseBackend::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            backend,
            mongodb,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_defaults_to_memory() {
        temp_env::with_var_unset("DATABASE_BACKEND", || {
            assert_eq!(DatabaseBackend::from_env(), DatabaseBackend::Memory);
        });
    }

    #[test]
    fn test_backend_mongodb_case_insensitive() {
        temp_env::with_var("DATABASE_BACKEND", Some("MongoDB"), || {
            assert_eq!(DatabaseBackend::from_env(), DatabaseBackend::MongoDb);
        });
    }

    #[test]
    fn test_config_memory_backend_skips_mongo_vars() {
        temp_env::with_vars(
            [
                ("DATABASE_BACKEND", Some("memory")),
                ("MONGO_URI", None::<&str>),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.backend, DatabaseBackend::Memory);
                assert!(config.mongodb.is_none());
            },
        );
    }

    #[test]
    fn test_config_mongodb_backend_requires_uri() {
        temp_env::with_vars(
            [
                ("DATABASE_BACKEND", Some("mongodb")),
                ("MONGO_URI", None::<&str>),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
