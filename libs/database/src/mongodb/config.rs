use core_config::{env_or_default, env_required, ConfigError, FromEnv};

/// MongoDB database configuration
///
/// Holds MongoDB connection settings. Can be constructed manually or loaded
/// from environment variables.
///
/// # Example
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// // Manual construction
/// let config = MongoConfig::new("mongodb://localhost:27017");
///
/// // From environment variables
/// let config = MongoConfig::from_env()?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// MongoDB connection URL (required)
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    pub url: String,

    /// Database name to use
    pub database: String,

    /// Collection name holding the product documents
    pub collection: String,

    /// Optional application name for server logs
    pub app_name: Option<String>,

    /// Maximum number of connections in the pool
    pub max_pool_size: u32,

    /// Minimum number of connections in the pool
    pub min_pool_size: u32,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    /// Create a new MongoConfig with just a URL and default names.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: "catalog".to_string(),
            collection: "products".to_string(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }

    /// Create a MongoConfig with specific database and collection names.
    pub fn with_database(
        url: impl Into<String>,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
            ..Self::new(url)
        }
    }
}

impl FromEnv for MongoConfig {
    /// Reads from environment variables:
    /// - `MONGO_URI` (required)
    /// - `MONGO_DATABASE` (default: "catalog")
    /// - `MONGO_COLLECTION` (default: "products")
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_required("MONGO_URI")?,
            database: env_or_default("MONGO_DATABASE", "catalog"),
            collection: env_or_default("MONGO_COLLECTION", "products"),
            ..Self::new(String::new())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mongo_config_from_env_success() {
        temp_env::with_vars(
            [
                ("MONGO_URI", Some("mongodb://localhost:27017")),
                ("MONGO_DATABASE", Some("testdb")),
                ("MONGO_COLLECTION", None::<&str>),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, "mongodb://localhost:27017");
                assert_eq!(config.database, "testdb");
                assert_eq!(config.collection, "products");
            },
        );
    }

    #[test]
    fn test_mongo_config_from_env_missing_uri() {
        temp_env::with_var_unset("MONGO_URI", || {
            let config = MongoConfig::from_env();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("MONGO_URI"));
        });
    }

    #[test]
    fn test_mongo_config_defaults() {
        let config = MongoConfig::new("mongodb://prod-host:27017");
        assert_eq!(config.database, "catalog");
        assert_eq!(config.collection, "products");
        assert_eq!(config.max_pool_size, 100);
    }
}
