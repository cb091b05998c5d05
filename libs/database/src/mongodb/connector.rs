use std::time::Duration;

use mongodb::{options::ClientOptions, Client};
use thiserror::Error;
use tracing::{debug, info};

use super::config::MongoConfig;

#[derive(Debug, Error)]
pub enum MongoError {
    #[error("Failed to parse MongoDB connection string: {0}")]
    InvalidConnectionString(#[source] mongodb::error::Error),

    #[error("Failed to connect to MongoDB: {0}")]
    ConnectionFailed(#[source] mongodb::error::Error),
}

/// Connect to MongoDB with the given connection URL and default settings.
pub async fn connect(url: &str) -> Result<Client, MongoError> {
    connect_from_config(&MongoConfig::new(url)).await
}

/// Connect to MongoDB using the full configuration.
///
/// Verifies the connection by listing database names before returning, so a
/// returned `Client` is known to be reachable.
pub async fn connect_from_config(config: &MongoConfig) -> Result<Client, MongoError> {
    debug!(database = %config.database, "Connecting to MongoDB");

    let mut options = ClientOptions::parse(&config.url)
        .await
        .map_err(MongoError::InvalidConnectionString)?;

    if let Some(app_name) = &config.app_name {
        options.app_name = Some(app_name.clone());
    }
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    let client = Client::with_options(options).map_err(MongoError::ConnectionFailed)?;

    // Fail fast if the server is unreachable instead of surfacing the error
    // on the first query.
    client
        .list_database_names()
        .await
        .map_err(MongoError::ConnectionFailed)?;

    info!(database = %config.database, "Connected to MongoDB");
    Ok(client)
}
