//! Products routes and backend selection

use axum::Router;
use database::mongodb::{Client, MongoConfig};
use domain_products::{
    handlers, InMemoryProductRepository, MongoProductRepository, ProductService,
};
use tracing::{info, warn};

use crate::config::{Config, DatabaseBackend};

/// Build the products router for the configured backend.
///
/// When the mongodb backend is selected but connecting or initializing
/// fails, the error is logged and the service falls back to the in-memory
/// store instead of aborting startup. The returned client is present only
/// when the MongoDB backend is serving; the readiness probe pings through
/// it.
pub async fn router(config: &Config) -> (Router, Option<Client>) {
    if let (DatabaseBackend::MongoDb, Some(mongo_config)) = (config.backend, &config.mongodb) {
        match mongo_router(mongo_config).await {
            Ok((router, client)) => {
                info!(database = %mongo_config.database, "Using MongoDB backend");
                return (router, Some(client));
            }
            Err(e) => {
                warn!(error = %e, "MongoDB unavailable, falling back to in-memory backend");
            }
        }
    } else {
        info!("Using in-memory backend");
    }

    (memory_router(), None)
}

fn memory_router() -> Router {
    let service = ProductService::new(InMemoryProductRepository::new());
    handlers::router(service)
}

async fn mongo_router(config: &MongoConfig) -> eyre::Result<(Router, Client)> {
    let client = database::mongodb::connect_from_config(config).await?;
    let db = client.database(&config.database);

    let repository = MongoProductRepository::with_collection(&db, &config.collection);
    repository.init().await?;

    let service = ProductService::new(repository);
    Ok((handlers::router(service), client))
}
