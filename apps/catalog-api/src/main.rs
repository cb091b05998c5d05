//! Catalog API - REST server for the product catalog

use axum_helpers::server::{create_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    // Select and initialize the storage backend; this seeds the sample
    // catalog and may fall back to the in-memory store.
    let (products_router, mongo_client) = api::products::router(&config).await;

    let state = AppState {
        config: config.clone(),
        mongo_client,
    };

    let api_routes = api::routes(products_router, &state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router.merge(health_router(state.config.app));

    info!("Starting Catalog API on port {}", state.config.server.port);

    create_app(app, &state.config.server).await?;

    info!("Catalog API shutdown complete");
    Ok(())
}
