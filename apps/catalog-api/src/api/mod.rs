//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Assemble all API routes: the products resource plus the readiness probe.
pub fn routes(products_router: Router, state: &AppState) -> Router {
    Router::new()
        .nest("/products", products_router)
        .merge(health::router(state.clone()))
}
