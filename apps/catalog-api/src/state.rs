//! Application state management

use database::mongodb::Client;

/// Shared application state
///
/// `mongo_client` is populated only when the MongoDB backend is active; the
/// readiness probe pings the store through it.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Option<Client>,
}
