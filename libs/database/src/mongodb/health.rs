use mongodb::{bson::doc, Client};
use tracing::warn;

/// Ping the server and report whether it responded.
///
/// Used by readiness probes; failures are logged and reported as `false`
/// rather than surfaced as errors.
pub async fn check_health(client: &Client, database: &str) -> bool {
    match client.database(database).run_command(doc! { "ping": 1 }).await {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, "MongoDB health check failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mongodb::connect;

    #[tokio::test]
    #[ignore = "requires a running MongoDB instance"]
    async fn test_check_health_local() {
        let client = connect("mongodb://localhost:27017").await.unwrap();
        assert!(check_health(&client, "admin").await);
    }
}
