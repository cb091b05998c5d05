//! Readiness endpoint
//!
//! Liveness (`/health`) comes from the shared health router; this module adds
//! a readiness probe that also pings the document store when one is active.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use database::mongodb::check_health;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct ReadyResponse {
    status: &'static str,
    backend: &'static str,
    version: &'static str,
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    // Report the backend actually serving traffic, which differs from the
    // configured one after a fallback.
    let backend = if state.mongo_client.is_some() {
        "mongodb"
    } else {
        "memory"
    };

    if let (Some(client), Some(mongo)) = (&state.mongo_client, &state.config.mongodb) {
        if !check_health(client, &mongo.database).await {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    status: "unavailable",
                    backend,
                    version: state.config.app.version,
                }),
            );
        }
    }

    (
        StatusCode::OK,
        Json(ReadyResponse {
            status: "ready",
            backend,
            version: state.config.app.version,
        }),
    )
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::Config;

    #[tokio::test]
    async fn test_ready_reports_memory_backend_without_client() {
        let config = temp_env::with_vars(
            [("DATABASE_BACKEND", Some("memory")), ("MONGO_URI", None)],
            || Config::from_env().unwrap(),
        );
        let app = router(AppState {
            config,
            mongo_client: None,
        });

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["backend"], "memory");
    }
}
