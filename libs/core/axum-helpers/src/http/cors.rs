//! CORS layer construction.

use axum::http::{HeaderValue, Method};
use std::io;
use std::time::Duration;
use tower_http::cors::{Any, AllowOrigin, CorsLayer};
use tracing::info;

/// Create a CORS layer restricted to a comma-separated list of origins.
///
/// # Errors
/// Returns an error if the list is empty or contains an invalid origin.
pub fn create_cors_layer(origins_str: &str) -> io::Result<CorsLayer> {
    let allowed_origins: Vec<HeaderValue> = origins_str
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if allowed_origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    info!("CORS configured with allowed origins: {}", origins_str);

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600)))
}

/// Create a CORS layer that allows any origin, header, and method.
///
/// Suitable for public read-mostly APIs and local development.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_cors_layer_valid_origins() {
        let result = create_cors_layer("http://localhost:3000,https://example.com");
        assert!(result.is_ok());
    }

    #[test]
    fn test_create_cors_layer_empty() {
        assert!(create_cors_layer("").is_err());
        assert!(create_cors_layer(" , ").is_err());
    }
}
