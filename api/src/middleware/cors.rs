//! CORS middleware configuration for cross-origin requests.
//!
//! The browser front-ends run on separate dev-server origins, so the allowed
//! origins come from configuration (`ALLOWED_ORIGINS`). A `*` entry accepts
//! any origin and is meant for local development only.

use actix_cors::Cors;
use actix_web::http::header;

use otp_shared::config::CorsConfig;

/// Creates a CORS middleware instance from configuration.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(config.allowed_methods.iter().map(String::as_str))
        .allowed_headers(config.allowed_headers.iter().map(String::as_str))
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::warn!("CORS configured to allow any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
        // Credentials are never combined with a wildcard origin
        if config.allow_credentials {
            cors = cors.supports_credentials();
        }
    }

    cors
}
