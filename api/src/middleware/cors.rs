//! CORS policy for browser clients of the auth and admin endpoints.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use sg_shared::Environment;

const DEFAULT_MAX_AGE: usize = 3600;

/// Build the CORS middleware for `environment`
///
/// Development allows any origin. Elsewhere only the comma-separated
/// `ALLOWED_ORIGINS` are accepted. `CORS_MAX_AGE` sets the preflight cache.
pub fn create_cors(environment: Environment) -> Cors {
    let max_age = std::env::var("CORS_MAX_AGE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_AGE);
    let origins = std::env::var("ALLOWED_ORIGINS").unwrap_or_default();
    build_cors(environment, &origins, max_age)
}

fn build_cors(environment: Environment, allowed_origins: &str, max_age: usize) -> Cors {
    let base = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::USER_AGENT,
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(max_age);

    if environment.is_development() {
        tracing::info!("Configuring permissive CORS for development");
        return base.allow_any_origin();
    }

    allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .fold(base, |cors, origin| {
            tracing::info!(origin, "Allowing CORS origin");
            cors.allowed_origin(origin)
        })
}
