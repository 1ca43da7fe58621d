//! CORS configuration for browser clients and the dashboard hub.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use super::auth::TOKEN_EXPIRED_HEADER;

/// Creates a CORS middleware instance from the configured origin list.
///
/// An empty list means development mode: any origin is allowed. With
/// origins configured, only those may call the API or hold an SSE
/// connection to the hub.
pub fn create_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        log::info!("CORS: allowing any origin (development)");
        return Cors::permissive();
    }

    log::info!("CORS: restricting to {} origins", allowed_origins.len());

    let cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        // The expiry signal must be readable by browser clients
        .expose_headers(vec![TOKEN_EXPIRED_HEADER])
        .supports_credentials()
        .max_age(3600);

    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
