//! Maps domain errors to HTTP responses.

use actix_web::HttpResponse;
use pb_core::errors::{DomainError, TokenError};
use pb_shared::errors::{error_codes, ErrorResponse};

/// Converts a domain error into the appropriate HTTP response.
///
/// Authentication failures are 401, validation and token-shape failures
/// on non-guarded endpoints are 400. Per-request expiry signalling (the
/// `Token-Expired` header) is the middleware's concern, not this mapping's.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    log::warn!("domain error: {error:?}");

    match &error {
        DomainError::Auth(_) => HttpResponse::Unauthorized()
            .json(ErrorResponse::new(error_codes::UNAUTHORIZED, error.to_string())),
        DomainError::Token(TokenError::Expired) => HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::TOKEN_EXPIRED, error.to_string())),
        DomainError::Token(_) => HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::TOKEN_INVALID, error.to_string())),
        DomainError::Validation(_) => HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::VALIDATION_ERROR,
            error.to_string(),
        )),
        DomainError::Internal { .. } => HttpResponse::InternalServerError().json(
            ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred"),
        ),
    }
}
