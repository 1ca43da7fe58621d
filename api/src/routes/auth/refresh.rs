use actix_web::{web, HttpResponse};

use crate::dto::auth::RefreshRequest;
use crate::handlers::error::handle_domain_error;
use crate::routes::AppState;

use pb_core::services::auth::CredentialStore;

/// Handler for POST /api/auth/refresh
///
/// Body: `{"token": "..."}`. Exchanges a valid token for a fresh one with
/// a full new lifetime window. Returns `400` when the token is empty,
/// structurally invalid, expired, or missing required claims.
pub async fn refresh<C>(
    state: web::Data<AppState<C>>,
    request: web::Json<RefreshRequest>,
) -> HttpResponse
where
    C: CredentialStore + 'static,
{
    match state.auth_service.refresh(&request.token) {
        Ok(issued) => HttpResponse::Ok().json(issued),
        Err(error) => handle_domain_error(error),
    }
}
