use actix_web::{web, HttpResponse};

use crate::dto::auth::LoginRequest;
use crate::handlers::error::handle_domain_error;
use crate::routes::AppState;

use pb_core::services::auth::CredentialStore;

/// Handler for POST /api/auth/login
///
/// Body: `{"username": "...", "password": "..."}`.
/// Returns `200 {token, expiresAt}` on success, `401` on any credential
/// mismatch (uniform response, no unknown-user distinction).
pub async fn login<C>(
    state: web::Data<AppState<C>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    C: CredentialStore + 'static,
{
    match state
        .auth_service
        .login(&request.username, &request.password)
        .await
    {
        Ok(issued) => HttpResponse::Ok().json(issued),
        Err(error) => handle_domain_error(error),
    }
}
