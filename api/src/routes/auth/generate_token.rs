use actix_web::{web, HttpRequest, HttpResponse};

use crate::handlers::error::handle_domain_error;
use crate::routes::AppState;

use pb_core::services::auth::CredentialStore;

/// Handler for POST /api/auth/generate-token
///
/// Machine-to-machine issuance. All inputs arrive as headers:
/// `username`, `email`, `mobileNo`, `role`, `ApiKey`.
/// The API key is checked first (`401` on mismatch); blank fields and
/// unrecognized roles yield `400`.
pub async fn generate_token<C>(req: HttpRequest, state: web::Data<AppState<C>>) -> HttpResponse
where
    C: CredentialStore + 'static,
{
    let header = |name: &str| -> String {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    match state.auth_service.generate_token(
        &header("username"),
        &header("email"),
        &header("mobileNo"),
        &header("role"),
        &header("ApiKey"),
    ) {
        Ok(issued) => HttpResponse::Ok().json(issued),
        Err(error) => handle_domain_error(error),
    }
}
