//! Application factory
//!
//! Wires the shared services into the actix-web application. The route
//! map mirrors the external interface:
//!
//! - `POST /api/auth/login`
//! - `POST /api/auth/refresh`
//! - `POST /api/auth/generate-token`
//! - `POST /api/dashboard/refresh` (JWT)
//! - `POST /api/dashboard/activity` (JWT)
//! - `GET  /hubs/dashboard` (SSE)
//! - `GET  /health`

use actix_web::{middleware::Logger, web, App, HttpResponse};

use crate::middleware::{auth::JwtAuth, cors::create_cors};
use crate::routes::{auth, dashboard, AppState};

use pb_core::services::auth::CredentialStore;

/// Create and configure the application with all dependencies
pub fn create_app<C>(
    app_state: web::Data<AppState<C>>,
    allowed_origins: Vec<String>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    C: CredentialStore + 'static,
{
    let cors = create_cors(&allowed_origins);
    let jwt = JwtAuth::new(app_state.token_service.clone());

    App::new()
        .app_data(app_state)
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // Auth routes
        .service(
            web::scope("/api/auth")
                .route("/login", web::post().to(auth::login::<C>))
                .route("/refresh", web::post().to(auth::refresh::<C>))
                .route("/generate-token", web::post().to(auth::generate_token::<C>)),
        )
        // Dashboard broadcast routes (JWT-guarded)
        .service(
            web::scope("/api/dashboard")
                .wrap(jwt)
                .route("/refresh", web::post().to(dashboard::refresh_kpi::<C>))
                .route("/activity", web::post().to(dashboard::add_activity::<C>)),
        )
        // Realtime channel: connect/disconnect only, no auth gate
        .route(
            "/hubs/dashboard",
            web::get().to(dashboard::dashboard_stream::<C>),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "pulseboard-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
