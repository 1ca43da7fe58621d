use std::sync::Arc;

use actix_web::{web, HttpServer};
use log::info;
use tokio_util::sync::CancellationToken;

use pb_api::app::create_app;
use pb_api::routes::AppState;
use pb_core::hub::BroadcastHub;
use pb_core::services::auth::{AuthService, StaticCredentials};
use pb_core::services::dashboard::{spawn_supervised, DashboardService};
use pb_core::services::token::TokenService;
use pb_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Pulseboard API server");

    let config = AppConfig::from_env();
    if config.auth.is_using_default_secret() {
        log::warn!("JWT_SECRET not set; using the default development secret");
    }

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    // Wire shared services
    let token_service = Arc::new(TokenService::new(config.auth.clone()));
    let auth_service = Arc::new(AuthService::new(
        StaticCredentials,
        Arc::clone(&token_service),
        config.auth.api_key.clone(),
    ));
    let hub = Arc::new(BroadcastHub::new());
    let dashboard_service = Arc::new(DashboardService::new(
        Arc::clone(&hub),
        config.dashboard.clone(),
    ));

    // One supervised broadcast task for the lifetime of the process
    let shutdown = CancellationToken::new();
    let broadcast_task = spawn_supervised(Arc::clone(&dashboard_service), shutdown.clone());

    let app_state = web::Data::new(AppState {
        auth_service,
        token_service,
        dashboard_service,
        hub,
    });
    let allowed_origins = config.server.allowed_origins.clone();

    let server = HttpServer::new(move || {
        create_app(app_state.clone(), allowed_origins.clone())
    })
    .bind(&bind_address)?
    .run()
    .await;

    shutdown.cancel();
    let _ = broadcast_task.await;

    server
}
