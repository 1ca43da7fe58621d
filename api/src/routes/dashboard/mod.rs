//! Dashboard route handlers: on-demand broadcasts and the realtime
//! channel.

pub mod stream;

use actix_web::{web, HttpResponse};

use crate::routes::AppState;
use pb_core::services::auth::CredentialStore;

pub use stream::dashboard_stream;

/// Handler for POST /api/dashboard/refresh
///
/// Computes a fresh KPI snapshot and broadcasts it to every connected
/// client.
pub async fn refresh_kpi<C>(state: web::Data<AppState<C>>) -> HttpResponse
where
    C: CredentialStore + 'static,
{
    state.dashboard_service.refresh_kpi();
    HttpResponse::Ok().json(serde_json::json!({
        "message": "KPI refreshed successfully"
    }))
}

/// Handler for POST /api/dashboard/activity
///
/// Body: a JSON string with the activity message to broadcast.
pub async fn add_activity<C>(
    state: web::Data<AppState<C>>,
    message: web::Json<String>,
) -> HttpResponse
where
    C: CredentialStore + 'static,
{
    state.dashboard_service.add_activity(message.into_inner());
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Activity broadcasted successfully"
    }))
}
