//! Route handlers

pub mod auth;
pub mod dashboard;

use std::sync::Arc;

use pb_core::hub::BroadcastHub;
use pb_core::services::auth::{AuthService, CredentialStore};
use pb_core::services::dashboard::DashboardService;
use pb_core::services::token::TokenService;

/// Application state that holds shared services
pub struct AppState<C: CredentialStore> {
    pub auth_service: Arc<AuthService<C>>,
    pub token_service: Arc<TokenService>,
    pub dashboard_service: Arc<DashboardService>,
    pub hub: Arc<BroadcastHub>,
}
