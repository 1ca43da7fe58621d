//! Business services

pub mod auth;
pub mod dashboard;
pub mod token;

pub use auth::{AuthService, CredentialStore, StaticCredentials, UserProfile};
pub use dashboard::DashboardService;
pub use token::{TokenCodec, TokenService};
