//! Authentication service and credential-store seam

pub mod credentials;
pub mod service;

pub use credentials::{CredentialStore, StaticCredentials, UserProfile};
pub use service::AuthService;
