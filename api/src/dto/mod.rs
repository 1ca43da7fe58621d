//! Request and response data transfer objects

pub mod auth;

pub use auth::{LoginRequest, RefreshRequest};
