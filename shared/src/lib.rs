//! Shared utilities and common types for the Pulseboard server
//!
//! This crate provides common functionality used across all workspace
//! members:
//! - Configuration types
//! - Error types and response structures

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{AppConfig, AuthConfig, DashboardConfig, ServerConfig};
pub use errors::{error_codes, ErrorResponse};
