//! # Pulseboard Core
//!
//! Core business logic and domain layer for the Pulseboard backend.
//! This crate contains the domain entities, token issuance and validation,
//! the credential-store seam, the broadcast hub, and the dashboard
//! notification service.

pub mod domain;
pub mod errors;
pub mod hub;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use hub::{BroadcastHub, ConnectionId, HubConnection, HubEvent};
pub use services::*;
