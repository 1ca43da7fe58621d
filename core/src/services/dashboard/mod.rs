//! Dashboard notification service

pub mod service;

pub use service::{spawn_supervised, DashboardService};
