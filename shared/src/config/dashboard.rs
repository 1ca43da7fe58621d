//! Dashboard broadcast configuration

use serde::{Deserialize, Serialize};

/// Configuration for the periodic dashboard broadcast task
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Seconds between periodic KPI broadcasts
    pub update_interval_secs: u64,

    /// Base delay in seconds before restarting the broadcast task after an
    /// unexpected termination. The supervisor backs off linearly from here.
    pub restart_backoff_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: 45,
            restart_backoff_secs: 5,
        }
    }
}

impl DashboardConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            update_interval_secs: std::env::var("DASHBOARD_UPDATE_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.update_interval_secs),
            restart_backoff_secs: std::env::var("DASHBOARD_RESTART_BACKOFF_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.restart_backoff_secs),
        }
    }
}
