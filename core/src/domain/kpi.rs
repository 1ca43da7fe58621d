//! Dashboard KPI snapshot.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Point-in-time dashboard metrics pushed to connected clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSnapshot {
    pub active_users: u32,
    pub projects: u32,
    pub tasks: u32,
    pub notifications: u32,
}

impl KpiSnapshot {
    /// Samples demo metrics within the ranges the dashboard displays.
    pub fn sample() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            active_users: rng.gen_range(25..40),
            projects: rng.gen_range(5..12),
            tasks: rng.gen_range(30..60),
            notifications: rng.gen_range(1..10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stays_in_range() {
        for _ in 0..100 {
            let kpi = KpiSnapshot::sample();
            assert!((25..40).contains(&kpi.active_users));
            assert!((5..12).contains(&kpi.projects));
            assert!((30..60).contains(&kpi.tasks));
            assert!((1..10).contains(&kpi.notifications));
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let kpi = KpiSnapshot {
            active_users: 32,
            projects: 10,
            tasks: 45,
            notifications: 5,
        };
        let json = serde_json::to_string(&kpi).unwrap();
        assert!(json.contains("activeUsers"));
        assert!(json.contains("notifications"));
    }
}
