//! Computes dashboard payloads and publishes them through the hub,
//! on demand or on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use pb_shared::config::DashboardConfig;

use crate::domain::kpi::KpiSnapshot;
use crate::errors::DomainError;
use crate::hub::{BroadcastHub, HubEvent};

/// Derives KPI and activity payloads and pushes them to all clients.
pub struct DashboardService {
    hub: Arc<BroadcastHub>,
    config: DashboardConfig,
}

impl DashboardService {
    pub fn new(hub: Arc<BroadcastHub>, config: DashboardConfig) -> Self {
        Self { hub, config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Computes a fresh KPI snapshot and broadcasts it.
    pub fn refresh_kpi(&self) -> usize {
        self.hub.publish(HubEvent::UpdateKpi(KpiSnapshot::sample()))
    }

    /// Broadcasts an activity message to all clients.
    pub fn add_activity(&self, message: impl Into<String>) -> usize {
        self.hub.publish(HubEvent::ReceiveActivity(message.into()))
    }

    /// One periodic iteration: fresh metrics, then an activity line.
    fn broadcast_tick(&self) -> Result<(), DomainError> {
        self.refresh_kpi();
        self.add_activity(format!("Updated at {}", Utc::now().format("%H:%M:%S")));
        Ok(())
    }

    /// Periodic broadcast loop. Runs until the token is cancelled; one
    /// iteration's failure is logged and the next interval proceeds.
    pub async fn run_updates(&self, shutdown: CancellationToken) {
        let period = Duration::from_secs(self.config.update_interval_secs);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(interval_secs = self.config.update_interval_secs, "dashboard broadcast loop started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("dashboard broadcast loop stopping");
                    return;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.broadcast_tick() {
                        warn!(error = %e, "dashboard broadcast iteration failed");
                    }
                }
            }
        }
    }
}

/// Runs the broadcast loop under supervision: if the loop terminates for
/// any reason other than shutdown, it is restarted after a linearly
/// growing backoff.
pub fn spawn_supervised(
    service: Arc<DashboardService>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut restarts: u32 = 0;

        loop {
            let svc = Arc::clone(&service);
            let token = shutdown.clone();
            let run = tokio::spawn(async move { svc.run_updates(token).await });

            match run.await {
                Ok(()) => {}
                Err(e) => error!(error = %e, "dashboard broadcast loop aborted"),
            }

            if shutdown.is_cancelled() {
                return;
            }

            restarts += 1;
            let backoff = Duration::from_secs(
                service.config().restart_backoff_secs * u64::from(restarts),
            );
            warn!(restarts, backoff_secs = backoff.as_secs(), "restarting dashboard broadcast loop");

            tokio::select! {
                _ = shutdown.cancelled() => return,
                _ = tokio::time::sleep(backoff) => {}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> DashboardConfig {
        DashboardConfig {
            update_interval_secs: 45,
            restart_backoff_secs: 1,
        }
    }

    #[tokio::test]
    async fn test_on_demand_publish_reaches_clients() {
        let hub = Arc::new(BroadcastHub::new());
        let service = DashboardService::new(Arc::clone(&hub), fast_config());

        let mut conn = hub.register();

        assert_eq!(service.refresh_kpi(), 1);
        assert!(matches!(
            conn.receiver.recv().await,
            Some(HubEvent::UpdateKpi(_))
        ));

        assert_eq!(service.add_activity("deployed v2"), 1);
        assert_eq!(
            conn.receiver.recv().await,
            Some(HubEvent::ReceiveActivity("deployed v2".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_loop_publishes_both_events_per_tick() {
        let hub = Arc::new(BroadcastHub::new());
        let service = Arc::new(DashboardService::new(Arc::clone(&hub), fast_config()));
        let mut conn = hub.register();

        let shutdown = CancellationToken::new();
        let svc = Arc::clone(&service);
        let token = shutdown.clone();
        let handle = tokio::spawn(async move { svc.run_updates(token).await });

        // First tick fires immediately, the next after the interval.
        tokio::time::sleep(Duration::from_secs(46)).await;
        shutdown.cancel();
        handle.await.unwrap();

        let mut kpi = 0;
        let mut activity = 0;
        while let Ok(event) = conn.receiver.try_recv() {
            match event {
                HubEvent::UpdateKpi(_) => kpi += 1,
                HubEvent::ReceiveActivity(_) => activity += 1,
            }
        }
        assert_eq!(kpi, 2);
        assert_eq!(activity, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_supervisor_stops_on_shutdown() {
        let hub = Arc::new(BroadcastHub::new());
        let service = Arc::new(DashboardService::new(hub, fast_config()));

        let shutdown = CancellationToken::new();
        let handle = spawn_supervised(Arc::clone(&service), shutdown.clone());

        tokio::time::sleep(Duration::from_secs(1)).await;
        shutdown.cancel();
        handle.await.unwrap();
    }
}
