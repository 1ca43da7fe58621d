//! Broadcast hub: registry of connected clients and best-effort fan-out.
//!
//! Each connection owns an unbounded mpsc receiver; `publish` walks the
//! registry and pushes a clone of the event into every sender. A client
//! that went away is pruned during the walk and never blocks delivery to
//! the others. No delivery acknowledgment, no per-client backpressure.

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::kpi::KpiSnapshot;

/// Identifier for a connected client
pub type ConnectionId = Uuid;

/// Events fanned out to every connected client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HubEvent {
    UpdateKpi(KpiSnapshot),
    ReceiveActivity(String),
}

impl HubEvent {
    /// Event name as delivered on the wire
    pub fn name(&self) -> &'static str {
        match self {
            HubEvent::UpdateKpi(_) => "UpdateKpi",
            HubEvent::ReceiveActivity(_) => "ReceiveActivity",
        }
    }
}

/// A registered client connection and its event stream.
pub struct HubConnection {
    pub id: ConnectionId,
    pub receiver: mpsc::UnboundedReceiver<HubEvent>,
}

/// Registry of live connections.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<HubEvent>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Registers a new client and hands back its event stream.
    pub fn register(&self) -> HubConnection {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.insert(id, tx);
        info!(connection_id = %id, "client connected");

        HubConnection { id, receiver: rx }
    }

    /// Removes a client from the registry. Safe to call for an id that was
    /// already pruned.
    pub fn unregister(&self, id: ConnectionId) {
        if self.connections.remove(&id).is_some() {
            info!(connection_id = %id, "client disconnected");
        }
    }

    /// Fans the event out to every registered connection, pruning any
    /// whose receiver is gone. Returns the number of deliveries.
    pub fn publish(&self, event: HubEvent) -> usize {
        let mut delivered = 0;
        self.connections
            .retain(|_, tx| match tx.send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            });

        debug!(event = event.name(), delivered, "published hub event");
        delivered
    }

    /// Number of currently registered connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_every_connection() {
        let hub = BroadcastHub::new();
        let mut conns: Vec<_> = (0..3).map(|_| hub.register()).collect();

        let kpi = KpiSnapshot {
            active_users: 32,
            projects: 10,
            tasks: 45,
            notifications: 5,
        };
        let delivered = hub.publish(HubEvent::UpdateKpi(kpi));
        assert_eq!(delivered, 3);

        for conn in &mut conns {
            assert_eq!(conn.receiver.recv().await, Some(HubEvent::UpdateKpi(kpi)));
        }
    }

    #[tokio::test]
    async fn test_disconnect_mid_publish_does_not_fail_the_call() {
        let hub = BroadcastHub::new();
        let mut alive = hub.register();
        let dead = hub.register();

        // Simulate a client vanishing without unregistering.
        drop(dead.receiver);

        let delivered = hub.publish(HubEvent::ReceiveActivity("hello".to_string()));
        assert_eq!(delivered, 1);
        assert_eq!(
            alive.receiver.recv().await,
            Some(HubEvent::ReceiveActivity("hello".to_string()))
        );

        // The dead connection was pruned during the walk.
        assert_eq!(hub.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let hub = BroadcastHub::new();
        let conn = hub.register();
        assert_eq!(hub.connection_count(), 1);

        hub.unregister(conn.id);
        hub.unregister(conn.id);
        assert_eq!(hub.connection_count(), 0);
    }

    #[test]
    fn test_event_names() {
        let kpi = KpiSnapshot {
            active_users: 1,
            projects: 1,
            tasks: 1,
            notifications: 1,
        };
        assert_eq!(HubEvent::UpdateKpi(kpi).name(), "UpdateKpi");
        assert_eq!(
            HubEvent::ReceiveActivity(String::new()).name(),
            "ReceiveActivity"
        );
    }
}
