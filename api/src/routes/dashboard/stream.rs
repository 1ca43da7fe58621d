//! Realtime dashboard channel delivered as server-sent events.
//!
//! Each connection registers with the hub and streams its events until
//! the client goes away; dropping the stream deregisters the connection.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::{http::header, web, Error, HttpResponse};
use bytes::Bytes;
use futures_util::Stream;
use tokio::sync::mpsc;

use crate::routes::AppState;
use pb_core::hub::{BroadcastHub, ConnectionId, HubEvent};
use pb_core::services::auth::CredentialStore;

/// Handler for GET /hubs/dashboard
///
/// Holds a persistent SSE connection over which `UpdateKpi` and
/// `ReceiveActivity` events are pushed. Connect and disconnect are the
/// only client actions; no data flows upstream.
pub async fn dashboard_stream<C>(state: web::Data<AppState<C>>) -> HttpResponse
where
    C: CredentialStore + 'static,
{
    let connection = state.hub.register();
    let stream = HubEventStream {
        hub: Arc::clone(&state.hub),
        id: connection.id,
        receiver: connection.receiver,
    };

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(stream)
}

/// Adapts a hub connection into an SSE byte stream.
struct HubEventStream {
    hub: Arc<BroadcastHub>,
    id: ConnectionId,
    receiver: mpsc::UnboundedReceiver<HubEvent>,
}

impl Stream for HubEventStream {
    type Item = Result<Bytes, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.receiver.poll_recv(cx) {
            Poll::Ready(Some(event)) => Poll::Ready(Some(Ok(format_sse(&event)))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for HubEventStream {
    fn drop(&mut self) {
        self.hub.unregister(self.id);
    }
}

/// Formats a hub event as a named SSE event with a JSON data line.
fn format_sse(event: &HubEvent) -> Bytes {
    let payload = serde_json::to_string(event).unwrap_or_else(|_| "null".to_string());
    Bytes::from(format!("event: {}\ndata: {}\n\n", event.name(), payload))
}
