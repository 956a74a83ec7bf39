//! # Live push channel
//!
//! Server-sent events, one stream per connected identity. Connecting
//! registers the caller in the presence registry (overwriting any prior
//! slot); dropping the stream unregisters that exact connection, so a
//! stale disconnect can never evict a newer session.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use futures_util::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use storage_adapters::PresenceRegistry;

use crate::handlers::ActorId;
use crate::AppState;

/// Unregisters the connection when the SSE stream is dropped.
struct ConnectionGuard {
    presence: Arc<PresenceRegistry>,
    identity: Uuid,
    connection_id: Uuid,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.presence.unregister(self.identity, self.connection_id);
    }
}

pub async fn stream(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (connection_id, receiver) = state.presence.register(actor);
    let guard = ConnectionGuard {
        presence: state.presence.clone(),
        identity: actor,
        connection_id,
    };

    let stream = UnboundedReceiverStream::new(receiver).map(move |notification| {
        // Moving the guard into the closure ties unregistration to the
        // stream's lifetime.
        let _held = &guard;
        let event = Event::default()
            .event("new_notification")
            .json_data(&notification)
            .unwrap_or_else(|err| {
                tracing::error!(error = %err, "failed to serialize notification for push");
                Event::default().event("new_notification")
            });
        Ok(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
