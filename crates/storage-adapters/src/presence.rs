//! # PresenceRegistry
//!
//! Ephemeral, process-local map from identity to its live connection.
//! One slot per identity: a reconnect (second tab, second device) overwrites
//! the previous slot, and an unregister carrying a stale connection id is a
//! no-op. Nothing here is persisted; the registry starts empty on every
//! process restart.
//!
//! Push is best-effort by contract: an absent recipient or a closed channel
//! never fails or blocks the caller, because the durable Notification row
//! already exists and will surface on the next feed fetch.

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use domains::models::Notification;
use domains::ports::LivePush;

/// A live connection slot. The sender side of an unbounded channel: sends
/// never block, and a dropped receiver surfaces as a send error we treat
/// as "recipient went away".
struct Connection {
    id: Uuid,
    sender: mpsc::UnboundedSender<Notification>,
}

#[derive(Default)]
pub struct PresenceRegistry {
    slots: DashMap<Uuid, Connection>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new live connection for `identity`, overwriting any
    /// previous slot (last writer wins). Returns the connection id (needed
    /// to unregister) and the receiving end to drain into the transport.
    pub fn register(&self, identity: Uuid) -> (Uuid, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let connection_id = Uuid::now_v7();
        self.slots.insert(identity, Connection { id: connection_id, sender });
        tracing::debug!(%identity, %connection_id, "live connection registered");
        (connection_id, receiver)
    }

    /// Removes the slot only if it still holds `connection_id`. A newer
    /// connection may have overwritten the slot, in which case the stale
    /// unregister must not evict it.
    pub fn unregister(&self, identity: Uuid, connection_id: Uuid) {
        let removed = self
            .slots
            .remove_if(&identity, |_, conn| conn.id == connection_id)
            .is_some();
        tracing::debug!(%identity, %connection_id, removed, "live connection unregistered");
    }

    pub fn is_connected(&self, identity: Uuid) -> bool {
        self.slots.contains_key(&identity)
    }

    pub fn connected_count(&self) -> usize {
        self.slots.len()
    }
}

impl LivePush for PresenceRegistry {
    fn push(&self, recipient: Uuid, notification: &Notification) {
        let stale = {
            let Some(conn) = self.slots.get(&recipient) else {
                tracing::debug!(%recipient, "recipient not connected; push skipped");
                return;
            };
            if conn.sender.send(notification.clone()).is_ok() {
                tracing::debug!(%recipient, notification_id = %notification.id, "notification pushed");
                return;
            }
            conn.id
        };
        // Receiver dropped without unregistering; evict the dead slot.
        // The guard from the block above is released before remove_if.
        self.slots.remove_if(&recipient, |_, conn| conn.id == stale);
        tracing::warn!(%recipient, "live connection was closed; push dropped");
    }
}
