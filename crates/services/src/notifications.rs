//! # NotificationService
//!
//! Persists Notification rows and best-effort pushes them over the
//! recipient's live connection. The durable row always comes first; the
//! push can silently miss (recipient offline, channel gone) and the
//! triggering request never learns about it.

use std::sync::Arc;

use uuid::Uuid;

use domains::error::{AppError, Result};
use domains::models::{Notification, NotificationKind};
use domains::ports::{CircleRepo, LivePush, NotificationRepo};

pub struct NotificationService {
    notifications: Arc<dyn NotificationRepo>,
    circles: Arc<dyn CircleRepo>,
    push: Arc<dyn LivePush>,
}

impl NotificationService {
    pub fn new(
        notifications: Arc<dyn NotificationRepo>,
        circles: Arc<dyn CircleRepo>,
        push: Arc<dyn LivePush>,
    ) -> Self {
        Self { notifications, circles, push }
    }

    /// Persists the notification, then attempts live delivery to the SAME
    /// identity that was persisted as the recipient. Delivery is
    /// fire-and-forget; only the persistence step can fail.
    pub async fn dispatch(&self, notification: Notification) -> Result<Notification> {
        self.notifications.insert(notification.clone()).await?;
        tracing::info!(
            recipient = %notification.recipient_id,
            kind = ?notification.kind,
            notification_id = %notification.id,
            "notification persisted"
        );
        self.push.push(notification.recipient_id, &notification);
        Ok(notification)
    }

    /// Notifies the creator of `circle_id` about something a member did.
    /// Self-notification is suppressed: when the sender IS the creator,
    /// nothing is persisted or pushed and `Ok(None)` is returned.
    pub async fn notify_circle_owner(
        &self,
        circle_id: Uuid,
        sender_id: Uuid,
        kind: NotificationKind,
        message: String,
        link: Option<String>,
    ) -> Result<Option<Notification>> {
        let circle = self
            .circles
            .get(circle_id)
            .await?
            .ok_or_else(|| AppError::not_found("Circle", circle_id))?;

        if circle.creator_id == sender_id {
            return Ok(None);
        }

        let notification = Notification::new(kind, circle.creator_id, message, link, Some(circle_id));
        Ok(Some(self.dispatch(notification).await?))
    }

    /// The recipient's durable feed, newest first.
    pub async fn feed(&self, recipient: Uuid) -> Result<Vec<Notification>> {
        self.notifications.list_for(recipient).await
    }

    /// Marks a notification read; NotFound unless it belongs to `recipient`.
    pub async fn mark_read(&self, id: Uuid, recipient: Uuid) -> Result<Notification> {
        self.notifications.mark_read(id, recipient).await
    }
}
