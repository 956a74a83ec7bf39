//! # MembershipService
//!
//! The membership guard plus circle lifecycle. Every guarded write funnels
//! through [`MembershipService::authorize`] before anything mutates:
//! resolve the target circle (directly, or via the thread that owns it),
//! then require that the actor is the creator, a moderator or a member.

use std::sync::Arc;

use uuid::Uuid;

use domains::error::{AppError, Result};
use domains::models::{Circle, MembershipStatus, NotificationKind, User};
use domains::ports::{CircleRepo, ThreadRepo, UserDirectory};
use domains::validation;

use crate::notifications::NotificationService;

/// What a guarded action targets: a circle itself, or a thread from which
/// the owning circle is derived.
#[derive(Debug, Clone, Copy)]
pub enum GuardTarget {
    Circle(Uuid),
    Thread(Uuid),
}

pub struct MembershipService {
    circles: Arc<dyn CircleRepo>,
    threads: Arc<dyn ThreadRepo>,
    users: Arc<dyn UserDirectory>,
    notifier: Arc<NotificationService>,
}

impl MembershipService {
    pub fn new(
        circles: Arc<dyn CircleRepo>,
        threads: Arc<dyn ThreadRepo>,
        users: Arc<dyn UserDirectory>,
        notifier: Arc<NotificationService>,
    ) -> Self {
        Self { circles, threads, users, notifier }
    }

    /// Resolves the circle a target belongs to, without authorizing.
    pub async fn resolve(&self, target: GuardTarget) -> Result<Circle> {
        let circle_id = match target {
            GuardTarget::Circle(id) => id,
            GuardTarget::Thread(thread_id) => {
                self.threads
                    .get(thread_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Thread", thread_id))?
                    .circle_id
            }
        };
        self.circles
            .get(circle_id)
            .await?
            .ok_or_else(|| AppError::not_found("Circle", circle_id))
    }

    /// NotFound if the circle (or the thread used to derive it) does not
    /// exist; Forbidden if none of {creator, moderator, member} hold.
    /// Returns the resolved circle so callers don't fetch it twice.
    pub async fn authorize(&self, actor: Uuid, target: GuardTarget) -> Result<Circle> {
        let circle = self.resolve(target).await?;
        if !circle.can_interact(actor) {
            return Err(AppError::Forbidden(format!(
                "not a member of circle {}",
                circle.name
            )));
        }
        Ok(circle)
    }

    /// The three membership booleans, independently derivable by UI
    /// collaborators.
    pub async fn membership_status(&self, circle_id: Uuid, actor: Uuid) -> Result<MembershipStatus> {
        let circle = self.resolve(GuardTarget::Circle(circle_id)).await?;
        Ok(MembershipStatus {
            is_member: circle.is_member(actor),
            is_moderator: circle.is_moderator(actor),
            is_creator: circle.is_creator(actor),
        })
    }

    pub async fn create_circle(&self, creator_id: Uuid, name: &str) -> Result<Circle> {
        validation::circle_name(name)?;
        let circle = Circle::new(name, creator_id);
        self.circles.insert(circle.clone()).await?;
        tracing::info!(circle = %circle.id, name = %circle.name, "circle created");
        Ok(circle)
    }

    pub async fn get_circle(&self, circle_id: Uuid) -> Result<Circle> {
        self.resolve(GuardTarget::Circle(circle_id)).await
    }

    /// Joins a circle; duplicate joins (creator included) fail Conflict.
    /// The circle owner is notified, unless the joiner IS the owner.
    pub async fn join(&self, circle_id: Uuid, actor: Uuid) -> Result<Circle> {
        let circle = self.circles.add_member(circle_id, actor).await?;

        let joiner = self.display_name(actor).await;
        let message = format!("{} joined your circle \"{}\"", joiner, circle.name);
        if let Err(err) = self
            .notifier
            .notify_circle_owner(
                circle_id,
                actor,
                NotificationKind::CircleJoin,
                message,
                Some(format!("/circles/{circle_id}")),
            )
            .await
        {
            // The join itself committed; the owner still sees the member
            // list. Don't fail the request over a notification row.
            tracing::warn!(%circle_id, error = %err, "owner join notification failed");
        }
        Ok(circle)
    }

    /// Leaves a circle. The creator can never leave (or be auto-removed).
    pub async fn leave(&self, circle_id: Uuid, actor: Uuid) -> Result<()> {
        let circle = self.resolve(GuardTarget::Circle(circle_id)).await?;
        if circle.is_creator(actor) {
            return Err(AppError::Validation(
                "the creator cannot leave their own circle".into(),
            ));
        }
        self.circles.remove_member(circle_id, actor).await
    }

    /// Deletes a circle and cascades to its threads (and, by composition,
    /// their comments). Only the creator or a moderator may do this.
    pub async fn delete_circle(&self, circle_id: Uuid, actor: Uuid) -> Result<()> {
        let circle = self.resolve(GuardTarget::Circle(circle_id)).await?;
        if !circle.is_creator(actor) && !circle.is_moderator(actor) {
            return Err(AppError::Forbidden(
                "only the creator or a moderator may delete a circle".into(),
            ));
        }
        self.circles.delete(circle_id).await?;
        let removed = self.threads.delete_by_circle(circle_id).await?;
        tracing::info!(%circle_id, threads_removed = removed, "circle deleted");
        Ok(())
    }

    pub(crate) async fn display_name(&self, user_id: Uuid) -> String {
        match self.users.get(user_id).await {
            Ok(Some(User { username, .. })) => username,
            _ => "someone".to_string(),
        }
    }
}
