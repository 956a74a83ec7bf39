//! # CommentService
//!
//! Appends comments and fans out mention notifications. The comment commit
//! and the mention side effects are strictly ordered: nothing is scanned
//! or dispatched until the comment is in the store, and a failed mention
//! can never take a committed comment down with it.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use domains::error::Result;
use domains::models::{Comment, Notification, NotificationKind};
use domains::ports::{ThreadRepo, UserDirectory};
use domains::validation;

use crate::membership::{GuardTarget, MembershipService};
use crate::mentions;
use crate::notifications::NotificationService;

pub struct CommentService {
    threads: Arc<dyn ThreadRepo>,
    users: Arc<dyn UserDirectory>,
    guard: Arc<MembershipService>,
    notifier: Arc<NotificationService>,
}

impl CommentService {
    pub fn new(
        threads: Arc<dyn ThreadRepo>,
        users: Arc<dyn UserDirectory>,
        guard: Arc<MembershipService>,
        notifier: Arc<NotificationService>,
    ) -> Self {
        Self { threads, users, guard, notifier }
    }

    /// Guard → validate → append → mention fan-out.
    ///
    /// Mentioned handles are resolved case-sensitively; unresolvable ones
    /// are silently skipped. Each resolved recipient other than the author
    /// gets exactly one `mention` notification per comment, no matter how
    /// often their handle appears in the text.
    pub async fn add_comment(
        &self,
        thread_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> Result<Comment> {
        let circle = self.guard.authorize(author_id, GuardTarget::Thread(thread_id)).await?;
        validation::comment_text(text)?;

        let comment = self
            .threads
            .append_comment(thread_id, Comment::new(thread_id, author_id, text))
            .await?;
        tracing::info!(comment = %comment.id, thread = %thread_id, "comment appended");

        let handles = mentions::scan(text);
        if handles.is_empty() {
            return Ok(comment);
        }

        let author = self.guard.display_name(author_id).await;
        // Distinct handles can still resolve to the same identity; dedup on
        // the recipient, not the handle.
        let mut notified: HashSet<Uuid> = HashSet::new();
        for handle in handles {
            let user = match self.users.resolve_handle(handle.clone()).await {
                Ok(Some(user)) => user,
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(%handle, error = %err, "mention resolution failed; skipping");
                    continue;
                }
            };
            if user.id == author_id || !notified.insert(user.id) {
                continue;
            }

            let notification = Notification::new(
                NotificationKind::Mention,
                user.id,
                format!("{author} mentioned you in a comment"),
                Some(format!("/threads/{thread_id}")),
                Some(circle.id),
            );
            if let Err(err) = self.notifier.dispatch(notification).await {
                tracing::warn!(recipient = %user.id, error = %err, "mention notification failed");
            }
        }

        Ok(comment)
    }
}
