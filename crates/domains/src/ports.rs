//! # Core Ports
//!
//! Contracts between the service layer and its adapters. Any storage or
//! transport plugin must implement these traits to be wired into the binary.
//!
//! The `apply_*` methods on [`ThreadRepo`] are the atomicity seams: each
//! must execute as a single atomic unit per thread document, so concurrent
//! voters on one poll serialize on that document alone while unrelated
//! threads proceed concurrently.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Circle, Comment, Notification, Page, Thread, ThreadKind, ThreadSort, User};
use crate::reactions::{ReactionKind, ReactionUpdate};

/// Persistence contract for circles and their membership sets.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CircleRepo: Send + Sync {
    /// Fails `Conflict` if the circle name is already taken.
    async fn insert(&self, circle: Circle) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Circle>>;

    /// Adds a member atomically. Fails `NotFound` if the circle is absent
    /// and `Conflict` if the user already belongs (creator included).
    /// Returns the updated circle.
    async fn add_member(&self, circle_id: Uuid, user_id: Uuid) -> Result<Circle>;

    /// Removes a member. Fails `Conflict` if the user is not a member.
    /// Never touches the creator; that rule is enforced above this port.
    async fn remove_member(&self, circle_id: Uuid, user_id: Uuid) -> Result<()>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Persistence contract for threads, their comments, reactions and votes.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepo: Send + Sync {
    async fn insert(&self, thread: Thread) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Thread>>;

    /// `page` is 1-based; ordering follows `sort`.
    async fn list(
        &self,
        circle_id: Uuid,
        kind: Option<ThreadKind>,
        sort: ThreadSort,
        page: usize,
        page_size: usize,
    ) -> Result<Page<Thread>>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Cascade helper for circle deletion; returns how many threads went.
    async fn delete_by_circle(&self, circle_id: Uuid) -> Result<usize>;

    /// Appends a comment to its thread. Fails `NotFound` if the thread is
    /// absent. Returns the stored comment.
    async fn append_comment(&self, thread_id: Uuid, comment: Comment) -> Result<Comment>;

    /// Runs [`Thread::record_vote`] atomically for this thread document and
    /// returns the updated thread. Concurrent votes must not lose updates.
    async fn apply_vote(&self, thread_id: Uuid, actor: Uuid, option_text: String)
        -> Result<Thread>;

    /// Runs the reaction toggle atomically against the thread's own sets.
    async fn apply_thread_reaction(
        &self,
        thread_id: Uuid,
        actor: Uuid,
        kind: ReactionKind,
    ) -> Result<ReactionUpdate>;

    /// Runs the reaction toggle atomically against one comment's sets.
    /// Fails `NotFound` if either the thread or the comment is absent.
    async fn apply_comment_reaction(
        &self,
        thread_id: Uuid,
        comment_id: Uuid,
        actor: Uuid,
        kind: ReactionKind,
    ) -> Result<ReactionUpdate>;
}

/// Identity lookup contract. Backed by whatever user store the deployment
/// uses; the engine only reads it.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fails `Conflict` if the username is already taken.
    async fn insert(&self, user: User) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<User>>;
    /// Case-sensitive handle lookup; `None` for unknown handles.
    async fn resolve_handle(&self, handle: String) -> Result<Option<User>>;
}

/// Persistence contract for the durable notification feed.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NotificationRepo: Send + Sync {
    async fn insert(&self, notification: Notification) -> Result<()>;
    /// Newest first.
    async fn list_for(&self, recipient: Uuid) -> Result<Vec<Notification>>;
    /// Marks read and returns the updated record. Fails `NotFound` unless
    /// the notification exists AND belongs to `recipient`.
    async fn mark_read(&self, id: Uuid, recipient: Uuid) -> Result<Notification>;
}

/// Best-effort live delivery. Implementations must never block and never
/// fail the caller: an absent or dead connection is a no-op (the durable
/// row already exists).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait LivePush: Send + Sync {
    fn push(&self, recipient: Uuid, notification: &Notification);
}
