//! # In-memory store adapters
//!
//! Dashmap-backed implementations of the persistence ports. Each map entry
//! is guarded by its shard lock, so the `apply_*` mutations run atomically
//! per thread document: concurrent voters on one poll serialize on that
//! entry alone while unrelated threads proceed in parallel.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use domains::error::{AppError, Result};
use domains::models::{Circle, Comment, Notification, Page, Thread, ThreadKind, ThreadSort, User};
use domains::ports::{CircleRepo, NotificationRepo, ThreadRepo, UserDirectory};
use domains::reactions::{ReactionKind, ReactionUpdate};

/// Circles plus a name index for uniqueness.
#[derive(Default)]
pub struct MemoryCircles {
    circles: DashMap<Uuid, Circle>,
    names: DashMap<String, Uuid>,
}

impl MemoryCircles {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CircleRepo for MemoryCircles {
    async fn insert(&self, circle: Circle) -> Result<()> {
        use dashmap::mapref::entry::Entry;
        match self.names.entry(circle.name.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::Conflict(format!(
                    "circle name already taken: {}",
                    circle.name
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(circle.id);
            }
        }
        self.circles.insert(circle.id, circle);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Circle>> {
        Ok(self.circles.get(&id).map(|c| c.clone()))
    }

    async fn add_member(&self, circle_id: Uuid, user_id: Uuid) -> Result<Circle> {
        let mut circle = self
            .circles
            .get_mut(&circle_id)
            .ok_or_else(|| AppError::not_found("Circle", circle_id))?;
        if circle.can_interact(user_id) {
            return Err(AppError::Conflict("already a member of this circle".into()));
        }
        circle.members.insert(user_id);
        Ok(circle.clone())
    }

    async fn remove_member(&self, circle_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut circle = self
            .circles
            .get_mut(&circle_id)
            .ok_or_else(|| AppError::not_found("Circle", circle_id))?;
        // Creator removal is refused in the service layer; moderators also
        // drop their membership flag when they leave.
        let was_member = circle.members.remove(&user_id);
        let was_moderator = circle.moderators.remove(&user_id);
        if !was_member && !was_moderator {
            return Err(AppError::Conflict("not a member of this circle".into()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let (_, circle) = self
            .circles
            .remove(&id)
            .ok_or_else(|| AppError::not_found("Circle", id))?;
        self.names.remove(&circle.name);
        Ok(())
    }
}

/// Threads (owning their comments) keyed by id.
#[derive(Default)]
pub struct MemoryThreads {
    threads: DashMap<Uuid, Thread>,
}

impl MemoryThreads {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ThreadRepo for MemoryThreads {
    async fn insert(&self, thread: Thread) -> Result<()> {
        self.threads.insert(thread.id, thread);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Thread>> {
        Ok(self.threads.get(&id).map(|t| t.clone()))
    }

    async fn list(
        &self,
        circle_id: Uuid,
        kind: Option<ThreadKind>,
        sort: ThreadSort,
        page: usize,
        page_size: usize,
    ) -> Result<Page<Thread>> {
        let mut matching: Vec<Thread> = self
            .threads
            .iter()
            .filter(|t| t.circle_id == circle_id)
            .filter(|t| kind.map_or(true, |k| t.kind() == k))
            .map(|t| t.clone())
            .collect();
        // v7 ids break created_at ties deterministically.
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        if sort == ThreadSort::Oldest {
            matching.reverse();
        }
        Ok(Page::slice(matching, page, page_size))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.threads
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Thread", id))
    }

    async fn delete_by_circle(&self, circle_id: Uuid) -> Result<usize> {
        let before = self.threads.len();
        self.threads.retain(|_, t| t.circle_id != circle_id);
        Ok(before - self.threads.len())
    }

    async fn append_comment(&self, thread_id: Uuid, comment: Comment) -> Result<Comment> {
        let mut thread = self
            .threads
            .get_mut(&thread_id)
            .ok_or_else(|| AppError::not_found("Thread", thread_id))?;
        thread.comments.push(comment.clone());
        Ok(comment)
    }

    async fn apply_vote(
        &self,
        thread_id: Uuid,
        actor: Uuid,
        option_text: String,
    ) -> Result<Thread> {
        let mut thread = self
            .threads
            .get_mut(&thread_id)
            .ok_or_else(|| AppError::not_found("Thread", thread_id))?;
        thread.record_vote(actor, &option_text)?;
        Ok(thread.clone())
    }

    async fn apply_thread_reaction(
        &self,
        thread_id: Uuid,
        actor: Uuid,
        kind: ReactionKind,
    ) -> Result<ReactionUpdate> {
        let mut thread = self
            .threads
            .get_mut(&thread_id)
            .ok_or_else(|| AppError::not_found("Thread", thread_id))?;
        Ok(thread.react(actor, kind))
    }

    async fn apply_comment_reaction(
        &self,
        thread_id: Uuid,
        comment_id: Uuid,
        actor: Uuid,
        kind: ReactionKind,
    ) -> Result<ReactionUpdate> {
        let mut thread = self
            .threads
            .get_mut(&thread_id)
            .ok_or_else(|| AppError::not_found("Thread", thread_id))?;
        let comment = thread
            .comment_mut(comment_id)
            .ok_or_else(|| AppError::not_found("Comment", comment_id))?;
        Ok(comment.react(actor, kind))
    }
}

/// Users plus a handle index for mention resolution.
#[derive(Default)]
pub struct MemoryUsers {
    users: DashMap<Uuid, User>,
    handles: DashMap<String, Uuid>,
}

impl MemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryUsers {
    async fn insert(&self, user: User) -> Result<()> {
        use dashmap::mapref::entry::Entry;
        match self.handles.entry(user.username.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::Conflict(format!(
                    "username already taken: {}",
                    user.username
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        self.users.insert(user.id, user);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn resolve_handle(&self, handle: String) -> Result<Option<User>> {
        let Some(id) = self.handles.get(&handle).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }
}

/// Durable notification rows. Never deleted; only the recipient flips
/// `read`.
#[derive(Default)]
pub struct MemoryNotifications {
    rows: DashMap<Uuid, Notification>,
}

impl MemoryNotifications {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepo for MemoryNotifications {
    async fn insert(&self, notification: Notification) -> Result<()> {
        self.rows.insert(notification.id, notification);
        Ok(())
    }

    async fn list_for(&self, recipient: Uuid) -> Result<Vec<Notification>> {
        let mut rows: Vec<Notification> = self
            .rows
            .iter()
            .filter(|n| n.recipient_id == recipient)
            .map(|n| n.clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn mark_read(&self, id: Uuid, recipient: Uuid) -> Result<Notification> {
        let mut row = self
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Notification", id))?;
        if row.recipient_id != recipient {
            // Someone else's notification is indistinguishable from a
            // missing one, deliberately.
            return Err(AppError::not_found("Notification", id));
        }
        row.read = true;
        Ok(row.clone())
    }
}
