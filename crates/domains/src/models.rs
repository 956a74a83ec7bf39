//! # Domain Models
//!
//! These structs represent the core entities of circlehub.
//! We use UUID v7 for time-ordered, globally unique identification.
//!
//! State-transition logic that must run atomically (poll voting, reaction
//! toggles) lives here as pure methods so storage adapters can execute it
//! under whatever atomicity envelope they provide (an entry lock, a
//! transaction, a compare-and-swap loop) without duplicating the rules.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::reactions;

/// A member of the directory. Authentication is handled by an external
/// collaborator; the engine only needs handle → identity resolution for
/// mentions and human-readable notification messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Mentionable handle (`@username`); word characters only.
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            created_at: Utc::now(),
        }
    }
}

/// A themed group. The creator is implicitly privileged even when absent
/// from `moderators` and `members`, and is never removed by `leave`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub id: Uuid,
    /// Unique across all circles.
    pub name: String,
    pub creator_id: Uuid,
    pub moderators: HashSet<Uuid>,
    pub members: HashSet<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Circle {
    pub fn new(name: impl Into<String>, creator_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            creator_id,
            moderators: HashSet::new(),
            members: HashSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_creator(&self, actor: Uuid) -> bool {
        self.creator_id == actor
    }

    pub fn is_moderator(&self, actor: Uuid) -> bool {
        self.moderators.contains(&actor)
    }

    pub fn is_member(&self, actor: Uuid) -> bool {
        self.members.contains(&actor)
    }

    /// True if any of the three membership relations hold.
    pub fn can_interact(&self, actor: Uuid) -> bool {
        self.is_creator(actor) || self.is_moderator(actor) || self.is_member(actor)
    }
}

/// One choice inside a poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    #[serde(default)]
    pub vote_count: u64,
}

impl PollOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), vote_count: 0 }
    }
}

/// The polymorphic content payload of a Thread.
///
/// A closed tagged union: every variant is known at compile time and access
/// is type-checked. The `kind` discriminator is carried on the wire so
/// clients can dispatch without probing fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThreadContent {
    Poll {
        question: String,
        options: Vec<PollOption>,
        /// Everyone who has voted. Invariant: `sum(vote_count) == len()`.
        #[serde(default)]
        voted_users: HashSet<Uuid>,
    },
    Discussion {
        title: String,
        body: String,
    },
    Recommendation {
        media_name: String,
        review: String,
        /// 1–10 inclusive.
        rating: u8,
    },
}

impl ThreadContent {
    pub fn kind(&self) -> ThreadKind {
        match self {
            ThreadContent::Poll { .. } => ThreadKind::Poll,
            ThreadContent::Discussion { .. } => ThreadKind::Discussion,
            ThreadContent::Recommendation { .. } => ThreadKind::Recommendation,
        }
    }
}

/// Discriminator used for list filtering and wire payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadKind {
    Poll,
    Discussion,
    Recommendation,
}

/// Listing order for threads. Newest first unless the caller asks
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadSort {
    #[default]
    Newest,
    Oldest,
}

/// A unit of content posted within a Circle.
///
/// The Thread exclusively owns its content variant, both reaction sets and
/// its comments (deleting a Thread deletes its Comments).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: Uuid,
    /// Owning circle; immutable after creation.
    pub circle_id: Uuid,
    pub author_id: Uuid,
    /// Flattened on the wire: the `kind` discriminator and the variant's
    /// fields sit alongside the thread's own columns.
    #[serde(flatten)]
    pub content: ThreadContent,
    pub likes: HashSet<Uuid>,
    pub dislikes: HashSet<Uuid>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl Thread {
    pub fn new(circle_id: Uuid, author_id: Uuid, content: ThreadContent) -> Self {
        Self {
            id: Uuid::now_v7(),
            circle_id,
            author_id,
            content,
            likes: HashSet::new(),
            dislikes: HashSet::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> ThreadKind {
        self.content.kind()
    }

    /// Records a vote on a poll thread as a single unit: the option tally
    /// and the voter set change together, preserving the invariant
    /// `sum(vote_count) == |voted_users|`.
    ///
    /// Voting is terminal per user per poll: a second vote fails `Conflict`
    /// and leaves every tally untouched. `option_text` must exactly match
    /// an existing option (case-sensitive, no trimming).
    pub fn record_vote(&mut self, actor: Uuid, option_text: &str) -> Result<()> {
        let (options, voted_users) = match &mut self.content {
            ThreadContent::Poll { options, voted_users, .. } => (options, voted_users),
            _ => return Err(AppError::not_found("Poll", self.id)),
        };

        if voted_users.contains(&actor) {
            return Err(AppError::Conflict("already voted on this poll".into()));
        }

        let option = options
            .iter_mut()
            .find(|o| o.text == option_text)
            .ok_or_else(|| AppError::Validation(format!("option not found: {option_text}")))?;

        option.vote_count += 1;
        voted_users.insert(actor);
        Ok(())
    }

    /// Toggles a like/dislike on the thread itself.
    pub fn react(&mut self, actor: Uuid, kind: reactions::ReactionKind) -> reactions::ReactionUpdate {
        reactions::toggle(&mut self.likes, &mut self.dislikes, actor, kind)
    }

    /// Looks up a comment by its exact id. Single-result contract: callers
    /// must treat `None` as NotFound rather than guessing from a filtered
    /// list.
    pub fn comment_mut(&mut self, comment_id: Uuid) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == comment_id)
    }
}

/// An append-only reply on a Thread. Reaction sets are independent of the
/// parent Thread's sets. No edit/delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub likes: HashSet<Uuid>,
    pub dislikes: HashSet<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(thread_id: Uuid, author_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            thread_id,
            author_id,
            text: text.into(),
            likes: HashSet::new(),
            dislikes: HashSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn react(&mut self, actor: Uuid, kind: reactions::ReactionKind) -> reactions::ReactionUpdate {
        reactions::toggle(&mut self.likes, &mut self.dislikes, actor, kind)
    }
}

/// What happened to a recipient, durably. Outlives the event that caused it
/// and survives whether or not a live push ever reached the recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub recipient_id: Uuid,
    pub message: String,
    pub link: Option<String>,
    pub circle_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Mention,
    CircleJoin,
    NewThread,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        recipient_id: Uuid,
        message: impl Into<String>,
        link: Option<String>,
        circle_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            recipient_id,
            message: message.into(),
            link,
            circle_id,
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// One page of a listing, with enough metadata for clients to paginate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Slices an already-sorted full result set into the requested page.
    /// A page number past the end yields an empty page, never a panic:
    /// the skip offset saturates instead of overflowing.
    pub fn slice(all: Vec<T>, page: usize, page_size: usize) -> Self {
        let total = all.len();
        let pages = total.div_ceil(page_size).max(1);
        let items = all
            .into_iter()
            .skip(page.saturating_sub(1).saturating_mul(page_size))
            .take(page_size)
            .collect();
        Self { items, total, page, pages, page_size }
    }
}

/// Derived membership view consumed by UI collaborators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MembershipStatus {
    pub is_member: bool,
    pub is_moderator: bool,
    pub is_creator: bool,
}
