//! # Reaction state machine
//!
//! An idempotent like/dislike toggle with mutual exclusion, shared by
//! Threads and Comments. Pure set manipulation; adapters decide where the
//! atomicity boundary sits.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Dislike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionOutcome {
    /// The reaction was added (and the opposite one cleared, if present).
    Applied,
    /// The actor already had this reaction; it was removed.
    Removed,
}

/// Updated counts returned to the caller after a toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReactionUpdate {
    pub outcome: ReactionOutcome,
    pub likes: usize,
    pub dislikes: usize,
}

/// Applies one reaction toggle.
///
/// - actor already in the set matching `kind`: removed (un-react).
/// - otherwise: added to that set, and removed from the opposite set first.
///
/// Postcondition: the actor is never in both sets.
pub fn toggle(
    likes: &mut HashSet<Uuid>,
    dislikes: &mut HashSet<Uuid>,
    actor: Uuid,
    kind: ReactionKind,
) -> ReactionUpdate {
    let (target, opposite) = match kind {
        ReactionKind::Like => (likes, dislikes),
        ReactionKind::Dislike => (dislikes, likes),
    };

    let outcome = if target.remove(&actor) {
        ReactionOutcome::Removed
    } else {
        opposite.remove(&actor);
        target.insert(actor);
        ReactionOutcome::Applied
    };

    let (likes, dislikes) = match kind {
        ReactionKind::Like => (target.len(), opposite.len()),
        ReactionKind::Dislike => (opposite.len(), target.len()),
    };
    ReactionUpdate { outcome, likes, dislikes }
}
