//! # PollService
//!
//! The voting engine. A poll has a single Open state for the lifetime of
//! its thread; voting is terminal per user (no reversal, no re-vote). The
//! tally increment and the voter-set insert happen as one atomic unit
//! inside the repo, so concurrent voters on the same poll cannot lose
//! updates while unrelated polls stay unaffected.

use std::sync::Arc;

use uuid::Uuid;

use domains::error::Result;
use domains::models::Thread;
use domains::ports::ThreadRepo;

use crate::membership::{GuardTarget, MembershipService};

pub struct PollService {
    threads: Arc<dyn ThreadRepo>,
    guard: Arc<MembershipService>,
}

impl PollService {
    pub fn new(threads: Arc<dyn ThreadRepo>, guard: Arc<MembershipService>) -> Self {
        Self { threads, guard }
    }

    /// Casts a vote and returns the poll thread with up-to-date tallies.
    ///
    /// Fails NotFound if the thread is absent or is not a poll, Conflict if
    /// the actor already voted, Validation if `option_text` matches no
    /// option exactly (case-sensitive, no trimming).
    pub async fn vote(&self, thread_id: Uuid, actor: Uuid, option_text: &str) -> Result<Thread> {
        self.guard.authorize(actor, GuardTarget::Thread(thread_id)).await?;
        let thread = self
            .threads
            .apply_vote(thread_id, actor, option_text.to_string())
            .await?;
        tracing::info!(thread = %thread_id, %actor, option = option_text, "vote recorded");
        Ok(thread)
    }
}
