//! # ReactionService
//!
//! Guarded entry points for the like/dislike toggle on threads and
//! comments. The toggle itself is pure domain logic; the repo runs it
//! atomically per (target, actor) so concurrent reactors on one target
//! settle set-wise without torn state. Reactions generate no notifications.

use std::sync::Arc;

use uuid::Uuid;

use domains::error::Result;
use domains::ports::ThreadRepo;
use domains::reactions::{ReactionKind, ReactionUpdate};

use crate::membership::{GuardTarget, MembershipService};

pub struct ReactionService {
    threads: Arc<dyn ThreadRepo>,
    guard: Arc<MembershipService>,
}

impl ReactionService {
    pub fn new(threads: Arc<dyn ThreadRepo>, guard: Arc<MembershipService>) -> Self {
        Self { threads, guard }
    }

    pub async fn react_to_thread(
        &self,
        thread_id: Uuid,
        actor: Uuid,
        kind: ReactionKind,
    ) -> Result<ReactionUpdate> {
        self.guard.authorize(actor, GuardTarget::Thread(thread_id)).await?;
        let update = self.threads.apply_thread_reaction(thread_id, actor, kind).await?;
        tracing::debug!(thread = %thread_id, %actor, ?kind, outcome = ?update.outcome, "thread reaction");
        Ok(update)
    }

    pub async fn react_to_comment(
        &self,
        thread_id: Uuid,
        comment_id: Uuid,
        actor: Uuid,
        kind: ReactionKind,
    ) -> Result<ReactionUpdate> {
        self.guard.authorize(actor, GuardTarget::Thread(thread_id)).await?;
        let update = self
            .threads
            .apply_comment_reaction(thread_id, comment_id, actor, kind)
            .await?;
        tracing::debug!(comment = %comment_id, %actor, ?kind, outcome = ?update.outcome, "comment reaction");
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::error::AppError;
    use domains::models::{Circle, Thread, ThreadContent};
    use domains::ports::{
        MockCircleRepo, MockLivePush, MockNotificationRepo, MockThreadRepo, MockUserDirectory,
    };
    use domains::reactions::ReactionOutcome;
    use crate::notifications::NotificationService;

    fn guard_for(circle: Circle, thread: Thread) -> Arc<MembershipService> {
        let mut circles = MockCircleRepo::new();
        circles.expect_get().returning(move |_| Ok(Some(circle.clone())));
        let mut threads = MockThreadRepo::new();
        threads.expect_get().returning(move |_| Ok(Some(thread.clone())));
        let mut users = MockUserDirectory::new();
        users.expect_get().returning(|_| Ok(None));

        let mut push = MockLivePush::new();
        push.expect_push().return_const(());
        let notifier = Arc::new(NotificationService::new(
            Arc::new(MockNotificationRepo::new()),
            Arc::new(MockCircleRepo::new()),
            Arc::new(push),
        ));
        Arc::new(MembershipService::new(
            Arc::new(circles),
            Arc::new(threads),
            Arc::new(users),
            notifier,
        ))
    }

    fn fixture() -> (Circle, Thread, Uuid) {
        let member = Uuid::now_v7();
        let mut circle = Circle::new("reactors", Uuid::now_v7());
        circle.members.insert(member);
        let thread = Thread::new(
            circle.id,
            member,
            ThreadContent::Discussion { title: "reactions".into(), body: "like or dislike".into() },
        );
        (circle, thread, member)
    }

    #[tokio::test]
    async fn guarded_reaction_reaches_the_repo() {
        let (circle, thread, member) = fixture();
        let thread_id = thread.id;

        let mut repo = MockThreadRepo::new();
        repo.expect_apply_thread_reaction()
            .withf(move |t, a, k| *t == thread_id && *a == member && *k == ReactionKind::Like)
            .times(1)
            .returning(|_, _, _| {
                Ok(ReactionUpdate { outcome: ReactionOutcome::Applied, likes: 1, dislikes: 0 })
            });

        let service = ReactionService::new(Arc::new(repo), guard_for(circle, thread));
        let update = service
            .react_to_thread(thread_id, member, ReactionKind::Like)
            .await
            .unwrap();
        assert_eq!(update.likes, 1);
    }

    #[tokio::test]
    async fn outsider_reaction_is_forbidden_before_any_mutation() {
        let (circle, thread, _member) = fixture();
        let thread_id = thread.id;

        let mut repo = MockThreadRepo::new();
        repo.expect_apply_thread_reaction().times(0);
        repo.expect_apply_comment_reaction().times(0);

        let service = ReactionService::new(Arc::new(repo), guard_for(circle, thread));
        let err = service
            .react_to_thread(thread_id, Uuid::now_v7(), ReactionKind::Dislike)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
