//! # ThreadService
//!
//! The content-store front for polymorphic threads: creation, lookup,
//! paginated listing and deletion. Creation notifies the circle owner
//! (suppressed when the author IS the owner); reads are unguarded.

use std::sync::Arc;

use uuid::Uuid;

use domains::error::{AppError, Result};
use domains::models::{NotificationKind, Page, Thread, ThreadContent, ThreadKind, ThreadSort};
use domains::ports::ThreadRepo;
use domains::validation;

use crate::membership::{GuardTarget, MembershipService};
use crate::notifications::NotificationService;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

pub struct ThreadService {
    threads: Arc<dyn ThreadRepo>,
    guard: Arc<MembershipService>,
    notifier: Arc<NotificationService>,
    default_page_size: usize,
}

fn kind_label(kind: ThreadKind) -> &'static str {
    match kind {
        ThreadKind::Poll => "poll",
        ThreadKind::Discussion => "discussion",
        ThreadKind::Recommendation => "recommendation",
    }
}

impl ThreadService {
    pub fn new(
        threads: Arc<dyn ThreadRepo>,
        guard: Arc<MembershipService>,
        notifier: Arc<NotificationService>,
        default_page_size: usize,
    ) -> Self {
        Self { threads, guard, notifier, default_page_size }
    }

    /// Guard → validate → persist → notify owner. Validation failures
    /// surface before anything is written.
    pub async fn create_thread(
        &self,
        circle_id: Uuid,
        author_id: Uuid,
        content: ThreadContent,
    ) -> Result<Thread> {
        let circle = self.guard.authorize(author_id, GuardTarget::Circle(circle_id)).await?;
        validation::thread_content(&content)?;

        let thread = Thread::new(circle_id, author_id, content);
        self.threads.insert(thread.clone()).await?;
        tracing::info!(thread = %thread.id, circle = %circle_id, kind = ?thread.kind(), "thread created");

        let author = self.guard.display_name(author_id).await;
        let message = format!(
            "{} posted a new {} in \"{}\"",
            author,
            kind_label(thread.kind()),
            circle.name
        );
        if let Err(err) = self
            .notifier
            .notify_circle_owner(
                circle_id,
                author_id,
                NotificationKind::NewThread,
                message,
                Some(format!("/threads/{}", thread.id)),
            )
            .await
        {
            // The thread is committed; a lost owner notification is not a
            // reason to fail the post.
            tracing::warn!(thread = %thread.id, error = %err, "owner thread notification failed");
        }

        Ok(thread)
    }

    pub async fn get_thread(&self, id: Uuid) -> Result<Thread> {
        self.threads
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Thread", id))
    }

    /// `page` is 1-based (0 is a validation error); the page size defaults
    /// from configuration and is capped. `sort` defaults to newest first.
    pub async fn list_threads(
        &self,
        circle_id: Uuid,
        kind: Option<ThreadKind>,
        page: Option<usize>,
        page_size: Option<usize>,
        sort: Option<ThreadSort>,
    ) -> Result<Page<Thread>> {
        // Listing a missing circle is NotFound, not an empty page.
        self.guard.resolve(GuardTarget::Circle(circle_id)).await?;

        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::Validation("page must be >= 1".into()));
        }
        let page_size = page_size.unwrap_or(self.default_page_size);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        self.threads
            .list(circle_id, kind, sort.unwrap_or_default(), page, page_size)
            .await
    }

    /// Deletion cascades to the thread's comments by composition. Only the
    /// author, a moderator or the circle creator may delete.
    pub async fn delete_thread(&self, thread_id: Uuid, actor: Uuid) -> Result<()> {
        let thread = self.get_thread(thread_id).await?;
        let circle = self.guard.resolve(GuardTarget::Circle(thread.circle_id)).await?;
        if thread.author_id != actor && !circle.is_creator(actor) && !circle.is_moderator(actor) {
            return Err(AppError::Forbidden(
                "only the author, a moderator or the creator may delete a thread".into(),
            ));
        }
        self.threads.delete(thread_id).await?;
        tracing::info!(thread = %thread_id, "thread deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::models::Circle;
    use domains::ports::{
        MockCircleRepo, MockLivePush, MockNotificationRepo, MockThreadRepo, MockUserDirectory,
    };

    fn wire(
        circle: Circle,
        threads: MockThreadRepo,
        notifications: MockNotificationRepo,
    ) -> ThreadService {
        let circle_for_guard = circle.clone();
        let mut guard_circles = MockCircleRepo::new();
        guard_circles
            .expect_get()
            .returning(move |_| Ok(Some(circle_for_guard.clone())));

        let mut notifier_circles = MockCircleRepo::new();
        notifier_circles.expect_get().returning(move |_| Ok(Some(circle.clone())));

        let mut push = MockLivePush::new();
        push.expect_push().return_const(());
        let notifier = Arc::new(NotificationService::new(
            Arc::new(notifications),
            Arc::new(notifier_circles),
            Arc::new(push),
        ));

        let mut users = MockUserDirectory::new();
        users.expect_get().returning(|_| Ok(None));

        let guard = Arc::new(MembershipService::new(
            Arc::new(guard_circles),
            Arc::new(MockThreadRepo::new()),
            Arc::new(users),
            notifier.clone(),
        ));
        ThreadService::new(Arc::new(threads), guard, notifier, DEFAULT_PAGE_SIZE)
    }

    fn discussion() -> ThreadContent {
        ThreadContent::Discussion { title: "movie night".into(), body: "friday at eight".into() }
    }

    #[tokio::test]
    async fn member_post_notifies_the_owner() {
        let creator = Uuid::now_v7();
        let member = Uuid::now_v7();
        let mut circle = Circle::new("club", creator);
        circle.members.insert(member);
        let circle_id = circle.id;

        let mut threads = MockThreadRepo::new();
        threads.expect_insert().times(1).returning(|_| Ok(()));
        let mut notifications = MockNotificationRepo::new();
        notifications
            .expect_insert()
            .withf(move |n| n.recipient_id == creator && n.kind == NotificationKind::NewThread)
            .times(1)
            .returning(|_| Ok(()));

        let service = wire(circle, threads, notifications);
        service.create_thread(circle_id, member, discussion()).await.unwrap();
    }

    #[tokio::test]
    async fn creator_post_produces_no_notification() {
        let creator = Uuid::now_v7();
        let circle = Circle::new("club", creator);
        let circle_id = circle.id;

        let mut threads = MockThreadRepo::new();
        threads.expect_insert().times(1).returning(|_| Ok(()));
        let mut notifications = MockNotificationRepo::new();
        notifications.expect_insert().times(0);

        let service = wire(circle, threads, notifications);
        service.create_thread(circle_id, creator, discussion()).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_content_never_reaches_the_store() {
        let creator = Uuid::now_v7();
        let circle = Circle::new("club", creator);
        let circle_id = circle.id;

        let mut threads = MockThreadRepo::new();
        threads.expect_insert().times(0);

        let service = wire(circle, threads, MockNotificationRepo::new());
        let err = service
            .create_thread(
                circle_id,
                creator,
                ThreadContent::Discussion { title: "x".into(), body: "y".into() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn outsider_cannot_post() {
        let creator = Uuid::now_v7();
        let circle = Circle::new("club", creator);
        let circle_id = circle.id;

        let mut threads = MockThreadRepo::new();
        threads.expect_insert().times(0);

        let service = wire(circle, threads, MockNotificationRepo::new());
        let err = service
            .create_thread(circle_id, Uuid::now_v7(), discussion())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn page_zero_is_rejected() {
        let creator = Uuid::now_v7();
        let circle = Circle::new("club", creator);
        let circle_id = circle.id;

        let service = wire(circle, MockThreadRepo::new(), MockNotificationRepo::new());
        let err = service
            .list_threads(circle_id, None, Some(0), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn sort_defaults_to_newest_first() {
        let creator = Uuid::now_v7();
        let circle = Circle::new("club", creator);
        let circle_id = circle.id;

        let mut threads = MockThreadRepo::new();
        threads
            .expect_list()
            .withf(|_, _, sort, _, _| *sort == ThreadSort::Newest)
            .times(1)
            .returning(|_, _, _, page, page_size| {
                Ok(Page::slice(Vec::new(), page, page_size))
            });

        let service = wire(circle, threads, MockNotificationRepo::new());
        service.list_threads(circle_id, None, None, None, None).await.unwrap();
    }
}
