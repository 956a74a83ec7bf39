//! Shared wiring for the integration suite: the full engine over the
//! in-memory adapters, plus fixture helpers.

use std::sync::Arc;

use uuid::Uuid;

use domains::models::{Circle, User};
use services::{
    CommentService, MembershipService, NotificationService, PollService, ReactionService,
    ThreadService, DEFAULT_PAGE_SIZE,
};
use storage_adapters::{
    MemoryCircles, MemoryNotifications, MemoryThreads, MemoryUsers, PresenceRegistry,
};

pub struct Engine {
    pub circles: Arc<MemoryCircles>,
    pub thread_store: Arc<MemoryThreads>,
    pub users: Arc<MemoryUsers>,
    pub notifications: Arc<MemoryNotifications>,
    pub presence: Arc<PresenceRegistry>,

    pub membership: Arc<MembershipService>,
    pub threads: Arc<ThreadService>,
    pub comments: Arc<CommentService>,
    pub reactions: Arc<ReactionService>,
    pub polls: Arc<PollService>,
    pub notifier: Arc<NotificationService>,
}

impl Engine {
    pub fn new() -> Self {
        let circles = Arc::new(MemoryCircles::new());
        let thread_store = Arc::new(MemoryThreads::new());
        let users = Arc::new(MemoryUsers::new());
        let notifications = Arc::new(MemoryNotifications::new());
        let presence = Arc::new(PresenceRegistry::new());

        let notifier = Arc::new(NotificationService::new(
            notifications.clone(),
            circles.clone(),
            presence.clone(),
        ));
        let membership = Arc::new(MembershipService::new(
            circles.clone(),
            thread_store.clone(),
            users.clone(),
            notifier.clone(),
        ));
        let threads = Arc::new(ThreadService::new(
            thread_store.clone(),
            membership.clone(),
            notifier.clone(),
            DEFAULT_PAGE_SIZE,
        ));
        let comments = Arc::new(CommentService::new(
            thread_store.clone(),
            users.clone(),
            membership.clone(),
            notifier.clone(),
        ));
        let reactions = Arc::new(ReactionService::new(thread_store.clone(), membership.clone()));
        let polls = Arc::new(PollService::new(thread_store.clone(), membership.clone()));

        Engine {
            circles,
            thread_store,
            users,
            notifications,
            presence,
            membership,
            threads,
            comments,
            reactions,
            polls,
            notifier,
        }
    }

    pub async fn user(&self, username: &str) -> User {
        use domains::ports::UserDirectory;
        let user = User::new(username);
        self.users.insert(user.clone()).await.expect("insert user");
        user
    }

    /// Creates a circle and joins the given members.
    pub async fn circle(&self, creator: Uuid, name: &str, members: &[Uuid]) -> Circle {
        let circle = self
            .membership
            .create_circle(creator, name)
            .await
            .expect("create circle");
        for member in members {
            self.membership.join(circle.id, *member).await.expect("join circle");
        }
        self.membership.get_circle(circle.id).await.expect("reload circle")
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
