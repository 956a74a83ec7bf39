//! # api-adapters
//!
//! The web routing and orchestration layer for circlehub.
//!
//! # Developer Note
//! The router is returned unmounted so the binary can nest it under a
//! different prefix (e.g. /api/v1/) without touching the handlers.

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod events;
#[cfg(feature = "web-axum")]
pub mod handlers;

#[cfg(feature = "web-axum")]
pub use web::{router, AppState};

#[cfg(feature = "web-axum")]
mod web {
    use std::sync::Arc;

    use axum::http::Method;
    use axum::routing::{get, post};
    use axum::Router;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    use domains::ports::UserDirectory;
    use services::{
        CommentService, MembershipService, NotificationService, PollService, ReactionService,
        ThreadService,
    };
    use storage_adapters::{
        MemoryCircles, MemoryNotifications, MemoryThreads, MemoryUsers, PresenceRegistry,
    };

    use crate::events;
    use crate::handlers;

    /// Everything the handlers need, injected once at composition time.
    /// No process-wide singletons: the presence registry and every store
    /// live behind this state.
    #[derive(Clone)]
    pub struct AppState {
        pub membership: Arc<MembershipService>,
        pub threads: Arc<ThreadService>,
        pub comments: Arc<CommentService>,
        pub reactions: Arc<ReactionService>,
        pub polls: Arc<PollService>,
        pub notifier: Arc<NotificationService>,
        pub users: Arc<dyn UserDirectory>,
        pub presence: Arc<PresenceRegistry>,
    }

    impl AppState {
        /// Wires the full engine over the in-memory adapters. Used by the
        /// binary and by the integration tests.
        pub fn in_memory(default_page_size: usize) -> Self {
            let circles = Arc::new(MemoryCircles::new());
            let threads = Arc::new(MemoryThreads::new());
            let users = Arc::new(MemoryUsers::new());
            let notifications = Arc::new(MemoryNotifications::new());
            let presence = Arc::new(PresenceRegistry::new());

            let notifier = Arc::new(NotificationService::new(
                notifications,
                circles.clone(),
                presence.clone(),
            ));
            let membership = Arc::new(MembershipService::new(
                circles.clone(),
                threads.clone(),
                users.clone(),
                notifier.clone(),
            ));
            let thread_service = Arc::new(ThreadService::new(
                threads.clone(),
                membership.clone(),
                notifier.clone(),
                default_page_size,
            ));
            let comments = Arc::new(CommentService::new(
                threads.clone(),
                users.clone(),
                membership.clone(),
                notifier.clone(),
            ));
            let reactions = Arc::new(ReactionService::new(threads.clone(), membership.clone()));
            let polls = Arc::new(PollService::new(threads, membership.clone()));

            AppState {
                membership,
                threads: thread_service,
                comments,
                reactions,
                polls,
                notifier,
                users,
                presence,
            }
        }
    }

    /// Configures the routes for the circle engine.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/users", post(handlers::create_user))
            .route("/users/{id}", get(handlers::get_user))
            .route("/circles", post(handlers::create_circle))
            .route(
                "/circles/{id}",
                get(handlers::get_circle).delete(handlers::delete_circle),
            )
            .route("/circles/{id}/join", post(handlers::join_circle))
            .route("/circles/{id}/leave", post(handlers::leave_circle))
            .route("/circles/{id}/membership", get(handlers::membership_status))
            .route(
                "/circles/{id}/threads",
                post(handlers::create_thread).get(handlers::list_threads),
            )
            .route(
                "/threads/{id}",
                get(handlers::get_thread).delete(handlers::delete_thread),
            )
            .route("/threads/{id}/comments", post(handlers::add_comment))
            .route("/threads/{id}/reactions", post(handlers::react_to_thread))
            .route(
                "/threads/{id}/comments/{comment_id}/reactions",
                post(handlers::react_to_comment),
            )
            .route("/threads/{id}/votes", post(handlers::vote))
            .route("/notifications", get(handlers::list_notifications))
            .route(
                "/notifications/{id}/read",
                post(handlers::mark_notification_read),
            )
            .route("/events", get(events::stream))
            .layer(cors_policy())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    // CORS matters if the UI and API ever live on different subdomains.
    fn cors_policy() -> CorsLayer {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_headers(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
    }
}
