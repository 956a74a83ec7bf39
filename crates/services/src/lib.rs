//! # services
//!
//! The use-case layer of circlehub. Each service takes its ports as
//! injected `Arc<dyn ...>` trait objects and orchestrates one slice of the
//! interaction flow: authorize → validate → mutate → side effects.

pub mod comments;
pub mod membership;
pub mod mentions;
pub mod notifications;
pub mod polls;
pub mod reactions;
pub mod threads;

pub use comments::CommentService;
pub use membership::{GuardTarget, MembershipService};
pub use notifications::NotificationService;
pub use polls::PollService;
pub use reactions::ReactionService;
pub use threads::{ThreadService, DEFAULT_PAGE_SIZE};
