//! # storage-adapters
//!
//! In-memory implementations of the circlehub persistence ports plus the
//! presence registry. A SQL-backed plugin would slot in behind the same
//! traits without touching the service layer.

pub mod memory;
pub mod presence;

pub use memory::{MemoryCircles, MemoryNotifications, MemoryThreads, MemoryUsers};
pub use presence::PresenceRegistry;
