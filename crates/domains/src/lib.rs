//! circlehub/crates/domains/src/lib.rs
//!
//! The central domain logic and interface definitions for circlehub:
//! models, the reaction/vote state machines, validation bounds, the error
//! taxonomy and the port traits adapters implement.

pub mod error;
pub mod models;
pub mod ports;
pub mod reactions;
pub mod validation;

// Re-exporting for easier access in other crates
pub use error::{AppError, Result};
pub use models::*;
pub use ports::*;
pub use reactions::{ReactionKind, ReactionOutcome, ReactionUpdate};
