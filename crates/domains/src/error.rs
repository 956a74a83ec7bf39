//! # AppError
//!
//! Centralized error handling for the circlehub ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Circle, Thread, Comment, Notification)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., body too long, unknown poll option)
    #[error("validation error: {0}")]
    Validation(String),

    /// Membership check failed: the actor is neither creator, moderator
    /// nor member of the circle the action targets.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource state collision (e.g., duplicate vote, duplicate join)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., store unavailable)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for `NotFound` with a displayable id.
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        AppError::NotFound(kind.to_string(), id.to_string())
    }
}

/// A specialized Result type for circlehub logic.
pub type Result<T> = std::result::Result<T, AppError>;
