//! # Validation
//!
//! Field bounds checked before anything is persisted. Breaches surface as
//! `AppError::Validation` and never leave partial writes behind.

use crate::error::{AppError, Result};
use crate::models::ThreadContent;

pub const CIRCLE_NAME_MIN: usize = 3;
pub const CIRCLE_NAME_MAX: usize = 50;
pub const USERNAME_MIN: usize = 2;
pub const USERNAME_MAX: usize = 32;
pub const TITLE_MIN: usize = 5;
pub const TITLE_MAX: usize = 100;
pub const BODY_MIN: usize = 10;
pub const BODY_MAX: usize = 2000;
pub const REVIEW_MIN: usize = 10;
pub const REVIEW_MAX: usize = 500;
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 10;
pub const COMMENT_MIN: usize = 1;
pub const COMMENT_MAX: usize = 2000;
pub const QUESTION_MIN: usize = 5;
pub const OPTION_MIN: usize = 1;
pub const OPTION_MAX: usize = 100;
pub const MIN_OPTIONS: usize = 2;

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::Validation(format!(
            "{field} must be between {min} and {max} characters (got {len})"
        )));
    }
    Ok(())
}

fn check_min(field: &str, value: &str, min: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min {
        return Err(AppError::Validation(format!(
            "{field} must be at least {min} characters (got {len})"
        )));
    }
    Ok(())
}

pub fn circle_name(name: &str) -> Result<()> {
    check_len("circle name", name, CIRCLE_NAME_MIN, CIRCLE_NAME_MAX)
}

/// Usernames must be mentionable by the `@\w+` scanner, so only word
/// characters are allowed.
pub fn username(name: &str) -> Result<()> {
    check_len("username", name, USERNAME_MIN, USERNAME_MAX)?;
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(AppError::Validation(
            "username may only contain letters, digits and underscores".into(),
        ));
    }
    Ok(())
}

pub fn comment_text(text: &str) -> Result<()> {
    check_len("comment", text, COMMENT_MIN, COMMENT_MAX)
}

/// Validates a thread payload against the bounds for its variant.
pub fn thread_content(content: &ThreadContent) -> Result<()> {
    match content {
        ThreadContent::Poll { question, options, voted_users } => {
            check_min("poll question", question, QUESTION_MIN)?;
            if options.len() < MIN_OPTIONS {
                return Err(AppError::Validation(format!(
                    "a poll needs at least {MIN_OPTIONS} options"
                )));
            }
            for option in options {
                check_len("poll option", &option.text, OPTION_MIN, OPTION_MAX)?;
            }
            // Tallies are owned by the voting engine; a fresh poll starts empty.
            if !voted_users.is_empty() || options.iter().any(|o| o.vote_count != 0) {
                return Err(AppError::Validation("a new poll must start with zero votes".into()));
            }
            Ok(())
        }
        ThreadContent::Discussion { title, body } => {
            check_len("title", title, TITLE_MIN, TITLE_MAX)?;
            check_len("body", body, BODY_MIN, BODY_MAX)
        }
        ThreadContent::Recommendation { media_name, review, rating } => {
            check_len("media name", media_name, 1, TITLE_MAX)?;
            check_len("review", review, REVIEW_MIN, REVIEW_MAX)?;
            if *rating < RATING_MIN || *rating > RATING_MAX {
                return Err(AppError::Validation(format!(
                    "rating must be between {RATING_MIN} and {RATING_MAX}"
                )));
            }
            Ok(())
        }
    }
}
