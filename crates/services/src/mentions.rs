//! # MentionScanner
//!
//! Extracts `@handle` tokens from comment text. A mention is `@` followed
//! immediately by one or more word characters; a bare `@` is not a mention
//! and there is no escaping. Handles are case-sensitive and returned as a
//! distinct set, so `@alice @alice` collapses to one entry.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

static MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w+)").expect("mention regex"));

/// Returns the distinct handles mentioned in `text`, without the `@`.
pub fn scan(text: &str) -> BTreeSet<String> {
    MENTION_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}
