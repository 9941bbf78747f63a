//! Core types for xpost

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of post records retained in history.
pub const MAX_RECORDS: usize = 100;

/// Maximum number of characters kept in a stored snippet.
pub const SNIPPET_CHARS: usize = 100;

/// One published post, as remembered locally.
///
/// `text` is a display-only snippet, not the full posted text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Platform-assigned post id, opaque.
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl PostRecord {
    /// Build a record for a just-published post, truncating the text to a snippet.
    pub fn new(
        id: impl Into<String>,
        text: &str,
        thread_name: Option<&str>,
        parent_id: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            text: snippet(text),
            created_at: Utc::now(),
            thread_name: thread_name.map(str::to_string),
            parent_id: parent_id.map(str::to_string),
        }
    }
}

/// Resumable state of a named thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadEntry {
    /// Id of the thread's first post. Set once, never overwritten.
    pub first_post_id: String,
    /// Id of the most recently appended post.
    pub latest_post_id: String,
    pub updated_at: DateTime<Utc>,
}

/// Everything persisted by the history store: one JSON file, overwritten wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryState {
    pub posts: Vec<PostRecord>,
    pub threads: BTreeMap<String, ThreadEntry>,
}

/// Truncate text to the first [`SNIPPET_CHARS`] characters, marking truncation
/// with an ellipsis. Counts characters, not bytes, so multibyte text is safe.
pub fn snippet(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(SNIPPET_CHARS) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
