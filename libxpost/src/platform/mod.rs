//! Platform abstraction and the X implementation
//!
//! The [`Platform`] trait covers the five remote operations the CLI needs.
//! All of them are synchronous request/response calls from the caller's point
//! of view; failures surface uniformly as `PlatformError` and terminate the
//! current command. No retry, no backoff, no rollback of completed calls.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

mod oauth;
pub mod x;

#[cfg(test)]
pub mod mock;

pub use x::XClient;

/// Opaque reference to an uploaded media file, usable in a subsequent
/// post or reply call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle(String);

impl MediaHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MediaHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Permalink for a post id.
pub fn permalink(id: &str) -> String {
    format!("https://x.com/i/status/{}", id)
}

#[async_trait]
pub trait Platform: Send + Sync {
    /// Create a standalone post. Returns the platform-assigned post id.
    async fn create_post(&self, text: &str) -> Result<String>;

    /// Create a post replying to `parent_id` via the platform's native
    /// reply relationship.
    async fn create_reply(&self, text: &str, parent_id: &str) -> Result<String>;

    /// Upload the file at `path` and return a handle for attaching it.
    /// The path is resolved to an absolute path before upload.
    async fn upload_media(&self, path: &Path) -> Result<MediaHandle>;

    /// Create a post carrying previously uploaded media.
    async fn create_post_with_media(&self, text: &str, media: &MediaHandle) -> Result<String>;

    /// Create a reply carrying previously uploaded media.
    async fn create_reply_with_media(
        &self,
        text: &str,
        media: &MediaHandle,
        parent_id: &str,
    ) -> Result<String>;
}
