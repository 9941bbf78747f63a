//! Mock platform for testing
//!
//! Records every call, hands out sequential post ids, and can be armed to
//! fail a specific create call. Used by the orchestration tests to verify
//! call ordering and the zero-remote-calls-on-local-failure property without
//! network access or credentials.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{PlatformError, Result};
use crate::platform::{MediaHandle, Platform};

/// One create call observed by the mock.
#[derive(Debug, Clone)]
pub struct MockPost {
    pub id: String,
    pub text: String,
    pub parent_id: Option<String>,
    pub media: Option<String>,
}

#[derive(Default)]
struct MockState {
    posts: Vec<MockPost>,
    create_calls: usize,
    upload_calls: usize,
    fail_create_at: Option<usize>,
    fail_upload: bool,
}

#[derive(Clone, Default)]
pub struct MockPlatform {
    state: Arc<Mutex<MockState>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`th create call (1-based) with a posting error.
    pub fn failing_create_at(n: usize) -> Self {
        let mock = Self::new();
        mock.state.lock().unwrap().fail_create_at = Some(n);
        mock
    }

    /// Fail every upload with an upload error.
    pub fn failing_uploads() -> Self {
        let mock = Self::new();
        mock.state.lock().unwrap().fail_upload = true;
        mock
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn upload_calls(&self) -> usize {
        self.state.lock().unwrap().upload_calls
    }

    /// Total remote calls of any kind.
    pub fn total_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.create_calls + state.upload_calls
    }

    pub fn posts(&self) -> Vec<MockPost> {
        self.state.lock().unwrap().posts.clone()
    }

    fn create(
        &self,
        text: &str,
        parent_id: Option<&str>,
        media: Option<&MediaHandle>,
    ) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;

        if state.fail_create_at == Some(state.create_calls) {
            return Err(PlatformError::Posting(format!(
                "mock failure on create call {}",
                state.create_calls
            ))
            .into());
        }

        let id = format!("mock-{}", state.posts.len() + 1);
        state.posts.push(MockPost {
            id: id.clone(),
            text: text.to_string(),
            parent_id: parent_id.map(str::to_string),
            media: media.map(|m| m.as_str().to_string()),
        });
        Ok(id)
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn create_post(&self, text: &str) -> Result<String> {
        self.create(text, None, None)
    }

    async fn create_reply(&self, text: &str, parent_id: &str) -> Result<String> {
        self.create(text, Some(parent_id), None)
    }

    async fn upload_media(&self, path: &Path) -> Result<MediaHandle> {
        let mut state = self.state.lock().unwrap();
        state.upload_calls += 1;

        if state.fail_upload {
            return Err(PlatformError::Upload("mock upload failure".to_string()).into());
        }

        Ok(MediaHandle::new(format!(
            "mock-media-{}:{}",
            state.upload_calls,
            path.display()
        )))
    }

    async fn create_post_with_media(&self, text: &str, media: &MediaHandle) -> Result<String> {
        self.create(text, None, Some(media))
    }

    async fn create_reply_with_media(
        &self,
        text: &str,
        media: &MediaHandle,
        parent_id: &str,
    ) -> Result<String> {
        self.create(text, Some(parent_id), Some(media))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_sequential_ids() {
        let mock = MockPlatform::new();
        assert_eq!(mock.create_post("a").await.unwrap(), "mock-1");
        assert_eq!(mock.create_reply("b", "mock-1").await.unwrap(), "mock-2");
        assert_eq!(mock.create_calls(), 2);

        let posts = mock.posts();
        assert_eq!(posts[1].parent_id.as_deref(), Some("mock-1"));
    }

    #[tokio::test]
    async fn test_mock_failing_create_at() {
        let mock = MockPlatform::failing_create_at(2);
        mock.create_post("a").await.unwrap();
        let err = mock.create_post("b").await.unwrap_err();
        assert!(err.to_string().contains("create call 2"));
        // Failed call still counted, nothing stored for it.
        assert_eq!(mock.create_calls(), 2);
        assert_eq!(mock.posts().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_upload_and_attach() {
        let mock = MockPlatform::new();
        let media = mock.upload_media(Path::new("/tmp/pic.png")).await.unwrap();
        let id = mock.create_post_with_media("caption", &media).await.unwrap();
        assert_eq!(id, "mock-1");
        assert_eq!(mock.upload_calls(), 1);
        assert_eq!(mock.posts()[0].media.as_deref(), Some(media.as_str()));
    }

    #[tokio::test]
    async fn test_mock_failing_uploads() {
        let mock = MockPlatform::failing_uploads();
        let err = mock.upload_media(Path::new("x.png")).await.unwrap_err();
        assert!(err.to_string().contains("upload"));
        assert_eq!(mock.create_calls(), 0);
    }
}
