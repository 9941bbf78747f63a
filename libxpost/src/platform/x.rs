//! X API client
//!
//! Thin adapter over two endpoints: `POST /2/tweets` (create post/reply) and
//! the v1.1 `media/upload.json` endpoint (multipart upload). Each request is
//! signed with OAuth 1.0a. Credentials are read once at construction and
//! validated lazily: the first remote call fails if they are missing.

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart;
use serde::Deserialize;

use crate::config::Credentials;
use crate::error::{PlatformError, Result};
use crate::platform::{oauth, MediaHandle, Platform};

const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";
const MEDIA_UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";

pub struct XClient {
    http: reqwest::Client,
    credentials: Credentials,
}

#[derive(Deserialize)]
struct TweetResponse {
    data: TweetData,
}

#[derive(Deserialize)]
struct TweetData {
    id: String,
}

#[derive(Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

impl XClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
        }
    }

    /// Client with credentials from the `X_API_KEY`/`X_ACCESS_TOKEN` family
    /// of environment variables.
    pub fn from_env() -> Self {
        Self::new(Credentials::from_env())
    }

    /// Create a tweet, optionally as a reply and/or carrying media.
    async fn create_tweet(
        &self,
        text: &str,
        parent_id: Option<&str>,
        media: Option<&MediaHandle>,
    ) -> Result<String> {
        let creds = self.credentials.require()?;
        // JSON body parameters do not participate in the OAuth signature.
        let auth = oauth::authorization_header(&creds, "POST", TWEETS_URL, &[]);

        let mut body = serde_json::json!({ "text": text });
        if let Some(parent) = parent_id {
            body["reply"] = serde_json::json!({ "in_reply_to_tweet_id": parent });
        }
        if let Some(media) = media {
            body["media"] = serde_json::json!({ "media_ids": [media.as_str()] });
        }

        tracing::debug!(reply_to = ?parent_id, has_media = media.is_some(), "creating tweet");

        let response = self
            .http
            .post(TWEETS_URL)
            .header(AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, "create tweet"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, "create tweet"))?;

        if !status.is_success() {
            return Err(map_status(status, &body, "create tweet").into());
        }

        let parsed: TweetResponse = serde_json::from_str(&body).map_err(|e| {
            PlatformError::Posting(format!("unexpected create-tweet response: {}", e))
        })?;

        Ok(parsed.data.id)
    }
}

#[async_trait]
impl Platform for XClient {
    async fn create_post(&self, text: &str) -> Result<String> {
        self.create_tweet(text, None, None).await
    }

    async fn create_reply(&self, text: &str, parent_id: &str) -> Result<String> {
        self.create_tweet(text, Some(parent_id), None).await
    }

    async fn upload_media(&self, path: &Path) -> Result<MediaHandle> {
        let absolute = std::fs::canonicalize(path).map_err(|e| {
            PlatformError::Upload(format!("cannot resolve {}: {}", path.display(), e))
        })?;
        let bytes = tokio::fs::read(&absolute).await.map_err(|e| {
            PlatformError::Upload(format!("cannot read {}: {}", absolute.display(), e))
        })?;

        let file_name = absolute
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string());

        let creds = self.credentials.require()?;
        // Multipart bodies are excluded from the signature, like JSON ones.
        let auth = oauth::authorization_header(&creds, "POST", MEDIA_UPLOAD_URL, &[]);

        let form =
            multipart::Form::new().part("media", multipart::Part::bytes(bytes).file_name(file_name));

        tracing::debug!(path = %absolute.display(), "uploading media");

        let response = self
            .http
            .post(MEDIA_UPLOAD_URL)
            .header(AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(e, "upload media"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, "upload media"))?;

        if !status.is_success() {
            return Err(map_status(status, &body, "upload media").into());
        }

        let parsed: MediaUploadResponse = serde_json::from_str(&body).map_err(|e| {
            PlatformError::Upload(format!("unexpected media-upload response: {}", e))
        })?;

        Ok(MediaHandle::new(parsed.media_id_string))
    }

    async fn create_post_with_media(&self, text: &str, media: &MediaHandle) -> Result<String> {
        self.create_tweet(text, None, Some(media)).await
    }

    async fn create_reply_with_media(
        &self,
        text: &str,
        media: &MediaHandle,
        parent_id: &str,
    ) -> Result<String> {
        self.create_tweet(text, Some(parent_id), Some(media)).await
    }
}

/// Map an HTTP status to a `PlatformError`, keeping a trimmed response body
/// for the user-facing message.
fn map_status(status: reqwest::StatusCode, body: &str, context: &str) -> PlatformError {
    let detail = summarize_body(body);
    match status.as_u16() {
        401 | 403 => PlatformError::Authentication(format!(
            "{} rejected ({}): {}. Check the X_API_KEY/X_ACCESS_TOKEN variables.",
            context, status, detail
        )),
        429 => PlatformError::RateLimit(format!("{} ({}): {}", context, status, detail)),
        400 | 422 => PlatformError::Validation(format!("{} ({}): {}", context, status, detail)),
        code if code >= 500 => {
            PlatformError::Network(format!("{} ({}): {}", context, status, detail))
        }
        _ => PlatformError::Posting(format!("{} ({}): {}", context, status, detail)),
    }
}

fn transport_error(error: reqwest::Error, context: &str) -> PlatformError {
    PlatformError::Network(format!("{}: {}", context, error))
}

/// First line of the response body, capped, so errors stay one line.
fn summarize_body(body: &str) -> String {
    let line = body.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return "(empty response body)".to_string();
    }
    let mut out: String = line.chars().take(200).collect();
    if out.len() < line.len() {
        out.push_str("...");
    }
    out
}
