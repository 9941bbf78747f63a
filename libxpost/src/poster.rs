//! Posting orchestration
//!
//! Each operation runs the remote calls in order, records the result to the
//! history store immediately after each successful platform call, and only
//! then reports success. There is no rollback: an uploaded file whose post
//! fails stays uploaded, and a thread that fails at item N keeps items
//! 1..N-1 posted and recorded.

use std::path::Path;

use crate::error::Result;
use crate::history::HistoryStore;
use crate::platform::{permalink, Platform};

/// Result of a successful posting operation.
#[derive(Debug, Clone)]
pub struct PostOutcome {
    pub id: String,
    pub url: String,
}

impl PostOutcome {
    fn new(id: String) -> Self {
        let url = permalink(&id);
        Self { id, url }
    }
}

/// Create a standalone post.
pub async fn post(
    platform: &dyn Platform,
    history: &HistoryStore,
    text: &str,
    thread_name: Option<&str>,
) -> Result<PostOutcome> {
    let id = platform.create_post(text).await?;
    history.record_post(&id, text, thread_name, None)?;
    tracing::info!(post_id = %id, "posted");
    Ok(PostOutcome::new(id))
}

/// Upload a file, then create a post carrying it. Two sequential remote
/// calls; a failing post after a successful upload orphans the media.
pub async fn post_with_media(
    platform: &dyn Platform,
    history: &HistoryStore,
    text: &str,
    media_path: &Path,
    thread_name: Option<&str>,
) -> Result<PostOutcome> {
    let media = platform.upload_media(media_path).await?;
    let id = platform.create_post_with_media(text, &media).await?;
    history.record_post(&id, text, thread_name, None)?;
    tracing::info!(post_id = %id, media = %media, "posted with media");
    Ok(PostOutcome::new(id))
}

/// Reply to an existing post.
pub async fn reply(
    platform: &dyn Platform,
    history: &HistoryStore,
    parent_id: &str,
    text: &str,
    thread_name: Option<&str>,
) -> Result<PostOutcome> {
    let id = platform.create_reply(text, parent_id).await?;
    history.record_post(&id, text, thread_name, Some(parent_id))?;
    tracing::info!(post_id = %id, parent_id, "replied");
    Ok(PostOutcome::new(id))
}

/// Reply to an existing post with uploaded media.
pub async fn reply_with_media(
    platform: &dyn Platform,
    history: &HistoryStore,
    parent_id: &str,
    text: &str,
    media_path: &Path,
    thread_name: Option<&str>,
) -> Result<PostOutcome> {
    let media = platform.upload_media(media_path).await?;
    let id = platform.create_reply_with_media(text, &media, parent_id).await?;
    history.record_post(&id, text, thread_name, Some(parent_id))?;
    tracing::info!(post_id = %id, parent_id, media = %media, "replied with media");
    Ok(PostOutcome::new(id))
}

/// Post a sequence of texts as a reply chain.
///
/// Partial failure is not rolled back: if item N fails, items 1..N-1 remain
/// posted and recorded, and the error is returned.
pub async fn post_thread(
    platform: &dyn Platform,
    history: &HistoryStore,
    items: &[String],
    thread_name: Option<&str>,
) -> Result<Vec<PostOutcome>> {
    let mut outcomes: Vec<PostOutcome> = Vec::with_capacity(items.len());

    for (index, text) in items.iter().enumerate() {
        let parent = outcomes.last().map(|o| o.id.clone());
        let id = match &parent {
            Some(parent_id) => platform.create_reply(text, parent_id).await?,
            None => platform.create_post(text).await?,
        };
        history.record_post(&id, text, thread_name, parent.as_deref())?;
        tracing::info!(post_id = %id, "posted {}/{}", index + 1, items.len());
        outcomes.push(PostOutcome::new(id));
    }

    Ok(outcomes)
}

/// Reply to the latest post of a named thread.
///
/// The thread name is resolved locally first: an unknown name fails before
/// any remote call is made.
pub async fn continue_thread(
    platform: &dyn Platform,
    history: &HistoryStore,
    name: &str,
    text: &str,
) -> Result<PostOutcome> {
    let latest = history.latest_id_for_thread(name)?;
    reply(platform, history, &latest, text, Some(name)).await
}

/// Reply with media to the latest post of a named thread.
pub async fn continue_thread_with_media(
    platform: &dyn Platform,
    history: &HistoryStore,
    name: &str,
    text: &str,
    media_path: &Path,
) -> Result<PostOutcome> {
    let latest = history.latest_id_for_thread(name)?;
    reply_with_media(platform, history, &latest, text, media_path, Some(name)).await
}
