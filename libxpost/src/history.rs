//! File-backed history of posted items and named threads
//!
//! The store owns a single JSON file shaped as
//! `{ "posts": [...], "threads": { name: entry } }`, overwritten wholesale on
//! every update. Posts are kept most-recent-first and capped at
//! [`MAX_RECORDS`]; the cap is the only form of record removal.

use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config;
use crate::error::{HistoryError, Result, XpostError};
use crate::types::{HistoryState, PostRecord, ThreadEntry, MAX_RECORDS};

pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the store at the configured default location.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(config::history_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state. A missing file is the valid empty initial
    /// state, not an error.
    pub fn load(&self) -> Result<HistoryState> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(HistoryState::default())
            }
            Err(e) => return Err(HistoryError::Io(e).into()),
        };

        let state = serde_json::from_str(&content).map_err(HistoryError::Parse)?;
        Ok(state)
    }

    /// Persist the full state, replacing any prior content.
    pub fn save(&self, state: &HistoryState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(HistoryError::Io)?;
        }
        let json = serde_json::to_string_pretty(state).map_err(HistoryError::Parse)?;
        std::fs::write(&self.path, json).map_err(HistoryError::Io)?;
        Ok(())
    }

    /// Record a freshly published post.
    ///
    /// Loads, updates, and rewrites the whole file. This read-modify-write is
    /// not protected against concurrent invocations: two processes recording
    /// at once can lose one update. Accepted for a single-operator tool.
    pub fn record_post(
        &self,
        id: &str,
        text: &str,
        thread_name: Option<&str>,
        parent_id: Option<&str>,
    ) -> Result<PostRecord> {
        let mut state = self.load()?;

        let record = PostRecord::new(id, text, thread_name, parent_id);
        state.posts.insert(0, record.clone());
        state.posts.truncate(MAX_RECORDS);

        if let Some(name) = thread_name {
            let now = Utc::now();
            match state.threads.entry(name.to_string()) {
                Entry::Occupied(mut entry) => {
                    let thread = entry.get_mut();
                    thread.latest_post_id = id.to_string();
                    thread.updated_at = now;
                }
                Entry::Vacant(entry) => {
                    entry.insert(ThreadEntry {
                        first_post_id: id.to_string(),
                        latest_post_id: id.to_string(),
                        updated_at: now,
                    });
                }
            }
        }

        self.save(&state)?;
        tracing::debug!(post_id = id, thread = ?thread_name, "recorded post");
        Ok(record)
    }

    /// Latest post id of a named thread, for continuation.
    pub fn latest_id_for_thread(&self, name: &str) -> Result<String> {
        let state = self.load()?;
        state
            .threads
            .get(name)
            .map(|thread| thread.latest_post_id.clone())
            .ok_or_else(|| {
                XpostError::NotFound(format!(
                    "Thread \"{}\" not found. Run `xpost threads` to list saved threads.",
                    name
                ))
            })
    }

    /// The `count` most recent records, newest first.
    pub fn recent(&self, count: usize) -> Result<Vec<PostRecord>> {
        let mut state = self.load()?;
        state.posts.truncate(count);
        Ok(state.posts)
    }

    /// All named threads, keyed by name.
    pub fn threads(&self) -> Result<std::collections::BTreeMap<String, ThreadEntry>> {
        Ok(self.load()?.threads)
    }
}
