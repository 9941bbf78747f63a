//! xpost - post to X (Twitter) from the command line
//!
//! This library provides the pieces behind the `xpost` CLI: a file-backed
//! history of posted items with named resumable threads, a thin X API client,
//! render/capture adapters for image attachments, and the orchestration that
//! ties them together.

pub mod capture;
pub mod config;
pub mod error;
pub mod history;
pub mod platform;
pub mod poster;
pub mod render;
pub mod types;

// Re-export commonly used types
pub use config::Credentials;
pub use error::{Result, XpostError};
pub use history::HistoryStore;
pub use platform::{permalink, MediaHandle, Platform, XClient};
pub use poster::PostOutcome;
pub use types::{HistoryState, PostRecord, ThreadEntry};
