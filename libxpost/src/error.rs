//! Error types for xpost

use thiserror::Error;

pub type Result<T> = std::result::Result<T, XpostError>;

#[derive(Error, Debug)]
pub enum XpostError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("External tool failed: {0}")]
    Tool(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl XpostError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            XpostError::InvalidInput(_) => 3,
            XpostError::NotFound(_) => 4,
            XpostError::Platform(PlatformError::Authentication(_)) => 2,
            XpostError::Platform(_) => 1,
            XpostError::Tool(_) => 1,
            XpostError::Config(_) => 1,
            XpostError::History(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required directory: {0}")]
    MissingDirectory(String),

    #[error("Failed to prepare directory: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse history file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Content rejected: {0}")]
    Validation(String),

    #[error("Posting failed: {0}")]
    Posting(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),
}
