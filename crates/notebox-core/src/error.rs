//! Error types for notebox-core

use thiserror::Error;

/// Result type alias using notebox-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in notebox-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Image/video processing error
    #[error("Media error: {0}")]
    Media(String),

    /// Background task failed to complete
    #[error("Background task failed: {0}")]
    Task(String),
}
