//! Error types for the line-artifacts library.
//!
//! Extraction failures are split the way the analyzer treats them: query and
//! row failures abort one extraction pass, storage failures mean the case is
//! incomplete, and notification failures are logged and skipped.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while extracting LINE artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Query preparation, execution or row access failed
    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    /// A discovered database file could not be opened
    #[error("Failed to open database {path}: {source}")]
    DatabaseOpen {
        /// Path of the database file
        path: PathBuf,
        /// Underlying SQLite error
        source: rusqlite::Error,
    },

    /// A database needed to resolve names was not found next to its main database
    #[error("Companion database {name} not found next to {db}")]
    CompanionNotFound {
        /// Main database path
        db: PathBuf,
        /// File name that was looked for
        name: String,
    },

    /// Writing a canonical record to the case repository failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Posting a stored record to listeners failed
    #[error("Notification error: {0}")]
    Notification(String),

    /// The case repository could not be opened or prepared
    #[error("Case initialization error: {0}")]
    CaseInit(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Result with `ArtifactError`
pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Failure reported by a destination sink for a single record.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The record was not persisted
    #[error("storage failure: {0}")]
    Storage(String),

    /// The record was persisted but listeners were not notified
    #[error("notification failure: {0}")]
    Notification(String),
}

impl From<SinkError> for ArtifactError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::Storage(msg) => Self::Storage(msg),
            SinkError::Notification(msg) => Self::Notification(msg),
        }
    }
}

impl From<rusqlite::Error> for SinkError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<config::ConfigError> for ArtifactError {
    fn from(err: config::ConfigError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
