//! LINE Artifacts - Communication Record Extraction
//!
//! A Rust library for extracting contacts, messages and call history from the
//! SQLite databases of the LINE Android app, as found in an extracted device
//! image, into a case database of canonical communication records.
//!
//! # Features
//!
//! - Discover `naver_line` and `call_history` databases under the app package
//! - Lazy, row-by-row extraction through [`extractors`]
//! - Group chats resolved to ordered member lists
//! - Pluggable fallback values through [`defaults::DefaultsProvider`]
//! - Pluggable destinations through [`sink::CaseRepository`]

/// Extraction pass orchestration
pub mod analyzer;
/// SQLite case repository
pub mod case_db;
/// Raw status and type codes stored by LINE
pub mod codes;
/// Configuration management
pub mod config;
/// Row access and lazy record streams
pub mod cursor;
/// Source database handles and discovery
pub mod db;
/// Fallback values for missing fields
pub mod defaults;
/// Error types
pub mod error;
/// Contacts, messages and call log extraction
pub mod extractors;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Source and case schema names
pub mod schema;
/// Destination traits for canonical records
pub mod sink;

// Re-export key components for easier access
pub use analyzer::{AnalysisReport, LineAnalyzer};
pub use case_db::CaseDatabase;
pub use db::{AppDatabase, DatabaseLocator, DirectoryLocator};
pub use defaults::{DefaultsProvider, OwnerDefaults};
pub use error::{ArtifactError, Result, SinkError};
pub use models::{Address, CallLogRecord, ContactRecord, MessageRecord, Recipients};
