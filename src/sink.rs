//! Destination for canonical records

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SinkError};
use crate::models::{CallLogRecord, ContactRecord, MessageRecord};

/// Communication account type of the source app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// LINE messenger
    Line,
}

impl AccountType {
    /// Stable name used in storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "LINE",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a sink's records are attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkScope {
    /// Parser reported as the producer of the records
    pub parser_name: String,
    /// Database file the records were extracted from
    pub source_file: PathBuf,
    /// Account type of the source app
    pub account_type: AccountType,
}

/// Receives the canonical records extracted from one database.
///
/// A [`SinkError::Storage`] means the record was lost; a
/// [`SinkError::Notification`] means it was stored but not announced.
pub trait CommunicationSink {
    /// Store a contact
    fn add_contact(&mut self, contact: ContactRecord) -> std::result::Result<(), SinkError>;

    /// Store a message
    fn add_message(&mut self, message: MessageRecord) -> std::result::Result<(), SinkError>;

    /// Store a call log entry
    fn add_calllog(&mut self, call: CallLogRecord) -> std::result::Result<(), SinkError>;
}

/// The case that extracted records are written into
pub trait CaseRepository {
    /// Open a sink for records extracted from one database file.
    ///
    /// An error here is fatal for the whole run.
    fn open_sink(&mut self, scope: &SinkScope) -> Result<Box<dyn CommunicationSink + '_>>;
}
