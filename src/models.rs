//! Canonical communication records
//!
//! This module contains the application-agnostic shapes every extractor
//! produces: contacts, messages and call logs, plus the addresses they refer to.

use serde::{Deserialize, Serialize};

/// Label stored as the message type of every extracted LINE message
pub const LINE_MESSAGE_TYPE: &str = "Line Message";

/// An account address: an app-internal identifier plus a display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// External identifier (LINE member id)
    pub id: String,
    /// Display label, empty when the source has none
    pub display_name: String,
}

impl Address {
    /// Build an address from owned or borrowed parts
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Recipients of a message: one counterpart, or every member of a group thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "addresses", rename_all = "snake_case")]
pub enum Recipients {
    /// A single recipient
    Single(Address),
    /// Group members, in the order the source listed them
    Group(Vec<Address>),
}

impl Recipients {
    /// The single recipient, if this is not a group
    #[must_use]
    pub const fn as_single(&self) -> Option<&Address> {
        match self {
            Self::Single(address) => Some(address),
            Self::Group(_) => None,
        }
    }

    /// True if the recipients are a group thread's member list
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

/// Direction of a message or call relative to the device owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommunicationDirection {
    /// Received by the device owner
    Incoming,
    /// Sent or placed by the device owner
    Outgoing,
}

impl CommunicationDirection {
    /// Stable name used in storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "INCOMING",
            Self::Outgoing => "OUTGOING",
        }
    }
}

/// Media of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallMediaType {
    /// Voice only
    Audio,
    /// Video call
    Video,
    /// Not recorded or not recognised
    Unknown,
}

impl CallMediaType {
    /// Stable name used in storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "AUDIO",
            Self::Video => "VIDEO",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Read state of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReadStatus {
    /// Seen by the recipient
    Read,
    /// Not yet seen
    Unread,
    /// The source does not record read state
    Unknown,
}

impl ReadStatus {
    /// Stable name used in storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Unread => "UNREAD",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// A contact known to the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// App-internal account identifier, used as join key by messages and calls
    pub account_id: String,
    /// Display name, may be empty
    pub display_name: String,
    /// Phone number
    pub phone: Option<String>,
    /// Home phone number
    pub home_phone: Option<String>,
    /// Mobile phone number
    pub mobile_phone: Option<String>,
    /// Email address
    pub email: Option<String>,
}

/// A text message, possibly carrying attachment references in its body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Label identifying the source app
    pub message_type: String,
    /// Direction relative to the device owner
    pub direction: CommunicationDirection,
    /// Sender, absent when it resolves to nobody
    pub from_address: Option<Address>,
    /// Recipient or group member list
    pub to_address: Option<Recipients>,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    /// Read state
    pub read_status: ReadStatus,
    /// Subject line
    pub subject: Option<String>,
    /// Content text with any attachment list appended
    pub body: Option<String>,
    /// Conversation identifier
    pub thread_id: Option<String>,
}

/// A call history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLogRecord {
    /// Direction relative to the device owner
    pub direction: CommunicationDirection,
    /// Caller
    pub from_address: Option<Address>,
    /// Callee
    pub to_address: Option<Address>,
    /// Seconds since the Unix epoch. Not guaranteed to precede `end_time`.
    pub start_time: i64,
    /// Seconds since the Unix epoch
    pub end_time: i64,
    /// Audio, video or unknown
    pub call_type: CallMediaType,
}
