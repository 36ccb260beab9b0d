//! Sentinel codes from the LINE schema
//!
//! The raw values in these columns were reverse-engineered from observed app
//! behavior. Each one is decoded into a tagged enum with an explicit
//! catch-all variant, so a schema change in a newer app version only touches
//! the constants in [`crate::schema::codes`].

use crate::models::{CallMediaType, CommunicationDirection};
use crate::schema::codes;

/// Direction code: the final character of `call_history.call_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallDirectionCode {
    /// Trailing `O`
    Outgoing,
    /// Trailing `I`
    Incoming,
    /// Any other trailing character
    Other(char),
    /// NULL or empty column
    Missing,
}

impl CallDirectionCode {
    /// Decode from the raw column by looking only at its last character
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.and_then(|value| value.chars().last()) {
            Some(codes::OUTGOING_CALL) => Self::Outgoing,
            Some(codes::INCOMING_CALL) => Self::Incoming,
            Some(other) => Self::Other(other),
            None => Self::Missing,
        }
    }

    /// Only an explicit outgoing code is outgoing
    #[must_use]
    pub const fn direction(self) -> CommunicationDirection {
        match self {
            Self::Outgoing => CommunicationDirection::Outgoing,
            Self::Incoming | Self::Other(_) | Self::Missing => CommunicationDirection::Incoming,
        }
    }
}

/// Media code from `call_history.voip_type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoipTypeCode {
    /// Exactly `V`
    Video,
    /// Exactly `A`
    Audio,
    /// Anything else, including NULL
    Unrecognized(Option<String>),
}

impl VoipTypeCode {
    /// Decode by exact match
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(codes::VIDEO_CALL) => Self::Video,
            Some(codes::AUDIO_CALL) => Self::Audio,
            other => Self::Unrecognized(other.map(str::to_string)),
        }
    }

    /// The media type, or `None` when the caller should apply its default
    #[must_use]
    pub const fn media_type(&self) -> Option<CallMediaType> {
        match self {
            Self::Video => Some(CallMediaType::Video),
            Self::Audio => Some(CallMediaType::Audio),
            Self::Unrecognized(_) => None,
        }
    }
}

/// Status code from `chat_history.status`.
///
/// Best effort: in sample data status 1 only appeared on received messages
/// and 3 and 7 only on sent ones. There is no documented mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatusCode {
    /// Status 1
    Received,
    /// Any other status
    Other(i64),
}

impl MessageStatusCode {
    /// Decode the raw integer
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        if raw == codes::INCOMING_MESSAGE_STATUS {
            Self::Received
        } else {
            Self::Other(raw)
        }
    }

    /// Received is incoming; every other status is outgoing
    #[must_use]
    pub const fn direction(self) -> CommunicationDirection {
        match self {
            Self::Received => CommunicationDirection::Incoming,
            Self::Other(_) => CommunicationDirection::Outgoing,
        }
    }
}
