//! Database schema definitions
//!
//! Names of the LINE on-device databases and their sentinel codes, plus the
//! table and column names of the case database records are written to.
//! The LINE names track app version [`line::APP_VERSION`].

/// LINE application databases
pub mod line {
    /// Android package the databases belong to
    pub const PACKAGE_NAME: &str = "jp.naver.line.android";
    /// App version the queries were written against
    pub const APP_VERSION: &str = "9.15.1";
    /// Name reported as the parser of every stored record
    pub const PARSER_NAME: &str = "Line Parser";
    /// Database holding contacts, groups and chat history
    pub const CONTACTS_AND_MESSAGES_DB: &str = "naver_line";
    /// Database holding call history
    pub const CALL_HISTORY_DB: &str = "call_history";
    /// Schema alias the contacts database is attached under for call queries
    pub const CONTACTS_ALIAS: &str = "naver";
}

/// Raw codes whose meaning was inferred from observed data, not documentation
pub mod codes {
    /// Final character of `call_history.call_type` for an outgoing call
    pub const OUTGOING_CALL: char = 'O';
    /// Final character of `call_history.call_type` for an incoming call
    pub const INCOMING_CALL: char = 'I';
    /// `call_history.voip_type` for a video call
    pub const VIDEO_CALL: &str = "V";
    /// `call_history.voip_type` for an audio call
    pub const AUDIO_CALL: &str = "A";
    /// `chat_history.status` seen only on received messages
    pub const INCOMING_MESSAGE_STATUS: i64 = 1;
    /// `chat_history.attachement_type` of system/sticker rows that are never extracted
    pub const EXCLUDED_ATTACHMENT_TYPE: i64 = 6;
}

/// Case contacts table schema
pub mod contacts {
    /// Table name
    pub const TABLE: &str = "contacts";
    /// Primary key column
    pub const ID: &str = "id";
    /// LINE account identifier column
    pub const ACCOUNT_ID: &str = "account_id";
    /// Display name column
    pub const DISPLAY_NAME: &str = "display_name";
    /// Phone number column
    pub const PHONE: &str = "phone";
    /// Home phone column
    pub const HOME_PHONE: &str = "home_phone";
    /// Mobile phone column
    pub const MOBILE_PHONE: &str = "mobile_phone";
    /// Email address column
    pub const EMAIL: &str = "email";
}

/// Case messages table schema
pub mod messages {
    /// Table name
    pub const TABLE: &str = "messages";
    /// Primary key column
    pub const ID: &str = "id";
    /// Message type label column
    pub const MESSAGE_TYPE: &str = "message_type";
    /// Direction column
    pub const DIRECTION: &str = "direction";
    /// Sender address (JSON) column
    pub const FROM_ADDRESS: &str = "from_address";
    /// Recipients (JSON) column
    pub const TO_ADDRESS: &str = "to_address";
    /// Epoch seconds column
    pub const TIMESTAMP: &str = "timestamp";
    /// Read status column
    pub const READ_STATUS: &str = "read_status";
    /// Subject column
    pub const SUBJECT: &str = "subject";
    /// Body column
    pub const BODY: &str = "body";
    /// Thread identifier column
    pub const THREAD_ID: &str = "thread_id";
}

/// Case call log table schema
pub mod call_logs {
    /// Table name
    pub const TABLE: &str = "call_logs";
    /// Primary key column
    pub const ID: &str = "id";
    /// Direction column
    pub const DIRECTION: &str = "direction";
    /// Caller address (JSON) column
    pub const FROM_ADDRESS: &str = "from_address";
    /// Callee address (JSON) column
    pub const TO_ADDRESS: &str = "to_address";
    /// Start epoch seconds column
    pub const START_TIME: &str = "start_time";
    /// End epoch seconds column
    pub const END_TIME: &str = "end_time";
    /// Media type column
    pub const CALL_TYPE: &str = "call_type";
}

/// Provenance columns shared by every case table
pub mod provenance {
    /// Path of the source database file
    pub const SOURCE_FILE: &str = "source_file";
    /// Parser that produced the record
    pub const MODULE: &str = "module";
    /// Account type of the source app
    pub const ACCOUNT_TYPE: &str = "account_type";
    /// RFC 3339 time the record was stored
    pub const INGESTED_AT: &str = "ingested_at";
}
