//! SQLite case repository
//!
//! Stores every canonical record with the file it came from. Addresses and
//! recipient lists are stored as JSON text.

use std::fs;
use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ArtifactError, Result, SinkError};
use crate::models::{CallLogRecord, ContactRecord, MessageRecord};
use crate::schema::{call_logs, contacts, messages, provenance};
use crate::sink::{CaseRepository, CommunicationSink, SinkScope};

/// Case database manager
#[derive(Debug)]
pub struct CaseDatabase {
    conn: Connection,
}

/// Number of stored records per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseSummary {
    /// Stored contacts
    pub contacts: usize,
    /// Stored messages
    pub messages: usize,
    /// Stored call log entries
    pub call_logs: usize,
}

impl CaseDatabase {
    /// Open or create the case database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| ArtifactError::CaseInit(format!("{}: {e}", path.display())))?;
        Self::init_schema(&conn)?;

        info!(case = %path.display(), "Opened case database");
        Ok(Self { conn })
    }

    /// A case that lives only as long as this value
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| ArtifactError::CaseInit(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Create the record tables if they don't exist
    fn init_schema(conn: &Connection) -> Result<()> {
        let provenance_columns = format!(
            "{} TEXT NOT NULL, {} TEXT NOT NULL, {} TEXT NOT NULL, {} TEXT NOT NULL",
            provenance::SOURCE_FILE,
            provenance::MODULE,
            provenance::ACCOUNT_TYPE,
            provenance::INGESTED_AT
        );

        let ddl = format!(
            "
            CREATE TABLE IF NOT EXISTS {contacts_table} (
                {c_id} INTEGER PRIMARY KEY AUTOINCREMENT,
                {c_account} TEXT NOT NULL,
                {c_name} TEXT NOT NULL,
                {c_phone} TEXT,
                {c_home} TEXT,
                {c_mobile} TEXT,
                {c_email} TEXT,
                {provenance_columns}
            );
            CREATE TABLE IF NOT EXISTS {messages_table} (
                {m_id} INTEGER PRIMARY KEY AUTOINCREMENT,
                {m_type} TEXT NOT NULL,
                {m_direction} TEXT NOT NULL,
                {m_from} TEXT,
                {m_to} TEXT,
                {m_timestamp} INTEGER NOT NULL,
                {m_read} TEXT NOT NULL,
                {m_subject} TEXT,
                {m_body} TEXT,
                {m_thread} TEXT,
                {provenance_columns}
            );
            CREATE TABLE IF NOT EXISTS {calls_table} (
                {l_id} INTEGER PRIMARY KEY AUTOINCREMENT,
                {l_direction} TEXT NOT NULL,
                {l_from} TEXT,
                {l_to} TEXT,
                {l_start} INTEGER NOT NULL,
                {l_end} INTEGER NOT NULL,
                {l_type} TEXT NOT NULL,
                {provenance_columns}
            );
            ",
            contacts_table = contacts::TABLE,
            c_id = contacts::ID,
            c_account = contacts::ACCOUNT_ID,
            c_name = contacts::DISPLAY_NAME,
            c_phone = contacts::PHONE,
            c_home = contacts::HOME_PHONE,
            c_mobile = contacts::MOBILE_PHONE,
            c_email = contacts::EMAIL,
            messages_table = messages::TABLE,
            m_id = messages::ID,
            m_type = messages::MESSAGE_TYPE,
            m_direction = messages::DIRECTION,
            m_from = messages::FROM_ADDRESS,
            m_to = messages::TO_ADDRESS,
            m_timestamp = messages::TIMESTAMP,
            m_read = messages::READ_STATUS,
            m_subject = messages::SUBJECT,
            m_body = messages::BODY,
            m_thread = messages::THREAD_ID,
            calls_table = call_logs::TABLE,
            l_id = call_logs::ID,
            l_direction = call_logs::DIRECTION,
            l_from = call_logs::FROM_ADDRESS,
            l_to = call_logs::TO_ADDRESS,
            l_start = call_logs::START_TIME,
            l_end = call_logs::END_TIME,
            l_type = call_logs::CALL_TYPE,
        );

        conn.execute_batch(&ddl)
            .map_err(|e| ArtifactError::CaseInit(format!("Failed to create case tables: {e}")))
    }

    /// Raw access for reporting queries
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Count stored records per kind
    pub fn summary(&self) -> Result<CaseSummary> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(usize::try_from(n).unwrap_or_default())
        };

        Ok(CaseSummary {
            contacts: count(contacts::TABLE)?,
            messages: count(messages::TABLE)?,
            call_logs: count(call_logs::TABLE)?,
        })
    }
}

impl CaseRepository for CaseDatabase {
    fn open_sink(&mut self, scope: &SinkScope) -> Result<Box<dyn CommunicationSink + '_>> {
        debug!(source = %scope.source_file.display(), parser = %scope.parser_name, "Opening case sink");
        Ok(Box::new(CaseSink {
            conn: &self.conn,
            source_file: scope.source_file.to_string_lossy().into_owned(),
            module: scope.parser_name.clone(),
            account_type: scope.account_type.as_str(),
        }))
    }
}

/// Writes one database's records into the case
struct CaseSink<'a> {
    conn: &'a Connection,
    source_file: String,
    module: String,
    account_type: &'static str,
}

fn to_json<T: Serialize>(value: Option<&T>) -> std::result::Result<Option<String>, SinkError> {
    Ok(value.map(serde_json::to_string).transpose()?)
}

impl CaseSink<'_> {
    fn ingested_at() -> String {
        Utc::now().to_rfc3339()
    }
}

impl CommunicationSink for CaseSink<'_> {
    fn add_contact(&mut self, contact: ContactRecord) -> std::result::Result<(), SinkError> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                contacts::TABLE,
                contacts::ACCOUNT_ID,
                contacts::DISPLAY_NAME,
                contacts::PHONE,
                contacts::HOME_PHONE,
                contacts::MOBILE_PHONE,
                contacts::EMAIL,
                provenance::SOURCE_FILE,
                provenance::MODULE,
                provenance::ACCOUNT_TYPE,
                provenance::INGESTED_AT
            ),
            params![
                contact.account_id,
                contact.display_name,
                contact.phone,
                contact.home_phone,
                contact.mobile_phone,
                contact.email,
                self.source_file,
                self.module,
                self.account_type,
                Self::ingested_at()
            ],
        )?;
        Ok(())
    }

    fn add_message(&mut self, message: MessageRecord) -> std::result::Result<(), SinkError> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                messages::TABLE,
                messages::MESSAGE_TYPE,
                messages::DIRECTION,
                messages::FROM_ADDRESS,
                messages::TO_ADDRESS,
                messages::TIMESTAMP,
                messages::READ_STATUS,
                messages::SUBJECT,
                messages::BODY,
                messages::THREAD_ID,
                provenance::SOURCE_FILE,
                provenance::MODULE,
                provenance::ACCOUNT_TYPE,
                provenance::INGESTED_AT
            ),
            params![
                message.message_type,
                message.direction.as_str(),
                to_json(message.from_address.as_ref())?,
                to_json(message.to_address.as_ref())?,
                message.timestamp,
                message.read_status.as_str(),
                message.subject,
                message.body,
                message.thread_id,
                self.source_file,
                self.module,
                self.account_type,
                Self::ingested_at()
            ],
        )?;
        Ok(())
    }

    fn add_calllog(&mut self, call: CallLogRecord) -> std::result::Result<(), SinkError> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                call_logs::TABLE,
                call_logs::DIRECTION,
                call_logs::FROM_ADDRESS,
                call_logs::TO_ADDRESS,
                call_logs::START_TIME,
                call_logs::END_TIME,
                call_logs::CALL_TYPE,
                provenance::SOURCE_FILE,
                provenance::MODULE,
                provenance::ACCOUNT_TYPE,
                provenance::INGESTED_AT
            ),
            params![
                call.direction.as_str(),
                to_json(call.from_address.as_ref())?,
                to_json(call.to_address.as_ref())?,
                call.start_time,
                call.end_time,
                call.call_type.as_str(),
                self.source_file,
                self.module,
                self.account_type,
                Self::ingested_at()
            ],
        )?;
        Ok(())
    }
}
