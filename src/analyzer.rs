//! Extraction pass orchestration
//!
//! For every discovered `naver_line` database the analyzer extracts contacts,
//! then messages. For every `call_history` database it attaches the sibling
//! contacts database and extracts call logs. One sink is opened per database.
//!
//! Failure scopes:
//! - a query, row or storage failure ends the current pass only, and the next
//!   pass and the next database still run
//! - a notification failure is logged and the pass continues
//! - a failure to open a case sink ends the whole run
//!
//! Every discovered handle is released through its locator exactly once
//! before `analyze` returns.

use std::fmt;

use tracing::{error, info, warn};

use crate::db::{AppDatabase, DatabaseLocator};
use crate::defaults::DefaultsProvider;
use crate::error::{ArtifactError, Result, SinkError};
use crate::extractors::{CallLogsExtractor, ContactsExtractor, MessagesExtractor};
use crate::logging::OperationTimer;
use crate::metrics;
use crate::schema::line;
use crate::sink::{AccountType, CaseRepository, CommunicationSink, SinkScope};

/// The three kinds of records the analyzer extracts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Contacts from `naver_line`
    Contact,
    /// Messages from `naver_line`
    Message,
    /// Calls from `call_history`
    CallLog,
}

impl RecordKind {
    /// Label used in logs and metrics
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Message => "message",
            Self::CallLog => "calllog",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one analyzer run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    /// Contacts forwarded to a sink
    pub contacts: usize,
    /// Messages forwarded to a sink
    pub messages: usize,
    /// Call log entries forwarded to a sink
    pub call_logs: usize,
    /// Records stored without their notification
    pub notification_failures: usize,
    /// Passes that ended early
    pub failed_passes: usize,
    /// Databases discovered and opened
    pub databases_found: usize,
    /// Database handles released
    pub handles_closed: usize,
}

impl AnalysisReport {
    fn count(&mut self, kind: RecordKind) {
        match kind {
            RecordKind::Contact => self.contacts += 1,
            RecordKind::Message => self.messages += 1,
            RecordKind::CallLog => self.call_logs += 1,
        }
        metrics::record_extracted(kind.as_str());
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Databases found:       {}", self.databases_found)?;
        writeln!(f, "Contacts:              {}", self.contacts)?;
        writeln!(f, "Messages:              {}", self.messages)?;
        writeln!(f, "Call logs:             {}", self.call_logs)?;
        writeln!(f, "Failed passes:         {}", self.failed_passes)?;
        writeln!(f, "Notification failures: {}", self.notification_failures)?;
        write!(f, "Handles closed:        {}", self.handles_closed)
    }
}

/// Drives the LINE extractors over every discovered database
pub struct LineAnalyzer {
    defaults: Box<dyn DefaultsProvider>,
    package_name: String,
}

impl LineAnalyzer {
    /// Analyzer for the standard LINE package
    pub fn new(defaults: impl DefaultsProvider + 'static) -> Self {
        Self {
            defaults: Box::new(defaults),
            package_name: line::PACKAGE_NAME.to_string(),
        }
    }

    /// Look for databases under a different package directory
    #[must_use]
    pub fn with_package(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    /// Extract every LINE database `locator` finds into `case`
    pub fn analyze(&self, locator: &dyn DatabaseLocator, case: &mut dyn CaseRepository) -> Result<AnalysisReport> {
        let mut report = AnalysisReport::default();

        let message_dbs = self.discover(locator, line::CONTACTS_AND_MESSAGES_DB);
        let calllog_dbs = self.discover(locator, line::CALL_HISTORY_DB);
        report.databases_found = message_dbs.len() + calllog_dbs.len();
        info!(
            contacts_and_messages = message_dbs.len(),
            call_history = calllog_dbs.len(),
            version = line::APP_VERSION,
            "Discovered LINE databases"
        );

        let outcome = self.process(locator, case, &message_dbs, &calllog_dbs, &mut report);

        for db in message_dbs.into_iter().chain(calllog_dbs) {
            let path = db.path().display().to_string();
            if let Err(e) = locator.release(db) {
                warn!(db = %path, error = %e, "Error closing LINE database");
            }
            report.handles_closed += 1;
        }

        outcome.map(|()| report)
    }

    fn discover(&self, locator: &dyn DatabaseLocator, name: &'static str) -> Vec<AppDatabase> {
        match locator.find_databases(name, true, &self.package_name) {
            Ok(found) => {
                metrics::record_databases(name, found.len());
                found
            }
            Err(e) => {
                warn!(name, error = %e, "Error locating LINE databases");
                Vec::new()
            }
        }
    }

    fn scope(db: &AppDatabase) -> SinkScope {
        SinkScope {
            parser_name: line::PARSER_NAME.to_string(),
            source_file: db.path().to_path_buf(),
            account_type: AccountType::Line,
        }
    }

    fn open_sink<'c>(case: &'c mut dyn CaseRepository, db: &AppDatabase) -> Result<Box<dyn CommunicationSink + 'c>> {
        case.open_sink(&Self::scope(db)).inspect_err(|e| {
            error!(db = %db.path().display(), error = %e, "Error opening the case; aborting LINE analysis");
        })
    }

    fn process(
        &self,
        locator: &dyn DatabaseLocator,
        case: &mut dyn CaseRepository,
        message_dbs: &[AppDatabase],
        calllog_dbs: &[AppDatabase],
        report: &mut AnalysisReport,
    ) -> Result<()> {
        for db in message_dbs {
            let mut sink = Self::open_sink(case, db)?;
            self.parse_contacts(db, sink.as_mut(), report);
            self.parse_messages(db, sink.as_mut(), report);
        }

        for db in calllog_dbs {
            let mut sink = Self::open_sink(case, db)?;
            self.parse_calllogs(locator, db, sink.as_mut(), report);
        }

        Ok(())
    }

    fn parse_contacts(&self, db: &AppDatabase, sink: &mut dyn CommunicationSink, report: &mut AnalysisReport) {
        let timer = OperationTimer::new("line_contacts");
        let result = ContactsExtractor::new(db.connection(), self.defaults.as_ref()).and_then(|mut extractor| {
            drain(RecordKind::Contact, extractor.records()?, |c| sink.add_contact(c), report)
        });
        finish_pass(RecordKind::Contact, db, result, report);
        timer.finish();
    }

    fn parse_messages(&self, db: &AppDatabase, sink: &mut dyn CommunicationSink, report: &mut AnalysisReport) {
        let timer = OperationTimer::new("line_messages");
        let result = MessagesExtractor::new(db.connection(), self.defaults.as_ref()).and_then(|mut extractor| {
            drain(RecordKind::Message, extractor.records()?, |m| sink.add_message(m), report)
        });
        finish_pass(RecordKind::Message, db, result, report);
        timer.finish();
    }

    fn parse_calllogs(
        &self,
        locator: &dyn DatabaseLocator,
        db: &AppDatabase,
        sink: &mut dyn CommunicationSink,
        report: &mut AnalysisReport,
    ) {
        let timer = OperationTimer::new("line_calllogs");
        let result = attach_contacts(locator, db)
            .and_then(|()| CallLogsExtractor::new(db.connection(), self.defaults.as_ref()))
            .and_then(|mut extractor| {
                drain(RecordKind::CallLog, extractor.records()?, |c| sink.add_calllog(c), report)
            });
        finish_pass(RecordKind::CallLog, db, result, report);
        timer.finish();
    }
}

fn attach_contacts(locator: &dyn DatabaseLocator, db: &AppDatabase) -> Result<()> {
    let companion = locator
        .companion_path(db, line::CONTACTS_AND_MESSAGES_DB)
        .ok_or_else(|| ArtifactError::CompanionNotFound {
            db: db.path().to_path_buf(),
            name: line::CONTACTS_AND_MESSAGES_DB.to_string(),
        })?;
    db.attach_database(&companion, line::CONTACTS_ALIAS)
}

/// Forward records to the sink until the stream ends or a fatal error occurs
fn drain<T>(
    kind: RecordKind,
    records: impl Iterator<Item = Result<T>>,
    mut emit: impl FnMut(T) -> std::result::Result<(), SinkError>,
    report: &mut AnalysisReport,
) -> Result<usize> {
    let mut forwarded = 0;
    for record in records {
        match emit(record?) {
            Ok(()) => {}
            Err(SinkError::Notification(msg)) => {
                warn!(kind = kind.as_str(), error = %msg, "Error posting LINE artifact to blackboard");
                report.notification_failures += 1;
                metrics::record_notification_failure(kind.as_str());
            }
            Err(e @ SinkError::Storage(_)) => return Err(e.into()),
        }
        report.count(kind);
        forwarded += 1;
    }
    Ok(forwarded)
}

fn finish_pass(kind: RecordKind, db: &AppDatabase, result: Result<usize>, report: &mut AnalysisReport) {
    let path = db.path().display();
    match result {
        Ok(records) => info!(db = %path, kind = kind.as_str(), records, "Finished LINE extraction pass"),
        Err(e @ ArtifactError::Storage(_)) => {
            error!(db = %path, kind = kind.as_str(), error = %e, "Error adding LINE artifacts to the case database; the case is incomplete");
            report.failed_passes += 1;
            metrics::record_pass_failure(kind.as_str(), "storage");
        }
        Err(e) => {
            warn!(db = %path, kind = kind.as_str(), error = %e, "Error parsing the LINE database");
            report.failed_passes += 1;
            metrics::record_pass_failure(kind.as_str(), "query");
        }
    }
}
