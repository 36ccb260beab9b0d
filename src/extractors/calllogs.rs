//! LINE call history
//!
//! Requires the contacts database to be attached under
//! [`crate::schema::line::CONTACTS_ALIAS`] so the counterpart's name can be
//! resolved from its member id.

use rusqlite::{Connection, Statement};
use tracing::debug;

use super::millis_to_seconds;
use crate::codes::{CallDirectionCode, VoipTypeCode};
use crate::cursor::{RecordStream, RowCursor};
use crate::defaults::DefaultsProvider;
use crate::error::Result;
use crate::models::{Address, CallLogRecord, CommunicationDirection};
use crate::schema::line::CONTACTS_ALIAS;

fn query() -> String {
    format!(
        "
        SELECT CallH.call_type  AS call_type,
               CallH.start_time AS start_time,
               CallH.end_time   AS end_time,
               ConT.server_name AS name,
               CallH.voip_type  AS voip_type,
               ConT.m_id        AS m_id
        FROM   call_history AS CallH
               LEFT JOIN {CONTACTS_ALIAS}.contacts AS ConT
                 ON CallH.caller_mid = ConT.m_id
        "
    )
}

/// Maps `call_history` rows to [`CallLogRecord`]s
pub struct CallLogsExtractor<'a> {
    statement: Statement<'a>,
    defaults: &'a dyn DefaultsProvider,
}

impl<'a> CallLogsExtractor<'a> {
    /// Prepare the call query against a `call_history` database with the
    /// contacts database already attached
    pub fn new(conn: &'a Connection, defaults: &'a dyn DefaultsProvider) -> Result<Self> {
        Ok(Self {
            statement: conn.prepare(&query())?,
            defaults,
        })
    }

    /// Run the query and stream one record per call
    pub fn records(&mut self) -> Result<RecordStream<'_, CallLogRecord>> {
        let rows = self.statement.query([])?;
        Ok(RecordStream::new(rows, self.defaults, map_call))
    }
}

/// The joined contact, or `None` when the caller id matched no contact
fn counterpart(row: &dyn RowCursor) -> Result<Option<Address>> {
    match row.get_string("m_id")? {
        Some(id) => Ok(Some(Address::new(id, row.get_string("name")?.unwrap_or_default()))),
        None => Ok(None),
    }
}

fn call_time(row: &dyn RowCursor, column: &str, fallback: impl FnOnce() -> i64) -> Result<i64> {
    let raw = row.get_string(column)?;
    Ok(millis_to_seconds(raw.as_deref()).unwrap_or_else(|| {
        debug!(column, raw = ?raw, "Unparsable call time, using default");
        fallback()
    }))
}

/// Map one call row.
///
/// The counterpart fills `to_address` of an outgoing call and `from_address`
/// of an incoming one. The other side, and a counterpart missing from the
/// contacts table, come from the defaults.
pub fn map_call(row: &dyn RowCursor, defaults: &dyn DefaultsProvider) -> Result<CallLogRecord> {
    let direction = CallDirectionCode::from_raw(row.get_string("call_type")?.as_deref()).direction();
    let counterpart = counterpart(row)?;

    let (from_address, to_address) = match direction {
        CommunicationDirection::Outgoing => (
            defaults.from_address(),
            counterpart.or_else(|| defaults.call_to_address()),
        ),
        CommunicationDirection::Incoming => (
            counterpart.or_else(|| defaults.from_address()),
            defaults.call_to_address(),
        ),
    };

    let call_type = VoipTypeCode::from_raw(row.get_string("voip_type")?.as_deref())
        .media_type()
        .unwrap_or_else(|| defaults.call_media_type());

    Ok(CallLogRecord {
        direction,
        from_address,
        to_address,
        start_time: call_time(row, "start_time", || defaults.call_start_time())?,
        end_time: call_time(row, "end_time", || defaults.call_end_time())?,
        call_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::test_support::FakeRow;
    use crate::defaults::OwnerDefaults;
    use crate::models::CallMediaType;

    fn call_row(call_type: &str, voip_type: &str) -> FakeRow {
        FakeRow::new()
            .text("call_type", call_type)
            .text("start_time", "1609459200000")
            .text("end_time", "1609459260000")
            .text("name", "Bob")
            .text("voip_type", voip_type)
            .text("m_id", "u-bob")
    }

    fn owner_defaults() -> (Address, OwnerDefaults) {
        let owner = Address::new("u-me", "Me");
        (owner.clone(), OwnerDefaults::with_owner(owner))
    }

    #[test]
    fn test_outgoing_call_resolves_callee() {
        let (owner, defaults) = owner_defaults();
        let record = map_call(&call_row("VO", "V"), &defaults).unwrap();

        assert_eq!(record.direction, CommunicationDirection::Outgoing);
        assert_eq!(record.to_address, Some(Address::new("u-bob", "Bob")));
        assert_eq!(record.from_address, Some(owner));
        assert_eq!(record.call_type, CallMediaType::Video);
        assert_eq!(record.start_time, 1_609_459_200);
        assert_eq!(record.end_time, 1_609_459_260);
    }

    #[test]
    fn test_incoming_call_resolves_caller() {
        let (owner, defaults) = owner_defaults();
        let record = map_call(&call_row("AI", "A"), &defaults).unwrap();

        assert_eq!(record.direction, CommunicationDirection::Incoming);
        assert_eq!(record.from_address, Some(Address::new("u-bob", "Bob")));
        assert_eq!(record.to_address, Some(owner));
        assert_eq!(record.call_type, CallMediaType::Audio);
    }

    #[test]
    fn test_unknown_direction_code_is_incoming() {
        let record = map_call(&call_row("VM", "V"), &OwnerDefaults::default()).unwrap();
        assert_eq!(record.direction, CommunicationDirection::Incoming);

        let row = call_row("", "V").null("call_type");
        let record = map_call(&row, &OwnerDefaults::default()).unwrap();
        assert_eq!(record.direction, CommunicationDirection::Incoming);
    }

    #[test]
    fn test_unmatched_counterpart_uses_default_address() {
        let (owner, defaults) = owner_defaults();
        let row = call_row("VO", "V").null("m_id").null("name");
        let record = map_call(&row, &defaults).unwrap();

        assert_eq!(record.to_address, Some(owner.clone()));
        assert_eq!(record.from_address, Some(owner));
    }

    #[test]
    fn test_unknown_voip_type_uses_default() {
        let record = map_call(&call_row("VO", "G"), &OwnerDefaults::default()).unwrap();
        assert_eq!(record.call_type, CallMediaType::Unknown);
    }

    #[test]
    fn test_bad_times_fall_back_independently() {
        let row = call_row("VO", "A").text("start_time", "n/a").null("end_time");
        let record = map_call(&row, &OwnerDefaults::default()).unwrap();
        assert_eq!(record.start_time, -1);
        assert_eq!(record.end_time, -1);
    }

    #[test]
    fn test_end_before_start_is_kept_as_is() {
        let row = call_row("VO", "A").text("end_time", "1000");
        let record = map_call(&row, &OwnerDefaults::default()).unwrap();
        assert!(record.end_time < record.start_time);
    }
}
