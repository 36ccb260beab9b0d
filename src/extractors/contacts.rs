//! LINE contacts

use rusqlite::{Connection, Statement};

use crate::cursor::{RecordStream, RowCursor};
use crate::defaults::DefaultsProvider;
use crate::error::Result;
use crate::models::ContactRecord;

const QUERY: &str = "
    SELECT m_id,
           server_name
    FROM   contacts
";

/// Maps rows of the `contacts` table to [`ContactRecord`]s
pub struct ContactsExtractor<'a> {
    statement: Statement<'a>,
    defaults: &'a dyn DefaultsProvider,
}

impl<'a> ContactsExtractor<'a> {
    /// Prepare the contacts query against a `naver_line` database
    pub fn new(conn: &'a Connection, defaults: &'a dyn DefaultsProvider) -> Result<Self> {
        Ok(Self {
            statement: conn.prepare(QUERY)?,
            defaults,
        })
    }

    /// Run the query and stream one record per contact
    pub fn records(&mut self) -> Result<RecordStream<'_, ContactRecord>> {
        let rows = self.statement.query([])?;
        Ok(RecordStream::new(rows, self.defaults, map_contact))
    }
}

/// Phone numbers and email are not stored by LINE and always come from the defaults.
pub fn map_contact(row: &dyn RowCursor, defaults: &dyn DefaultsProvider) -> Result<ContactRecord> {
    Ok(ContactRecord {
        account_id: row.get_string("m_id")?.unwrap_or_default(),
        display_name: row.get_string("server_name")?.unwrap_or_default(),
        phone: defaults.phone(),
        home_phone: defaults.home_phone(),
        mobile_phone: defaults.mobile_phone(),
        email: defaults.email(),
    })
}
