//! Row cursor adapter
//!
//! Extractors read query results through [`RowCursor`], which looks columns
//! up by name and keeps NULL distinct from the empty string. [`RecordStream`]
//! turns a statement's rows into a lazy, single-pass sequence of canonical
//! records.

use rusqlite::types::ValueRef;
use rusqlite::{Row, Rows};

use crate::defaults::DefaultsProvider;
use crate::error::Result;

/// Typed, by-name access to the current row of a query result
pub trait RowCursor {
    /// Column value as text, `None` for SQL NULL. Numbers are rendered as text.
    fn get_string(&self, column: &str) -> Result<Option<String>>;

    /// Column value as an integer. NULL and non-numeric text read as 0,
    /// the way SQLite coerces them.
    fn get_int(&self, column: &str) -> Result<i64>;
}

impl RowCursor for Row<'_> {
    fn get_string(&self, column: &str) -> Result<Option<String>> {
        Ok(value_as_string(self.get_ref(column)?))
    }

    fn get_int(&self, column: &str) -> Result<i64> {
        Ok(value_as_int(self.get_ref(column)?))
    }
}

fn value_as_string(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn value_as_int(value: ValueRef<'_>) -> i64 {
    match value {
        ValueRef::Integer(i) => i,
        ValueRef::Real(f) => f as i64,
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        ValueRef::Null | ValueRef::Blob(_) => 0,
    }
}

/// Maps the current row to a canonical record
pub type RowMapper<T> = fn(&dyn RowCursor, &dyn DefaultsProvider) -> Result<T>;

/// Lazy sequence of records over a query's rows.
///
/// The stream is fused: after the last row, or after the first error, it
/// yields nothing more. It cannot be restarted.
pub struct RecordStream<'s, T> {
    rows: Rows<'s>,
    defaults: &'s dyn DefaultsProvider,
    mapper: RowMapper<T>,
    finished: bool,
}

impl<'s, T> RecordStream<'s, T> {
    pub(crate) fn new(rows: Rows<'s>, defaults: &'s dyn DefaultsProvider, mapper: RowMapper<T>) -> Self {
        Self {
            rows,
            defaults,
            mapper,
            finished: false,
        }
    }
}

impl<T> Iterator for RecordStream<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let item = match self.rows.next() {
            Ok(Some(row)) => (self.mapper)(row, self.defaults),
            Ok(None) => {
                self.finished = true;
                return None;
            }
            Err(e) => Err(e.into()),
        };

        if item.is_err() {
            self.finished = true;
        }
        Some(item)
    }
}

impl<T> std::iter::FusedIterator for RecordStream<'_, T> {}


#[cfg(test)]
mod tests {
    use super::test_support::FakeRow;
    use super::*;
    use crate::defaults::OwnerDefaults;
    use rusqlite::Connection;

    #[test]
    fn test_null_is_distinct_from_empty_string() {
        let row = FakeRow::new().null("a").text("b", "");
        assert_eq!(row.get_string("a").unwrap(), None);
        assert_eq!(row.get_string("b").unwrap(), Some(String::new()));
    }

    #[test]
    fn test_numbers_read_as_text_and_text_as_numbers() {
        let row = FakeRow::new().int("n", 1_609_459_200_000).text("t", " 7 ").text("junk", "abc").null("z");
        assert_eq!(row.get_string("n").unwrap().as_deref(), Some("1609459200000"));
        assert_eq!(row.get_int("t").unwrap(), 7);
        assert_eq!(row.get_int("junk").unwrap(), 0);
        assert_eq!(row.get_int("z").unwrap(), 0);
    }

    #[test]
    fn test_unknown_column_is_a_query_error() {
        let row = FakeRow::new();
        assert!(row.get_string("missing").is_err());
    }

    #[test]
    fn test_sqlite_row_lookup_by_name() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT NULL AS a, '' AS b, 42 AS c").unwrap();
        let mut rows = stmt.query([]).unwrap();
        let row = rows.next().unwrap().unwrap();

        assert_eq!(row.get_string("a").unwrap(), None);
        assert_eq!(row.get_string("b").unwrap(), Some(String::new()));
        assert_eq!(row.get_string("c").unwrap().as_deref(), Some("42"));
        assert_eq!(row.get_int("c").unwrap(), 42);
        assert!(row.get_int("nope").is_err());
    }

    fn first_column(row: &dyn RowCursor, _defaults: &dyn DefaultsProvider) -> Result<String> {
        Ok(row.get_string("v")?.unwrap_or_default())
    }

    #[test]
    fn test_record_stream_is_lazy_and_fused() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT 'x' AS v UNION ALL SELECT 'y'").unwrap();
        let defaults = OwnerDefaults::default();
        let rows = stmt.query([]).unwrap();
        let mut stream = RecordStream::new(rows, &defaults, first_column);

        assert_eq!(stream.next().unwrap().unwrap(), "x");
        assert_eq!(stream.next().unwrap().unwrap(), "y");
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    fn missing_column(row: &dyn RowCursor, _defaults: &dyn DefaultsProvider) -> Result<String> {
        Ok(row.get_string("absent")?.unwrap_or_default())
    }

    #[test]
    fn test_record_stream_stops_after_first_error() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT 'x' AS v UNION ALL SELECT 'y'").unwrap();
        let defaults = OwnerDefaults::default();
        let rows = stmt.query([]).unwrap();
        let mut stream = RecordStream::new(rows, &defaults, missing_column);

        assert!(stream.next().unwrap().is_err());
        assert!(stream.next().is_none());
    }
}
