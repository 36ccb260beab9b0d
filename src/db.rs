//! Source database handles and discovery
//!
//! LINE keeps its data in SQLite files under the app's package directory.
//! [`DirectoryLocator`] finds them in an extracted device image and opens each
//! one read-only as an [`AppDatabase`].

use std::io;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ArtifactError, Result};

/// SQLite side files that share a database's name prefix
const SIDE_FILE_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

/// An opened, read-only app database
#[derive(Debug)]
pub struct AppDatabase {
    path: PathBuf,
    conn: Connection,
}

impl AppDatabase {
    /// Open `path` read-only
    pub fn open(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|source| ArtifactError::DatabaseOpen {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    /// Location of the underlying file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Connection used to run extraction queries
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Attach a companion database under `alias` so queries can join across both
    pub fn attach_database(&self, companion: &Path, alias: &str) -> Result<()> {
        if !is_plain_identifier(alias) {
            return Err(ArtifactError::InvalidConfig(format!("Invalid schema alias: {alias}")));
        }

        self.conn.execute(
            &format!("ATTACH DATABASE ?1 AS {alias}"),
            [companion.to_string_lossy().into_owned()],
        )?;
        debug!(db = %self.path.display(), companion = %companion.display(), alias, "Attached companion database");
        Ok(())
    }

    /// Release the handle. Consuming `self` makes a second close impossible.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_conn, e)| ArtifactError::Query(e))
    }
}

fn is_plain_identifier(alias: &str) -> bool {
    let mut chars = alias.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Finds an app's databases in a data source
pub trait DatabaseLocator {
    /// Open every database named `name_hint` (or containing it, when `exact`
    /// is false) that belongs to `package`
    fn find_databases(&self, name_hint: &str, exact: bool, package: &str) -> Result<Vec<AppDatabase>>;

    /// A file named `file_name` next to `db`, if one exists
    fn companion_path(&self, db: &AppDatabase, file_name: &str) -> Option<PathBuf> {
        let candidate = db.path().parent()?.join(file_name);
        candidate.is_file().then_some(candidate)
    }

    /// Give back a handle returned by `find_databases`
    fn release(&self, db: AppDatabase) -> Result<()> {
        db.close()
    }
}

/// Locates databases in a directory tree extracted from a device image
#[derive(Debug, Clone)]
pub struct DirectoryLocator {
    root: PathBuf,
}

impl DirectoryLocator {
    /// Search below `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn matches(path: &Path, name_hint: &str, exact: bool, package: &str) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        let name_matches = if exact {
            file_name == name_hint
        } else {
            file_name.contains(name_hint) && !SIDE_FILE_SUFFIXES.iter().any(|s| file_name.ends_with(s))
        };

        name_matches && path.components().any(|c| c.as_os_str() == package)
    }
}

impl DatabaseLocator for DirectoryLocator {
    fn find_databases(&self, name_hint: &str, exact: bool, package: &str) -> Result<Vec<AppDatabase>> {
        if !self.root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Source directory not found: {}", self.root.display()),
            )
            .into());
        }

        let mut databases = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !Self::matches(entry.path(), name_hint, exact, package) {
                continue;
            }

            match AppDatabase::open(entry.path()) {
                Ok(db) => {
                    debug!(db = %entry.path().display(), "Found database");
                    databases.push(db);
                }
                Err(e) => warn!(error = %e, "Skipping database that could not be opened"),
            }
        }

        Ok(databases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_db(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let conn = Connection::open(path).unwrap();
        conn.execute_batch("CREATE TABLE t (x INTEGER);").unwrap();
    }

    #[test]
    fn test_finds_exact_names_under_package() {
        let dir = tempdir().unwrap();
        let app_dir = dir.path().join("data/data/jp.naver.line.android/databases");
        create_db(&app_dir.join("naver_line"));
        create_db(&app_dir.join("naver_line_backup"));
        create_db(&dir.path().join("data/data/com.other/databases/naver_line"));

        let locator = DirectoryLocator::new(dir.path());
        let found = locator.find_databases("naver_line", true, "jp.naver.line.android").unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path(), app_dir.join("naver_line"));
        for db in found {
            db.close().unwrap();
        }
    }

    #[test]
    fn test_pattern_match_skips_side_files() {
        let dir = tempdir().unwrap();
        let app_dir = dir.path().join("jp.naver.line.android/databases");
        create_db(&app_dir.join("naver_line"));
        std::fs::write(app_dir.join("naver_line-journal"), b"").unwrap();

        let locator = DirectoryLocator::new(dir.path());
        let found = locator.find_databases("naver", false, "jp.naver.line.android").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let locator = DirectoryLocator::new("/definitely/not/here");
        assert!(locator.find_databases("naver_line", true, "jp.naver.line.android").is_err());
    }

    #[test]
    fn test_attach_companion_and_join() {
        let dir = tempdir().unwrap();
        let main = dir.path().join("call_history");
        let companion = dir.path().join("naver_line");
        create_db(&main);
        let conn = Connection::open(&companion).unwrap();
        conn.execute_batch("CREATE TABLE contacts (m_id TEXT); INSERT INTO contacts VALUES ('u1');")
            .unwrap();
        drop(conn);

        let db = AppDatabase::open(&main).unwrap();
        let locator = DirectoryLocator::new(dir.path());
        let path = locator.companion_path(&db, "naver_line").unwrap();
        db.attach_database(&path, "naver").unwrap();

        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM naver.contacts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        db.close().unwrap();
    }

    #[test]
    fn test_rejects_unsafe_alias() {
        let dir = tempdir().unwrap();
        let main = dir.path().join("call_history");
        create_db(&main);
        let db = AppDatabase::open(&main).unwrap();
        assert!(db.attach_database(&main, "naver; DROP TABLE t").is_err());
        assert!(db.attach_database(&main, "1abc").is_err());
    }
}
