//! Connection handling: a single writer behind a mutex, short-lived
//! read-only connections for concurrent readers (spec §5).

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};

use crate::error::Result;
use crate::schema;

/// Owns the writer connection for one project database and knows how to
/// mint read-only connections against the same file.
pub struct StorePool {
    db_path: PathBuf,
    writer: Mutex<Connection>,
}

impl StorePool {
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = Connection::open(&db_path)?;
        schema::initialize(&writer)?;
        Ok(Self {
            db_path,
            writer: Mutex::new(writer),
        })
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let writer = Connection::open_in_memory()?;
        schema::initialize(&writer)?;
        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            writer: Mutex::new(writer),
        })
    }

    /// Run `f` against the single writer connection, holding its lock for
    /// the duration. Callers that need atomicity should open a transaction
    /// inside `f`.
    pub fn with_writer<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.writer.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&conn)
    }

    /// Open a fresh read-only connection. For an in-memory store, which has
    /// no file-backed path for a second handle, reads also go through the
    /// writer connection.
    pub fn with_reader<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        if self.db_path == Path::new(":memory:") {
            return self.with_writer(f);
        }
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        f(&conn)
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
