//! `file_meta` bookkeeping for incremental change detection (spec §4.5
//! Phase 1, Phase 6).

use rusqlite::OptionalExtension;

use crate::error::Result;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetaRow {
    pub mtime: i64,
    pub size: i64,
}

impl Store {
    pub fn get_file_meta(&self, abs_path: &str) -> Result<Option<FileMetaRow>> {
        self.pool.with_reader(|conn| {
            Ok(conn
                .query_row(
                    "SELECT mtime, size FROM file_meta WHERE abs_path = ?1",
                    [abs_path],
                    |row| Ok(FileMetaRow { mtime: row.get(0)?, size: row.get(1)? }),
                )
                .optional()?)
        })
    }

    /// Upsert `(abs_path, mtime, size, asset_type)` for a processed file
    /// (spec §4.5 Phase 6).
    pub fn upsert_file_meta(&self, abs_path: &str, mtime: i64, size: i64, asset_type: Option<&str>) -> Result<()> {
        self.pool.with_writer(|conn| {
            conn.execute(
                "INSERT INTO file_meta (abs_path, mtime, size, asset_type) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(abs_path) DO UPDATE SET
                    mtime = excluded.mtime, size = excluded.size, asset_type = excluded.asset_type",
                rusqlite::params![abs_path, mtime, size, asset_type],
            )?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_file_meta() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.get_file_meta("/abs/Foo.uasset").unwrap().is_none());
        store.upsert_file_meta("/abs/Foo.uasset", 100, 2048, Some("Blueprint")).unwrap();
        let row = store.get_file_meta("/abs/Foo.uasset").unwrap().unwrap();
        assert_eq!(row.mtime, 100);
        assert_eq!(row.size, 2048);
    }
}
