//! Lightweight-asset projection, used for assets that were only
//! fast-classified, never promoted to a full `DocChunk` (spec §4.3, §4.5).

use chrono::Utc;

use crate::error::Result;
use crate::store::Store;
use crate::types::LightweightAssetRow;

impl Store {
    /// Replace `lightweight_assets` rows and rewrite their `lightweight_refs`
    /// reverse-lookup projection.
    pub fn upsert_lightweight_batch(&self, rows: &[LightweightAssetRow]) -> Result<usize> {
        self.pool.with_writer(|conn| {
            let tx = conn.unchecked_transaction()?;
            let now = Utc::now().to_rfc3339();
            for row in rows {
                let refs_json = serde_json::to_string(&row.references)?;
                tx.execute(
                    "INSERT INTO lightweight_assets (path, name, asset_type, references_json, indexed_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(path) DO UPDATE SET
                        name = excluded.name, asset_type = excluded.asset_type,
                        references_json = excluded.references_json, indexed_at = excluded.indexed_at",
                    rusqlite::params![row.path, row.name, row.asset_type, refs_json, now],
                )?;
                tx.execute("DELETE FROM lightweight_refs WHERE asset_path = ?1", [&row.path])?;
                for reference in &row.references {
                    tx.execute(
                        "INSERT OR IGNORE INTO lightweight_refs (asset_path, ref_path) VALUES (?1, ?2)",
                        rusqlite::params![row.path, reference],
                    )?;
                }
            }
            tx.commit()?;
            Ok(rows.len())
        })
    }

    /// Used when an asset graduates from lightweight to semantic indexing
    /// (spec §4.3).
    pub fn delete_lightweight_paths(&self, paths: &[String]) -> Result<usize> {
        self.pool.with_writer(|conn| {
            let tx = conn.unchecked_transaction()?;
            let mut deleted = 0;
            for path in paths {
                deleted += tx.execute("DELETE FROM lightweight_assets WHERE path = ?1", [path])?;
                tx.execute("DELETE FROM lightweight_refs WHERE asset_path = ?1", [path])?;
            }
            tx.commit()?;
            Ok(deleted)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_then_delete_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let rows = vec![LightweightAssetRow {
            path: "/Game/Foo".to_string(),
            name: "Foo".to_string(),
            asset_type: Some("Texture".to_string()),
            references: vec!["/Game/Bar".to_string()],
        }];
        assert_eq!(store.upsert_lightweight_batch(&rows).unwrap(), 1);

        let refs = store.find_assets_referencing("/Game/Bar", 10).unwrap();
        assert_eq!(refs.len(), 1);

        assert_eq!(store.delete_lightweight_paths(&["/Game/Foo".to_string()]).unwrap(), 1);
        let refs_after = store.find_assets_referencing("/Game/Bar", 10).unwrap();
        assert!(refs_after.is_empty());
    }
}
