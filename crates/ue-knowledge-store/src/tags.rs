//! Gameplay-tag projection: `search_by_tag` and its writer (spec §4.3, §4.5).

use crate::error::Result;
use crate::store::Store;
use crate::types::TagMatch;

impl Store {
    /// Replace the tag set for one asset path (used by the indexer's
    /// gameplay-tag extraction pass).
    pub fn set_tags_for_asset(&self, path: &str, tags: &[String]) -> Result<()> {
        self.pool.with_writer(|conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute("DELETE FROM tags WHERE asset_path = ?1", [path])?;
            for tag in tags {
                tx.execute(
                    "INSERT OR IGNORE INTO tags (asset_path, tag) VALUES (?1, ?2)",
                    rusqlite::params![path, tag],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// Exact match, or a `prefix.*` suffix for prefix match (spec §4.3).
    pub fn search_by_tag(&self, tag_or_prefix: &str, limit: usize) -> Result<Vec<TagMatch>> {
        self.pool.with_reader(|conn| {
            let (clause, bind) = if let Some(prefix) = tag_or_prefix.strip_suffix(".*") {
                ("t.tag LIKE ?1", format!("{prefix}%"))
            } else {
                ("t.tag = ?1", tag_or_prefix.to_string())
            };
            let sql = format!(
                "SELECT la.path, la.name, la.asset_type, t.tag
                 FROM tags t
                 JOIN lightweight_assets la ON la.path = t.asset_path
                 WHERE {clause}
                 LIMIT ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params![bind, limit as i64], |row| {
                Ok(TagMatch {
                    path: row.get(0)?,
                    name: row.get(1)?,
                    asset_type: row.get(2)?,
                    tag: row.get(3)?,
                })
            })?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LightweightAssetRow;

    #[test]
    fn exact_and_prefix_match() {
        let store = Store::open_in_memory().unwrap();
        store
            .upsert_lightweight_batch(&[LightweightAssetRow {
                path: "/Game/Foo".to_string(),
                name: "Foo".to_string(),
                asset_type: Some("GameplayEffect".to_string()),
                references: vec![],
            }])
            .unwrap();
        store
            .set_tags_for_asset("/Game/Foo", &["Weapon.Pistol".to_string()])
            .unwrap();

        assert_eq!(store.search_by_tag("Weapon.Pistol", 10).unwrap().len(), 1);
        assert_eq!(store.search_by_tag("Weapon.*", 10).unwrap().len(), 1);
        assert_eq!(store.search_by_tag("Armor.*", 10).unwrap().len(), 0);
    }
}
