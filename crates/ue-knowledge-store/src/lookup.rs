//! Name-based lookups used to resolve rule 5 of parent-class resolution
//! (spec §4.5): does a `docs` or `lightweight_assets` row already exist
//! under this bare name? Also backs the search engine's `name` mode
//! (spec §4.7).

use std::collections::HashSet;

use rusqlite::OptionalExtension;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::store::Store;
use crate::types::{ReferencingAsset, SearchResult};

impl Store {
    pub fn find_doc_path_by_name(&self, name: &str) -> Result<Option<String>> {
        self.pool.with_reader(|conn| {
            Ok(conn
                .query_row("SELECT path FROM docs WHERE name = ?1 LIMIT 1", [name], |row| row.get(0))
                .optional()?)
        })
    }

    pub fn find_lightweight_path_by_name(&self, name: &str) -> Result<Option<String>> {
        self.pool.with_reader(|conn| {
            Ok(conn
                .query_row(
                    "SELECT path FROM lightweight_assets WHERE name = ?1 LIMIT 1",
                    [name],
                    |row| row.get(0),
                )
                .optional()?)
        })
    }

    /// Full doc row by exact path, for the search engine's narrow-result-set
    /// "enrich with full text" step (spec §4.7).
    pub fn get_doc_by_path(&self, path: &str) -> Result<Option<SearchResult>> {
        self.pool.with_reader(|conn| {
            let row: Option<(String, String, String, String, Option<String>, Option<String>, String, String)> = conn
                .query_row(
                    "SELECT doc_id, type, path, name, module, asset_type, text, metadata
                     FROM docs WHERE path = ?1 LIMIT 1",
                    [path],
                    |row| {
                        Ok((
                            row.get(0)?,
                            row.get(1)?,
                            row.get(2)?,
                            row.get(3)?,
                            row.get(4)?,
                            row.get(5)?,
                            row.get(6)?,
                            row.get(7)?,
                        ))
                    },
                )
                .optional()?;
            Ok(row.map(|(doc_id, kind, path, name, module, asset_type, text, metadata_json)| SearchResult {
                doc_id,
                kind,
                path,
                name,
                module,
                asset_type,
                text,
                metadata: serde_json::from_str::<Map<String, Value>>(&metadata_json).unwrap_or_default(),
                score: 1.0,
            }))
        })
    }

    /// `lightweight_assets` row by exact path, for `inspect_asset` on an
    /// asset with no semantic doc body (spec §6.3).
    pub fn get_lightweight_by_path(&self, path: &str) -> Result<Option<ReferencingAsset>> {
        self.pool.with_reader(|conn| {
            Ok(conn
                .query_row(
                    "SELECT path, name, asset_type FROM lightweight_assets WHERE path = ?1",
                    [path],
                    |row| Ok(ReferencingAsset { path: row.get(0)?, name: row.get(1)?, asset_type: row.get(2)? }),
                )
                .optional()?)
        })
    }

    /// All doc rows sharing `path` (a Blueprint's `AssetSummary` plus its
    /// per-function `BpGraphSummary` chunks, for example), for the search
    /// engine's "merge full text across an asset's chunks" enrichment step
    /// (spec §4.7).
    pub fn get_docs_by_path(&self, path: &str) -> Result<Vec<SearchResult>> {
        self.pool.with_reader(|conn| {
            let mut stmt = conn.prepare(
                "SELECT doc_id, type, path, name, module, asset_type, text, metadata
                 FROM docs WHERE path = ?1",
            )?;
            let rows = stmt.query_map([path], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })?;
            let mut results = Vec::new();
            for row in rows {
                let (doc_id, kind, path, name, module, asset_type, text, metadata_json) = row?;
                results.push(SearchResult {
                    doc_id,
                    kind,
                    path,
                    name,
                    module,
                    asset_type,
                    text,
                    metadata: serde_json::from_str::<Map<String, Value>>(&metadata_json).unwrap_or_default(),
                    score: 1.0,
                });
            }
            Ok(results)
        })
    }

    /// Path-fragment scan over both tables: matches any path containing
    /// `fragment` (real paths carry a mount prefix like `/Game/` ahead of
    /// e.g. `__ExternalActors__/<Level>`, so this can't anchor at the
    /// start). Backs the `refs` mode's level-placement lookup (spec §4.7).
    pub fn find_by_path_containing(&self, fragment: &str, limit: usize) -> Result<Vec<ReferencingAsset>> {
        self.pool.with_reader(|conn| {
            let mut seen = HashSet::new();
            let mut results = Vec::new();
            let like_pattern = format!("%{fragment}%");

            let mut stmt = conn.prepare(
                "SELECT path, name, asset_type FROM docs WHERE path LIKE ?1 ESCAPE '\\' LIMIT ?2",
            )?;
            let rows = stmt.query_map(rusqlite::params![like_pattern, limit as i64], |row| {
                Ok(ReferencingAsset { path: row.get(0)?, name: row.get(1)?, asset_type: row.get(2)? })
            })?;
            for row in rows {
                let row = row?;
                if seen.insert(row.path.clone()) {
                    results.push(row);
                }
            }

            let mut stmt = conn.prepare(
                "SELECT path, name, asset_type FROM lightweight_assets WHERE path LIKE ?1 ESCAPE '\\' LIMIT ?2",
            )?;
            let rows = stmt.query_map(rusqlite::params![like_pattern, limit as i64], |row| {
                Ok(ReferencingAsset { path: row.get(0)?, name: row.get(1)?, asset_type: row.get(2)? })
            })?;
            for row in rows {
                let row = row?;
                if seen.insert(row.path.clone()) {
                    results.push(row);
                }
            }

            results.truncate(limit);
            Ok(results)
        })
    }

    /// Name-prefix scan over both `docs` and `lightweight_assets`, used for
    /// `name`-mode alias expansion (spec §4.7: `_` suffix, `BP_`/`B_`, etc).
    pub fn find_by_name_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<ReferencingAsset>> {
        self.pool.with_reader(|conn| {
            let mut seen = HashSet::new();
            let mut results = Vec::new();
            let like_pattern = format!("{prefix}%");

            let mut stmt = conn.prepare(
                "SELECT path, name, asset_type FROM docs WHERE name LIKE ?1 ESCAPE '\\' LIMIT ?2",
            )?;
            let rows = stmt.query_map(rusqlite::params![like_pattern, limit as i64], |row| {
                Ok(ReferencingAsset { path: row.get(0)?, name: row.get(1)?, asset_type: row.get(2)? })
            })?;
            for row in rows {
                let row = row?;
                if seen.insert(row.path.clone()) {
                    results.push(row);
                }
            }

            let mut stmt = conn.prepare(
                "SELECT path, name, asset_type FROM lightweight_assets WHERE name LIKE ?1 ESCAPE '\\' LIMIT ?2",
            )?;
            let rows = stmt.query_map(rusqlite::params![like_pattern, limit as i64], |row| {
                Ok(ReferencingAsset { path: row.get(0)?, name: row.get(1)?, asset_type: row.get(2)? })
            })?;
            for row in rows {
                let row = row?;
                if seen.insert(row.path.clone()) {
                    results.push(row);
                }
            }

            results.truncate(limit);
            Ok(results)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ue_knowledge_schema::{DocChunk, DocKind};

    #[test]
    fn name_prefix_scan_covers_both_tables() {
        let store = Store::open_in_memory().unwrap();
        store
            .upsert_doc(
                &DocChunk::new(
                    "asset:/Game/BP_Pistol",
                    DocKind::AssetSummary,
                    "/Game/BP_Pistol",
                    "BP_Pistol",
                    "text",
                    None,
                    Some("Blueprint".to_string()),
                ),
                None,
                false,
            )
            .unwrap();
        store
            .upsert_lightweight_batch(&[crate::types::LightweightAssetRow {
                path: "/Game/BP_Rifle".to_string(),
                name: "BP_Rifle".to_string(),
                asset_type: Some("Blueprint".to_string()),
                references: vec![],
            }])
            .unwrap();

        let hits = store.find_by_name_prefix("BP_", 10).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn path_fragment_scan_matches_external_actors_level() {
        let store = Store::open_in_memory().unwrap();
        store
            .upsert_lightweight_batch(&[
                crate::types::LightweightAssetRow {
                    path: "/Game/__ExternalActors__/Valley/AB/CD/XYZ".to_string(),
                    name: "XYZ".to_string(),
                    asset_type: Some("Actor".to_string()),
                    references: vec![],
                },
                crate::types::LightweightAssetRow {
                    path: "/Game/__ExternalActors__/OtherMap/AB/CD/ABC".to_string(),
                    name: "ABC".to_string(),
                    asset_type: Some("Actor".to_string()),
                    references: vec![],
                },
            ])
            .unwrap();

        let hits = store.find_by_path_containing("__ExternalActors__/Valley", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, "/Game/__ExternalActors__/Valley/AB/CD/XYZ");
    }

    #[test]
    fn get_docs_by_path_returns_all_chunks_for_asset() {
        let store = Store::open_in_memory().unwrap();
        store
            .upsert_doc(
                &DocChunk::new("asset:/Game/BP_Hero", DocKind::AssetSummary, "/Game/BP_Hero", "BP_Hero", "summary text", None, None),
                None,
                false,
            )
            .unwrap();
        store
            .upsert_doc(
                &DocChunk::new(
                    "asset:/Game/BP_Hero#OnDeath",
                    DocKind::BpGraphSummary,
                    "/Game/BP_Hero",
                    "BP_Hero",
                    "function body",
                    None,
                    None,
                ),
                None,
                false,
            )
            .unwrap();

        let docs = store.get_docs_by_path("/Game/BP_Hero").unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn get_doc_by_path_returns_full_text() {
        let store = Store::open_in_memory().unwrap();
        store
            .upsert_doc(
                &DocChunk::new("asset:/Game/Foo", DocKind::AssetSummary, "/Game/Foo", "Foo", "full body text", None, None),
                None,
                false,
            )
            .unwrap();
        let doc = store.get_doc_by_path("/Game/Foo").unwrap().unwrap();
        assert_eq!(doc.text, "full body text");
    }
}
