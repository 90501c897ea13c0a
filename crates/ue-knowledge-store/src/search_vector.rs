//! `search_vector` (spec §4.3): brute-force cosine similarity over stored
//! embeddings. Fine at the scale of a single project's knowledge index;
//! there is no ANN index here.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::store::Store;
use crate::types::{SearchFilters, SearchResult};
use crate::vector::{cosine_similarity, decode_embedding};

impl Store {
    pub fn search_vector(
        &self,
        embedding: &[f32],
        filters: &SearchFilters,
        k: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        self.pool.with_reader(|conn| {
            let mut sql = String::from(
                "SELECT d.doc_id, d.type, d.path, d.name, d.module, d.asset_type, d.text, d.metadata,
                        e.embedding
                 FROM docs_embeddings e
                 JOIN docs d ON d.doc_id = e.doc_id
                 WHERE 1=1",
            );
            let mut args: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
            if let Some(kind) = &filters.kind {
                sql.push_str(" AND d.type = ?");
                args.push(Box::new(kind.clone()));
            }
            if let Some(prefix) = &filters.path_prefix {
                sql.push_str(" AND d.path LIKE ?");
                args.push(Box::new(format!("{prefix}%")));
            }
            if let Some(module) = &filters.module {
                sql.push_str(" AND d.module = ?");
                args.push(Box::new(module.clone()));
            }
            if let Some(asset_type) = &filters.asset_type {
                sql.push_str(" AND d.asset_type = ?");
                args.push(Box::new(asset_type.clone()));
            }

            let mut stmt = conn.prepare(&sql)?;
            let param_refs: Vec<&dyn rusqlite::types::ToSql> = args.iter().map(AsRef::as_ref).collect();
            let rows = stmt.query_map(param_refs.as_slice(), |row| {
                let metadata_json: String = row.get(7)?;
                let blob: Vec<u8> = row.get(8)?;
                Ok((
                    SearchResult {
                        doc_id: row.get(0)?,
                        kind: row.get(1)?,
                        path: row.get(2)?,
                        name: row.get(3)?,
                        module: row.get(4)?,
                        asset_type: row.get(5)?,
                        text: row.get(6)?,
                        metadata: serde_json::from_str::<Map<String, Value>>(&metadata_json)
                            .unwrap_or_default(),
                        score: 0.0,
                    },
                    blob,
                ))
            })?;

            let mut scored = Vec::new();
            for row in rows {
                let (mut result, blob) = row?;
                let Ok(vector) = decode_embedding(&result.doc_id, &blob) else {
                    continue;
                };
                let score = cosine_similarity(embedding, &vector);
                if score >= min_score {
                    result.score = score;
                    scored.push(result);
                }
            }
            scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
            scored.truncate(k);
            Ok(scored)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ue_knowledge_schema::{DocChunk, DocKind};

    fn doc(path: &str) -> DocChunk {
        DocChunk::new(
            format!("asset:{path}"),
            DocKind::AssetSummary,
            path,
            path,
            "text",
            None,
            None,
        )
    }

    #[test]
    fn empty_table_returns_empty() {
        let store = Store::open_in_memory().unwrap();
        let results = store
            .search_vector(&[1.0, 0.0], &SearchFilters::default(), 5, 0.0)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn ranks_by_similarity_and_respects_min_score() {
        let store = Store::open_in_memory().unwrap();
        store.upsert_doc(&doc("/Game/A"), Some(&[1.0, 0.0]), false).unwrap();
        store.upsert_doc(&doc("/Game/B"), Some(&[0.0, 1.0]), false).unwrap();

        let results = store
            .search_vector(&[1.0, 0.0], &SearchFilters::default(), 5, 0.5)
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "/Game/A");
    }
}
