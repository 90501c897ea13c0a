//! Store-side support for Phase 7 (spec §4.5): querying docs that still
//! lack an embedding, and writing one back once computed.

use rusqlite::params;

use crate::error::Result;
use crate::store::Store;
use crate::vector::encode_embedding;

impl Store {
    /// `doc_id, text` pairs for docs with no row in `docs_embeddings`,
    /// oldest-indexed first, capped at `limit`.
    pub fn docs_missing_embedding(&self, limit: usize) -> Result<Vec<(String, String)>> {
        self.pool.with_reader(|conn| {
            let mut stmt = conn.prepare(
                "SELECT d.doc_id, d.text FROM docs d
                 LEFT JOIN docs_embeddings e ON e.doc_id = d.doc_id
                 WHERE e.doc_id IS NULL
                 ORDER BY d.indexed_at ASC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map(params![limit as i64], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn set_embedding(&self, doc_id: &str, embedding: &[f32], embed_model: &str, embed_version: &str) -> Result<()> {
        let blob = encode_embedding(embedding);
        self.pool.with_writer(|conn| {
            conn.execute(
                "INSERT INTO docs_embeddings (doc_id, embedding, embed_model, embed_version)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(doc_id) DO UPDATE SET
                    embedding = excluded.embedding, embed_model = excluded.embed_model,
                    embed_version = excluded.embed_version",
                params![doc_id, blob, embed_model, embed_version],
            )?;
            conn.execute(
                "UPDATE docs SET embed_model = ?2, embed_version = ?3 WHERE doc_id = ?1",
                params![doc_id, embed_model, embed_version],
            )?;
            Ok(())
        })
    }
}
