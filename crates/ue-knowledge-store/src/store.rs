//! The `Store`: atomic upserts of documents, embeddings, and edges.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use ue_knowledge_schema::DocChunk;

use crate::error::Result;
use crate::pool::StorePool;
use crate::types::BatchUpsertReport;
use crate::vector::encode_embedding;

pub struct Store {
    pub(crate) pool: StorePool,
}

impl Store {
    pub fn open(db_path: impl Into<std::path::PathBuf>) -> Result<Self> {
        Ok(Self {
            pool: StorePool::open(db_path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            pool: StorePool::open_in_memory()?,
        })
    }

    #[must_use]
    pub fn pool(&self) -> &StorePool {
        &self.pool
    }

    /// `upsert_doc(doc, embedding?, force) → changed` (spec §4.3).
    pub fn upsert_doc(&self, doc: &DocChunk, embedding: Option<&[f32]>, force: bool) -> Result<bool> {
        self.pool.with_writer(|conn| upsert_one(conn, doc, embedding, force))
    }

    /// `upsert_docs_batch(docs, embeddings?, force)` (spec §4.3): one
    /// transaction, per-row failures counted rather than aborting the batch.
    pub fn upsert_docs_batch(
        &self,
        docs: &[DocChunk],
        embeddings: Option<&[Option<Vec<f32>>]>,
        force: bool,
    ) -> Result<BatchUpsertReport> {
        self.pool.with_writer(|conn| {
            let tx = conn.unchecked_transaction()?;
            let mut report = BatchUpsertReport::default();
            for (i, doc) in docs.iter().enumerate() {
                let embedding = embeddings.and_then(|e| e.get(i)).and_then(Option::as_deref);
                match upsert_one(&tx, doc, embedding, force) {
                    Ok(changed) => {
                        if changed {
                            report.inserted += 1;
                        }
                    }
                    Err(e) => {
                        report.errors += 1;
                        report.last_error = Some(e.to_string());
                    }
                }
            }
            tx.commit()?;
            Ok(report)
        })
    }
}

fn upsert_one(conn: &Connection, doc: &DocChunk, embedding: Option<&[f32]>, force: bool) -> Result<bool> {
    let existing_fingerprint: Option<String> = conn
        .query_row(
            "SELECT fingerprint FROM docs WHERE doc_id = ?1",
            [&doc.doc_id],
            |row| row.get(0),
        )
        .optional()?;

    if !force {
        if let Some(existing) = &existing_fingerprint {
            if existing == &doc.fingerprint {
                return Ok(false);
            }
        }
    }

    let metadata_json = serde_json::to_string(&doc.metadata)?;
    let references_json = serde_json::to_string(&doc.references_out)?;
    let typed_refs_json = serde_json::to_string(&doc.typed_references_out)?;
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO docs (doc_id, type, path, name, module, asset_type, text, metadata,
            references_out, typed_references_out, fingerprint, schema_version, embed_model,
            embed_version, indexed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
         ON CONFLICT(doc_id) DO UPDATE SET
            type = excluded.type, path = excluded.path, name = excluded.name,
            module = excluded.module, asset_type = excluded.asset_type, text = excluded.text,
            metadata = excluded.metadata, references_out = excluded.references_out,
            typed_references_out = excluded.typed_references_out,
            fingerprint = excluded.fingerprint, schema_version = excluded.schema_version,
            embed_model = excluded.embed_model, embed_version = excluded.embed_version,
            indexed_at = excluded.indexed_at",
        params![
            doc.doc_id,
            doc.kind.as_str(),
            doc.path,
            doc.name,
            doc.module,
            doc.asset_type,
            doc.text,
            metadata_json,
            references_json,
            typed_refs_json,
            doc.fingerprint,
            doc.schema_version,
            doc.embed_model,
            doc.embed_version,
            now,
        ],
    )?;

    if let Some(vector) = embedding {
        let blob = encode_embedding(vector);
        conn.execute(
            "INSERT INTO docs_embeddings (doc_id, embedding, embed_model, embed_version)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(doc_id) DO UPDATE SET
                embedding = excluded.embedding, embed_model = excluded.embed_model,
                embed_version = excluded.embed_version",
            params![
                doc.doc_id,
                blob,
                doc.embed_model.clone().unwrap_or_default(),
                doc.embed_version.clone().unwrap_or_default(),
            ],
        )?;
    }

    conn.execute("DELETE FROM edges WHERE from_id = ?1", [&doc.doc_id])?;
    for target in &doc.references_out {
        let label = doc.edge_label_for(target);
        conn.execute(
            "INSERT OR IGNORE INTO edges (from_id, to_id, edge_type, metadata)
             VALUES (?1, ?2, ?3, '{}')",
            params![doc.doc_id, target, label],
        )?;
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ue_knowledge_schema::{DocChunk, DocKind};

    fn sample_doc(references: Vec<String>) -> DocChunk {
        DocChunk::new(
            "asset:/Game/Foo",
            DocKind::AssetSummary,
            "/Game/Foo",
            "Foo",
            "Foo is a Blueprint.",
            Some("Game".to_string()),
            Some("Blueprint".to_string()),
        )
        .with_references(references)
    }

    #[test]
    fn upsert_is_idempotent_on_equal_fingerprint() {
        let store = Store::open_in_memory().unwrap();
        let doc = sample_doc(vec![]);
        assert!(store.upsert_doc(&doc, None, false).unwrap());
        assert!(!store.upsert_doc(&doc, None, false).unwrap());
    }

    #[test]
    fn force_rewrites_even_with_equal_fingerprint() {
        let store = Store::open_in_memory().unwrap();
        let doc = sample_doc(vec![]);
        store.upsert_doc(&doc, None, false).unwrap();
        assert!(store.upsert_doc(&doc, None, true).unwrap());
    }

    #[test]
    fn upsert_rewrites_outgoing_edges() {
        let store = Store::open_in_memory().unwrap();
        let doc_v1 = sample_doc(vec!["asset:/Game/Bar".to_string()]);
        store.upsert_doc(&doc_v1, None, false).unwrap();

        let mut doc_v2 = sample_doc(vec!["asset:/Game/Baz".to_string()]);
        doc_v2.text = "Foo is a Blueprint, changed.".to_string();
        doc_v2.recompute_fingerprint();
        store.upsert_doc(&doc_v2, None, false).unwrap();

        let count: i64 = store
            .pool
            .with_reader(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM edges WHERE from_id = ?1 AND to_id = 'asset:/Game/Bar'",
                    ["asset:/Game/Foo"],
                    |r| r.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn batch_counts_errors_without_aborting() {
        let store = Store::open_in_memory().unwrap();
        let docs = vec![sample_doc(vec![])];
        let report = store.upsert_docs_batch(&docs, None, false).unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.errors, 0);
    }
}
