//! Phase 7 — embeddings (optional, spec §4.5).

use ue_knowledge_schema::DocChunk;
use ue_knowledge_store::Store;

use crate::error::Result;

/// Computes a vector embedding for a doc's `text`. Swappable so tests and
/// offline runs don't need a real model loaded.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
    fn model_name(&self) -> &str;
    fn version(&self) -> &str;
}

/// Stamp `embed_model`/`embed_version` and compute embeddings for `docs`,
/// returning a vector aligned 1:1 with `docs` for `Store::upsert_docs_batch`.
pub fn embed_docs(embedder: &dyn Embedder, docs: &mut [DocChunk]) -> Result<Vec<Option<Vec<f32>>>> {
    let mut embeddings = Vec::with_capacity(docs.len());
    for doc in docs.iter_mut() {
        let vector = embedder.embed(&doc.text)?;
        doc.embed_model = Some(embedder.model_name().to_string());
        doc.embed_version = Some(embedder.version().to_string());
        embeddings.push(Some(vector));
    }
    Ok(embeddings)
}

/// Compute embeddings for any doc in the store that lacks one yet (spec
/// §4.5: "a separate `backfill_embeddings` pass"). Returns the number of
/// docs updated.
pub fn backfill_embeddings(store: &Store, embedder: &dyn Embedder, limit: usize) -> Result<usize> {
    let missing = store.docs_missing_embedding(limit)?;
    let mut updated = 0;
    for (doc_id, text) in missing {
        let vector = embedder.embed(&text)?;
        store.set_embedding(&doc_id, &vector, embedder.model_name(), embedder.version())?;
        updated += 1;
    }
    Ok(updated)
}
