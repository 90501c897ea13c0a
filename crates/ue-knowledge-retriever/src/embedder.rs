//! Query-time embedding port (spec §4.6). Decoupled from the indexer's own
//! embedder so the retriever crate never needs to depend on the indexing
//! pipeline — both sides just need "text in, vector out".

use crate::error::Result;

pub trait QueryEmbedder: Send + Sync {
    fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}
