//! Hybrid exact/semantic retrieval over the knowledge store (spec §4.6):
//! query classification, FTS query preparation, and merged context bundles.

pub mod classify;
pub mod embedder;
pub mod error;
pub mod fts_query;
pub mod retrieve;
pub mod types;

pub use classify::classify_query;
pub use embedder::QueryEmbedder;
pub use error::{Error, Result};
pub use fts_query::prepare_fts_query;
pub use retrieve::Retriever;
pub use types::{ContextBundle, QueryType, RetrieveOptions};
