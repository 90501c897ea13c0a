//! Multi-phase incremental indexing pipeline (spec §4.5): discovery,
//! change detection, classification, lightweight and semantic extraction,
//! file-metadata bookkeeping, and optional embeddings.

pub mod batching;
pub mod change_detection;
pub mod classify;
pub mod deep_refs;
pub mod discovery;
pub mod embeddings;
pub mod error;
pub mod gameplay_tags;
pub mod lightweight_indexing;
pub mod pipeline;
pub mod reclassify;
pub mod refs;
pub mod semantic;
pub mod types;
pub mod util;

pub use embeddings::{backfill_embeddings, embed_docs, Embedder};
pub use error::{Error, Result};
pub use pipeline::Pipeline;
pub use types::{IndexCounters, IndexOptions, PhaseTiming};
