//! Embedded SQLite-backed store: documents, full-text index, vector
//! similarity, reference edges, and the lightweight-asset fast path.

pub mod cpp;
pub mod embeddings_backfill;
pub mod error;
pub mod file_meta;
pub mod fts;
pub mod graph;
pub mod lightweight;
pub mod lookup;
pub mod pool;
pub mod schema;
pub mod search_vector;
pub mod store;
pub mod tags;
pub mod types;
pub mod vector;

pub use error::{Error, Result};
pub use pool::StorePool;
pub use store::Store;
pub use file_meta::FileMetaRow;
pub use types::{
    BatchUpsertReport, ChildResult, CppResolution, GraphEdge, GraphNode, LightweightAssetRow,
    RefDirection, ReferenceGraph, ReferencingAsset, SearchFilters, SearchResult, TagMatch,
};
