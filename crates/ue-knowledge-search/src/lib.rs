//! Auto-routed search engine over the knowledge store (spec §4.7): mode
//! dispatch, per-mode semantics, shared post-processing, and the public
//! [`api::KnowledgeApi`] entry point.

pub mod api;
pub mod error;
pub mod modes;
pub mod postprocess;
pub mod route;
pub mod types;

pub use api::KnowledgeApi;
pub use error::{Error, Result};
pub use route::route;
pub use types::{
    Detail, InspectOptions, InspectResponse, SearchHit, SearchMode, SearchRequest, SearchResponse, SystemTrace,
    TraceTarget,
};
