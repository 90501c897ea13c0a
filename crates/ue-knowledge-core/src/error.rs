//! Shared error taxonomy.
//!
//! Layer-specific crates (`ue-knowledge-store`, `ue-knowledge-parser`, ...)
//! define their own `thiserror` enums; this type is the one every public API
//! boundary eventually collapses into, matching the error-kind taxonomy in
//! spec §7 (Not-built-yet, Parser-missing, Parser-per-file-failure,
//! Malformed-parser-output, DB-write-error, Unresolvable-reference,
//! Query-syntax-error).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error kind. Named after the taxonomy in spec §7 rather than
/// after the crate that raised it, so callers can match on "what kind of
/// thing went wrong" without knowing the internal layering.
#[derive(Debug, Error)]
pub enum Error {
    #[error("knowledge store not built yet at {0}")]
    StoreNotBuilt(String),

    #[error("asset parser binary not resolvable: {0}")]
    ParserMissing(String),

    #[error("database error: {0}")]
    Db(String),

    #[error("invalid profile: {0}")]
    Profile(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
