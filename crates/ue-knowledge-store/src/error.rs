use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store not yet built at {0}")]
    NotBuilt(String),
    #[error("malformed embedding blob for {0}: expected {1} bytes, got {2}")]
    BadEmbedding(String, usize, usize),
    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<Error> for ue_knowledge_core::Error {
    fn from(err: Error) -> Self {
        ue_knowledge_core::Error::Db(err.to_string())
    }
}
