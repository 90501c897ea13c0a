use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("asset parser binary not resolvable: {0}")]
    BinaryMissing(String),
    #[error("subprocess timed out after {0}s")]
    Timeout(u64),
    #[error("subprocess exited with status {0}")]
    NonZeroExit(i32),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json decode error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("xml decode error: {0}")]
    Xml(String),
}

impl From<Error> for ue_knowledge_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::BinaryMissing(path) => ue_knowledge_core::Error::ParserMissing(path),
            other => ue_knowledge_core::Error::other(other.to_string()),
        }
    }
}
