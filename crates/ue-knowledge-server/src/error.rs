use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] ue_knowledge_store::Error),
    #[error(transparent)]
    Indexer(#[from] ue_knowledge_indexer::Error),
    #[error(transparent)]
    Parser(#[from] ue_knowledge_parser::Error),
    #[error(transparent)]
    Core(#[from] ue_knowledge_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} does not look like an Unreal project root (no Content/ directory)")]
    NotAProjectRoot(std::path::PathBuf),
}
