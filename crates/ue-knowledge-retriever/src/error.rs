use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] ue_knowledge_store::Error),
    #[error("embedding failed: {0}")]
    Embed(String),
}

impl From<Error> for ue_knowledge_core::Error {
    fn from(err: Error) -> Self {
        ue_knowledge_core::Error::other(err.to_string())
    }
}
