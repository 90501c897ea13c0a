use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] ue_knowledge_store::Error),
    #[error(transparent)]
    Retriever(#[from] ue_knowledge_retriever::Error),
}

impl From<Error> for ue_knowledge_core::Error {
    fn from(err: Error) -> Self {
        ue_knowledge_core::Error::other(err.to_string())
    }
}
