use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Indexer error: {0}")]
    IndexerError(#[from] context_indexer::IndexerError),

    #[error("Invalid repository path: {0}")]
    InvalidPath(String),
}
