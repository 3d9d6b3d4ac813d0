use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available in this context")]
    Unavailable,
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn backend<T: Into<String>>(message: T) -> Self {
        Self::Backend(message.into())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
