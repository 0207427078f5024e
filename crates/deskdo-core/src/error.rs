use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid task id: {0:?}")]
    InvalidTaskId(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
