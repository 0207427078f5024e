use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("core error: {0}")]
    Core(#[from] deskdo_core::CoreError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("group not found: {0}")]
    GroupNotFound(String),

    #[error("group already exists: {0}")]
    GroupExists(String),

    #[error("the default group '{0}' cannot be renamed or deleted")]
    ImmutableGroup(String),

    #[error("ambiguous task id prefix '{prefix}': matches {count} tasks")]
    AmbiguousPrefix { prefix: String, count: usize },

    #[error("lock file conflict: {0}")]
    LockConflict(String),
}

impl StoreError {
    /// Read/write failures of the underlying documents, as opposed to
    /// rejected input.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Json(_) | Self::LockConflict(_))
    }
}
