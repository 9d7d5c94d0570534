//! Error types for the key-value adapter.

/// Errors that can occur when talking to the backing object store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Object storage error
    #[error("object storage error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// S3 bucket not found - must be created before use
    #[error("S3 bucket '{0}' does not exist. Create it before starting the daemon.")]
    BucketNotFound(String),

    /// More keys than a single batched delete request accepts
    #[error("batch of {0} keys exceeds the per-request limit of {1}")]
    BatchTooLarge(usize, usize),
}

impl StoreError {
    /// Short machine-readable code for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::ObjectStore(object_store::Error::NotFound { .. }) => "NotFound",
            StoreError::ObjectStore(object_store::Error::AlreadyExists { .. }) => "AlreadyExists",
            StoreError::ObjectStore(object_store::Error::Precondition { .. }) => "Precondition",
            StoreError::ObjectStore(object_store::Error::NotImplemented) => "NotImplemented",
            StoreError::ObjectStore(_) => "Backend",
            StoreError::Io(_) => "Io",
            StoreError::InvalidConfig(_) => "InvalidConfig",
            StoreError::BucketNotFound(_) => "BucketNotFound",
            StoreError::BatchTooLarge(_, _) => "BatchTooLarge",
        }
    }
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, StoreError>;
