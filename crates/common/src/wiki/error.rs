use object_store::StoreError;

use crate::auth::AccessDenied;

#[derive(Debug, thiserror::Error)]
pub enum WikiError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("{failed} of {total} keys failed")]
    PartialFailure { failed: usize, total: usize },
}

impl WikiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
