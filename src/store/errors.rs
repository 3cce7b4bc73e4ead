//! # Store Errors

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a `FormStore`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record with this form number already exists
    #[error("Form number already exists: {0}")]
    DuplicateKey(String),

    /// The store could not be reached or could not complete the operation
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::StorageUnavailable(message.into())
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::DuplicateKey(_))
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        StoreError::StorageUnavailable(err.to_string())
    }
}
