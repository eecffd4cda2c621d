//! Shared store types for Keepsake
//!
//! Error types returned by domain stores, independent of the backing medium.

use crate::error::Error;
use thiserror::Error;

/// Store-specific error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    /// Optimistic check-and-set failed: the record moved on since it was read
    #[error("Version conflict: expected version {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Error::NotFound("Record not found".to_string()),
            StoreError::AlreadyExists => Error::Conflict("Record already exists".to_string()),
            e @ StoreError::VersionConflict { .. } => Error::Conflict(e.to_string()),
        }
    }
}
