//! Storage layer error types
//!
//! All errors that can occur during storage operations are defined here.
//! We use `thiserror` for ergonomic error definition and better error messages.

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::types::InvalidNameError;

/// the main error type for storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// error from the underlying Git library
    #[error(transparent)]
    Git(#[from] git2::Error),

    /// a revision could not be turned into a single tree
    #[error("cannot resolve '{reference}' to a schema tree: {reason}")]
    ReferenceResolutionFailed { reference: String, reason: String },

    /// invalid table or column name
    #[error(transparent)]
    InvalidName(#[from] InvalidNameError),

    /// repo is not initialized
    #[error("repository not initialized: {0}")]
    NotInitialized(PathBuf),

    /// repo is empty (no commits)
    #[error("repository is empty: no commits found")]
    EmptyRepository,

    /// internal error that shouldn't happen
    #[error("internal error: {0}")]
    Internal(String),
}

impl StorageError {
    pub(crate) fn resolution(reference: &str, reason: impl ToString) -> Self {
        StorageError::ReferenceResolutionFailed {
            reference: reference.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
