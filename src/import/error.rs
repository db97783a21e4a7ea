//! Import errors.

use thiserror::Error;

use crate::storage::{InvalidNameError, StorageError};

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A catalog name can't be written as a tree entry.
    #[error("invalid name {name:?}: {source}")]
    InvalidName {
        name: String,
        #[source]
        source: InvalidNameError,
    },

    /// A required connection option was not given.
    #[error("missing option: --{0}")]
    MissingOption(&'static str),
}

impl ImportError {
    pub(crate) fn invalid_name(name: &str, source: InvalidNameError) -> Self {
        ImportError::InvalidName {
            name: name.to_string(),
            source,
        }
    }
}
