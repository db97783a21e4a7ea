//! Schema rendering errors.

use thiserror::Error;

use super::types::ColumnName;
use crate::storage::StorageError;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema-related errors.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The column has no `type` attribute, or is not a directory at all.
    #[error("invalid column: {0}")]
    InvalidColumn(ColumnName),

    /// The table entry is not a directory.
    #[error("invalid table: {0}")]
    InvalidTable(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SchemaError {
    /// Errors that only affect a single column or table and can be skipped.
    pub fn is_skippable(&self) -> bool {
        matches!(self, SchemaError::InvalidColumn(_) | SchemaError::InvalidTable(_))
    }
}
