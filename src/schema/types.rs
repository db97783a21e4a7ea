//! Names and attribute kinds of the schema tree.

use std::borrow::Borrow;
use std::fmt;

use crate::storage::{validate_entry_name, InvalidNameError};

/// A column name as stored in the tree.
///
/// Names are opaque: whatever the store holds is rendered back verbatim.
/// Use [`ColumnName::validated`] when the name is about to become a tree entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ColumnName(String);

impl ColumnName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// create a name that is safe to write as a tree entry
    pub fn validated(name: impl Into<String>) -> Result<Self, InvalidNameError> {
        let name = name.into();
        validate_entry_name(&name, 64)?;
        Ok(Self(name))
    }

    /// empty names and dot entries (`.metadata`) are never columns
    pub fn is_hidden(&self) -> bool {
        is_hidden_name(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ColumnName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ColumnName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ColumnName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

pub(crate) fn is_hidden_name(name: &str) -> bool {
    name.is_empty() || name.starts_with('.')
}

/// The attribute blobs a column tree may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// SQL type text, e.g. `varchar(255)`. Required.
    Type,
    /// Presence-only marker.
    NotNull,
    /// Default value text, unquoted.
    Default,
    /// Presence-only marker.
    AutoIncrement,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Type,
        Attribute::NotNull,
        Attribute::Default,
        Attribute::AutoIncrement,
    ];

    /// the blob name inside a column tree
    pub fn file_name(&self) -> &'static str {
        match self {
            Attribute::Type => "type",
            Attribute::NotNull => "not_null",
            Attribute::Default => "default",
            Attribute::AutoIncrement => "auto_increment",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.file_name() == name)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}
