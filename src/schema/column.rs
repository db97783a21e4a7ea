//! Column attribute sets and their SQL rendering.

use tracing::trace;

use super::error::{SchemaError, SchemaResult};
use super::types::{Attribute, ColumnName};
use crate::storage::{TreeEntry, TreeId, TreeStore};

/// Default text that is always emitted without quotes.
const CURRENT_TIMESTAMP: &str = "CURRENT_TIMESTAMP";

/// The attributes found in one column tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnAttributes {
    pub data_type: Option<String>,
    pub not_null: bool,
    pub default: Option<String>,
    pub auto_increment: bool,
}

impl ColumnAttributes {
    /// A nullable column of the given type.
    pub fn new(data_type: impl Into<String>) -> Self {
        Self {
            data_type: Some(data_type.into()),
            ..Default::default()
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Read the attribute blobs of a column tree.
    ///
    /// Unknown entries are ignored. Markers count by presence alone; `type`
    /// and `default` must be files to count.
    pub fn load<S: TreeStore + ?Sized>(store: &S, column: TreeId) -> SchemaResult<Self> {
        let mut attributes = ColumnAttributes::default();

        for entry in store.list_children(column)? {
            let Some(attribute) = Attribute::from_file_name(&entry.name) else {
                trace!(name = %entry.name, "ignoring unknown column attribute");
                continue;
            };

            match attribute {
                Attribute::Type => attributes.data_type = read_text(store, &entry)?,
                Attribute::Default => attributes.default = read_text(store, &entry)?,
                Attribute::NotNull => attributes.not_null = true,
                Attribute::AutoIncrement => attributes.auto_increment = true,
            }
        }

        Ok(attributes)
    }

    /// The attribute blobs that represent this column on disk.
    ///
    /// Markers are written as empty blobs.
    pub fn to_blobs(&self) -> Vec<(Attribute, Vec<u8>)> {
        let mut blobs = Vec::new();
        if let Some(data_type) = &self.data_type {
            blobs.push((Attribute::Type, data_type.as_bytes().to_vec()));
        }
        if self.not_null {
            blobs.push((Attribute::NotNull, Vec::new()));
        }
        if let Some(default) = &self.default {
            blobs.push((Attribute::Default, default.as_bytes().to_vec()));
        }
        if self.auto_increment {
            blobs.push((Attribute::AutoIncrement, Vec::new()));
        }
        blobs
    }

    /// Render as a column definition: `name type [NOT NULL] [DEFAULT x] [AUTO_INCREMENT]`.
    ///
    /// Fails only when there is no `type`.
    pub fn render(&self, name: &ColumnName) -> SchemaResult<String> {
        let data_type = self
            .data_type
            .as_deref()
            .map(str::trim)
            .ok_or_else(|| SchemaError::InvalidColumn(name.clone()))?;

        let mut sql = format!("{} {}", name, data_type);
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = self.default.as_deref().map(str::trim) {
            // the catalog hands defaults over unquoted, so quoting is guessed
            if default_is_unquoted(data_type, default) {
                sql.push_str(&format!(" DEFAULT {}", default));
            } else {
                sql.push_str(&format!(" DEFAULT '{}'", default));
            }
        }
        if self.auto_increment {
            sql.push_str(" AUTO_INCREMENT");
        }
        Ok(sql)
    }
}

/// `CURRENT_TIMESTAMP` and anything on a type mentioning `int` stay bare.
///
/// This is a heuristic: a `varchar` column whose literal default is the text
/// `CURRENT_TIMESTAMP` is rendered wrong, and so is `point` vs `int`.
fn default_is_unquoted(data_type: &str, default: &str) -> bool {
    default == CURRENT_TIMESTAMP || data_type.contains("int")
}

fn read_text<S: TreeStore + ?Sized>(store: &S, entry: &TreeEntry) -> SchemaResult<Option<String>> {
    match entry.blob_id() {
        Some(blob) => {
            let bytes = store.read_blob(blob)?;
            Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
        }
        None => Ok(None),
    }
}

/// Render the column stored at `entry`.
///
/// An entry that isn't a directory, or a directory without a `type`, is an
/// `InvalidColumn`.
pub fn render_column<S: TreeStore + ?Sized>(
    store: &S,
    name: &ColumnName,
    entry: &TreeEntry,
) -> SchemaResult<String> {
    let column = entry
        .tree_id()
        .ok_or_else(|| SchemaError::InvalidColumn(name.clone()))?;
    ColumnAttributes::load(store, column)?.render(name)
}
