//! In-memory picture of a database catalog, ready to be written as a tree.

use std::collections::HashMap;

use crate::schema::{ColumnAttributes, ColumnName, TableMetadata};
use crate::storage::TableName;

use super::error::{ImportError, ImportResult};

/// One column as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColDefinition {
    pub name: ColumnName,
    pub nullable: bool,
    pub data_type: String,
    pub default: Option<String>,
    pub auto_increment: bool,
}

impl ColDefinition {
    /// The attribute set this column is stored as.
    pub fn attributes(&self) -> ColumnAttributes {
        ColumnAttributes {
            data_type: Some(self.data_type.clone()),
            not_null: !self.nullable,
            default: self.default.clone().filter(|d| !d.is_empty()),
            auto_increment: self.auto_increment,
        }
    }
}

/// Table-level facts that end up in `.metadata`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: TableName,
    pub column_order: Vec<ColumnName>,
    pub engine: Option<String>,
    /// Empty when the table has no primary key.
    pub primary_key: Vec<ColumnName>,
}

impl TableInfo {
    pub fn metadata(&self) -> TableMetadata {
        let primary_key = (!self.primary_key.is_empty()).then(|| {
            let names: Vec<&str> = self.primary_key.iter().map(ColumnName::as_str).collect();
            ColumnName::new(names.join(","))
        });
        TableMetadata {
            primary_key,
            order: Some(self.column_order.clone()).filter(|o| !o.is_empty()),
            charset: None,
            engine: self.engine.clone().filter(|e| !e.is_empty()),
        }
    }
}

/// A `COLUMNS` row: table, column, type, `IS_NULLABLE`, default, `EXTRA`.
pub type ColumnRow = (String, String, String, String, Option<String>, String);
/// A `TABLES` row: table, engine.
pub type TableRow = (String, Option<String>);
/// A `KEY_COLUMN_USAGE` row of a `PRIMARY` constraint: table, column.
pub type KeyRow = (String, String);

/// Everything an import writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub database: String,
    /// In catalog order: by table, then ordinal position.
    pub columns: Vec<(TableName, ColDefinition)>,
    pub tables: Vec<TableInfo>,
}

impl CatalogSnapshot {
    /// Assemble a snapshot from raw catalog rows.
    ///
    /// Column rows must arrive ordered by ordinal position within a table;
    /// that order becomes the recorded column order. Key rows likewise.
    pub fn from_rows(
        database: impl Into<String>,
        columns: Vec<ColumnRow>,
        tables: Vec<TableRow>,
        keys: Vec<KeyRow>,
    ) -> ImportResult<Self> {
        let mut snapshot = CatalogSnapshot {
            database: database.into(),
            ..Default::default()
        };

        let mut order: HashMap<String, Vec<ColumnName>> = HashMap::new();
        for (table, column, data_type, nullable, default, extra) in columns {
            let table_name =
                TableName::new(table.as_str()).map_err(|e| ImportError::invalid_name(&table, e))?;
            let name =
                ColumnName::validated(column.as_str()).map_err(|e| ImportError::invalid_name(&column, e))?;

            order.entry(table).or_default().push(name.clone());
            snapshot.columns.push((
                table_name,
                ColDefinition {
                    name,
                    nullable: nullable.eq_ignore_ascii_case("YES"),
                    data_type,
                    default,
                    auto_increment: extra.to_ascii_lowercase().contains("auto_increment"),
                },
            ));
        }

        let mut primary_keys: HashMap<String, Vec<ColumnName>> = HashMap::new();
        for (table, column) in keys {
            primary_keys.entry(table).or_default().push(ColumnName::new(column));
        }

        for (table, engine) in tables {
            let name =
                TableName::new(table.as_str()).map_err(|e| ImportError::invalid_name(&table, e))?;
            snapshot.tables.push(TableInfo {
                name,
                column_order: order.remove(&table).unwrap_or_default(),
                engine,
                primary_key: primary_keys.remove(&table).unwrap_or_default(),
            });
        }

        Ok(snapshot)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}
