//! Catalog import.
//!
//! [`MySqlCatalog`] reads `information_schema` into a [`CatalogSnapshot`];
//! [`SchemaImporter`] commits that snapshot as a fresh tables tree.

mod catalog;
mod error;
mod mysql;
mod writer;

pub use catalog::{CatalogSnapshot, ColDefinition, ColumnRow, KeyRow, TableInfo, TableRow};
pub use error::{ImportError, ImportResult};
pub use mysql::MySqlCatalog;
pub use writer::SchemaImporter;
