//! Reading a schema snapshot back as SQL.
//!
//! A snapshot is laid out as
//!
//! ```text
//! <root>/<table>/.metadata
//! <root>/<table>/<column>/{type,not_null,default,auto_increment}
//! ```
//!
//! [`render_table`] walks one table tree and produces its `CREATE TABLE`
//! text; [`render_column`] does the same for a single column definition,
//! which is what `ALTER TABLE` statements need.

mod column;
mod error;
mod metadata;
mod table;
mod types;

pub use column::{render_column, ColumnAttributes};
pub use error::{SchemaError, SchemaResult};
pub use metadata::{MetadataLine, TableMetadata, METADATA_FILE};
pub use table::{effective_order, load_metadata, render_table};
pub use types::{Attribute, ColumnName};
