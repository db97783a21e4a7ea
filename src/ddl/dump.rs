//! Full snapshot dumps.

use tracing::warn;

use super::emit::Statement;
use crate::schema::{render_table, SchemaResult};
use crate::storage::{RefManager, TreeId, TreeStore};

/// Render the tables of a tables root in tree order.
///
/// With a non-empty `only`, tables not named in it are left out. A table
/// that fails to render is logged and skipped.
pub fn dump_tables<S: TreeStore + ?Sized>(
    store: &S,
    tables: TreeId,
    only: &[String],
) -> SchemaResult<Vec<Statement>> {
    let mut statements = Vec::new();

    for entry in store.list_children(tables)? {
        if !only.is_empty() && !only.iter().any(|name| *name == entry.name) {
            continue;
        }
        match render_table(store, &entry.name, &entry) {
            Ok(sql) => statements.push(Statement::CreateTable {
                table: entry.name.clone(),
                sql,
            }),
            Err(e) => warn!(table = %entry.name, error = %e, "skipping table"),
        }
    }

    Ok(statements)
}

/// Render a revision's snapshot. Failing to resolve the revision is fatal.
pub fn dump_revision<S: TreeStore + ?Sized>(
    store: &S,
    revision: &str,
    schema_root: &str,
    only: &[String],
) -> SchemaResult<Vec<Statement>> {
    let tables = store.resolve_tree(&RefManager::schema_treeish(revision, schema_root))?;
    dump_tables(store, tables, only)
}
