//! Table rendering: a table tree becomes one `CREATE TABLE` statement.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::column::render_column;
use super::error::{SchemaError, SchemaResult};
use super::metadata::{TableMetadata, METADATA_FILE};
use super::types::{is_hidden_name, ColumnName};
use crate::storage::{TreeEntry, TreeStore};

/// Read `.metadata` from a table's entries.
///
/// A missing blob is the default metadata. So is one that can't be read,
/// after a warning.
pub fn load_metadata<S: TreeStore + ?Sized>(store: &S, entries: &[TreeEntry]) -> TableMetadata {
    let Some(blob) = entries
        .iter()
        .find(|e| e.name == METADATA_FILE)
        .and_then(TreeEntry::blob_id)
    else {
        return TableMetadata::default();
    };

    match store.read_blob(blob) {
        Ok(bytes) => TableMetadata::decode(&bytes),
        Err(e) => {
            warn!(blob = %blob, error = %e, "unreadable table metadata, using defaults");
            TableMetadata::default()
        }
    }
}

/// The order columns are rendered in.
///
/// Recorded names come first, then whatever else the tree holds in tree
/// order. Hidden names never appear and each name appears once.
pub fn effective_order(metadata: &TableMetadata, entries: &[TreeEntry]) -> Vec<ColumnName> {
    let recorded = metadata.order.iter().flatten().map(ColumnName::as_str);
    let in_tree = entries.iter().map(|e| e.name.as_str());

    let mut seen = HashSet::new();
    recorded
        .chain(in_tree)
        .filter(|name| !is_hidden_name(name))
        .filter(|name| seen.insert(*name))
        .map(ColumnName::new)
        .collect()
}

/// Render the table stored at `entry` as DDL text.
///
/// Columns that fail to render are left out. The result always ends in
/// `;\n`; the column block only appears when at least one column rendered.
pub fn render_table<S: TreeStore + ?Sized>(
    store: &S,
    name: &str,
    entry: &TreeEntry,
) -> SchemaResult<String> {
    let table = entry
        .tree_id()
        .ok_or_else(|| SchemaError::InvalidTable(name.to_string()))?;
    let entries = store.list_children(table)?;
    let metadata = load_metadata(store, &entries);

    let mut columns = Vec::new();
    for column in effective_order(&metadata, &entries) {
        let Some(column_entry) = entries.iter().find(|e| e.name == column.as_str()) else {
            debug!(table = name, column = %column, "ordered column missing from tree");
            continue;
        };
        match render_column(store, &column, column_entry) {
            Ok(sql) => columns.push(sql),
            Err(e) if e.is_skippable() => {
                debug!(table = name, column = %column, error = %e, "skipping column");
            }
            Err(e) => return Err(e),
        }
    }

    let mut sql = String::new();
    if !columns.is_empty() {
        sql.push_str(&format!(
            "\nCREATE TABLE {} (\n\t{}\n)",
            name,
            columns.join(",\n\t")
        ));
    }
    if let Some(charset) = &metadata.charset {
        sql.push_str(&format!(" CHARACTER SET = {}", charset));
    }
    if let Some(engine) = &metadata.engine {
        sql.push_str(&format!(" ENGINE = {}", engine));
    }
    sql.push_str(";\n");
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SchemaFixture;

    fn entries(names: &[&str]) -> Vec<TreeEntry> {
        names.iter().map(|n| TreeEntry::absent(*n)).collect()
    }

    fn names(list: &[ColumnName]) -> Vec<&str> {
        list.iter().map(ColumnName::as_str).collect()
    }

    #[test]
    fn test_order_reconciliation() {
        let metadata = TableMetadata {
            order: Some(vec!["b".into(), "a".into()]),
            ..Default::default()
        };
        let order = effective_order(&metadata, &entries(&["a", "b", "c"]));
        assert_eq!(names(&order), ["b", "a", "c"]);
    }

    #[test]
    fn test_unset_order_follows_tree() {
        let order = effective_order(
            &TableMetadata::default(),
            &entries(&[".metadata", "id", "name"]),
        );
        assert_eq!(names(&order), ["id", "name"]);
    }

    #[test]
    fn test_hidden_names_never_ordered() {
        let metadata = TableMetadata {
            order: Some(vec!["".into(), ".metadata".into(), "id".into(), "id".into()]),
            ..Default::default()
        };
        let order = effective_order(&metadata, &entries(&[".metadata", "id"]));
        assert_eq!(names(&order), ["id"]);
    }

    fn render_head(fixture: &SchemaFixture, table: &str) -> SchemaResult<String> {
        let tables = fixture.tables("HEAD");
        let entry = fixture
            .repo
            .list_children(tables)
            .unwrap()
            .into_iter()
            .find(|e| e.name == table)
            .unwrap();
        render_table(&fixture.repo, table, &entry)
    }

    #[test]
    fn test_render_with_metadata() {
        let fixture = SchemaFixture::new();
        fixture.commit(|w| {
            w.put_column("users", "email", &[("type", b"varchar(255)")])?;
            w.put_column("users", "id", &[("type", b"int"), ("not_null", b"")])?;
            w.put_file(
                "users",
                ".metadata",
                b"Primary Key: id\nEngine: InnoDB\nColumn Order: id,email\nCharacter Set: utf8mb4\n",
            )
        });

        assert_eq!(
            render_head(&fixture, "users").unwrap(),
            "\nCREATE TABLE users (\n\tid int NOT NULL,\n\temail varchar(255)\n) CHARACTER SET = utf8mb4 ENGINE = InnoDB;\n"
        );
    }

    #[test]
    fn test_render_skips_invalid_columns() {
        let fixture = SchemaFixture::new();
        fixture.commit(|w| {
            w.put_column("t", "id", &[("type", b"int")])?;
            w.put_column("t", "broken", &[("default", b"1")])
        });

        assert_eq!(
            render_head(&fixture, "t").unwrap(),
            "\nCREATE TABLE t (\n\tid int\n);\n"
        );
    }

    #[test]
    fn test_render_without_columns() {
        let fixture = SchemaFixture::new();
        fixture.commit(|w| w.put_file("empty", ".metadata", b"Engine: MyISAM\n"));

        assert_eq!(render_head(&fixture, "empty").unwrap(), " ENGINE = MyISAM;\n");
    }

    #[test]
    fn test_blob_entry_is_not_a_table() {
        let fixture = SchemaFixture::new();
        let result = render_table(&fixture.repo, "README", &TreeEntry::absent("README"));
        assert!(matches!(result, Err(SchemaError::InvalidTable(ref n)) if n == "README"));
    }
}
