//! Snapshot comparison.
//!
//! Two snapshots are compared one level at a time: first the tables root,
//! then the column level of every table present on both sides. Attribute
//! trees are never walked; a changed column is simply re-rendered from its
//! new definition.

use tracing::{debug, warn};

use super::emit::Statement;
use crate::schema::{render_column, render_table, ColumnName, SchemaResult};
use crate::storage::{ChangeStatus, HashDiff, RefManager, TreeId, TreeStore};

/// Computes the statements that turn one snapshot into another.
pub struct SnapshotDiffer<'s, S: TreeStore + ?Sized> {
    store: &'s S,
    schema_root: String,
}

impl<'s, S: TreeStore + ?Sized> SnapshotDiffer<'s, S> {
    pub fn new(store: &'s S, schema_root: impl Into<String>) -> Self {
        Self {
            store,
            schema_root: schema_root.into(),
        }
    }

    /// Diff two revisions. Either one failing to resolve is fatal.
    pub fn diff(&self, from: &str, to: &str) -> SchemaResult<Vec<Statement>> {
        let from = self
            .store
            .resolve_tree(&RefManager::schema_treeish(from, &self.schema_root))?;
        let to = self
            .store
            .resolve_tree(&RefManager::schema_treeish(to, &self.schema_root))?;
        self.diff_trees(from, to)
    }

    /// Diff two tables roots.
    pub fn diff_trees(&self, from: TreeId, to: TreeId) -> SchemaResult<Vec<Statement>> {
        let mut statements = Vec::new();

        for change in self.store.diff_trees(from, to)? {
            let table = change.name.as_str();
            match change.status() {
                Some(ChangeStatus::Deleted) => statements.push(Statement::DropTable {
                    table: table.to_string(),
                }),
                Some(ChangeStatus::Added) => {
                    let sql = render_table(self.store, table, &change.dst)?;
                    statements.push(Statement::CreateTable {
                        table: table.to_string(),
                        sql,
                    });
                }
                Some(ChangeStatus::Modified) => self.diff_table(&change, &mut statements)?,
                None => {
                    debug!(name = table, "ignoring non-table entry at tables root");
                }
            }
        }

        Ok(statements)
    }

    fn diff_table(&self, table: &HashDiff, statements: &mut Vec<Statement>) -> SchemaResult<()> {
        let (Some(from), Some(to)) = (table.src.tree_id(), table.dst.tree_id()) else {
            return Ok(());
        };

        for change in self.store.diff_trees(from, to)? {
            let column = ColumnName::new(change.name.as_str());
            if column.is_hidden() {
                continue;
            }

            let status = match change.status() {
                Some(status) => status,
                None => continue,
            };
            if status == ChangeStatus::Deleted {
                statements.push(Statement::DropColumn {
                    table: table.name.clone(),
                    column: column.to_string(),
                });
                continue;
            }

            let definition = match render_column(self.store, &column, &change.dst) {
                Ok(definition) => definition,
                Err(e) if e.is_skippable() => {
                    warn!(table = %table.name, column = %column, error = %e, "skipping column");
                    continue;
                }
                Err(e) => return Err(e),
            };
            let table = table.name.clone();
            statements.push(match status {
                ChangeStatus::Modified => Statement::ModifyColumn { table, definition },
                _ => Statement::AddColumn { table, definition },
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SchemaFixture;

    fn base(fixture: &SchemaFixture) -> String {
        fixture
            .commit(|w| {
                w.put_column("T", "id", &[("type", b"int"), ("not_null", b"")])?;
                w.put_column("U", "id", &[("type", b"int")])?;
                w.put_file("T", ".metadata", b"Primary Key: id\n")
            })
            .to_string()
    }

    #[test]
    fn test_same_revision_is_empty() {
        let fixture = SchemaFixture::new();
        let commit = base(&fixture);
        let differ = SnapshotDiffer::new(&fixture.repo, ".schema/tables");
        assert!(differ.diff(&commit, &commit).unwrap().is_empty());
    }

    #[test]
    fn test_column_changes() {
        let fixture = SchemaFixture::new();
        let from = base(&fixture);
        let to = fixture.commit(|w| {
            w.put_column("T", "id", &[("type", b"bigint"), ("not_null", b"")])?;
            w.put_column("T", "name", &[("type", b"varchar(20)"), ("default", b"x")])?;
            w.put_column("T", "broken", &[("not_null", b"")])?;
            w.put_column("U", "id", &[("type", b"int")])?;
            w.put_file("T", ".metadata", b"Primary Key: id\nEngine: InnoDB\n")
        });

        let differ = SnapshotDiffer::new(&fixture.repo, ".schema/tables");
        let statements = differ.diff(&from, &to.to_string()).unwrap();
        let text: Vec<String> = statements.iter().map(ToString::to_string).collect();
        assert_eq!(
            text,
            [
                "ALTER TABLE T MODIFY COLUMN id bigint NOT NULL;",
                "ALTER TABLE T ADD COLUMN name varchar(20) DEFAULT 'x';",
            ]
        );
    }

    #[test]
    fn test_table_changes() {
        let fixture = SchemaFixture::new();
        let from = base(&fixture);
        let to = fixture.commit(|w| {
            w.put_column("T", "id", &[("type", b"int"), ("not_null", b"")])?;
            w.put_file("T", ".metadata", b"Primary Key: id\n")?;
            w.put_column("V", "id", &[("type", b"int"), ("not_null", b"")])
        });

        let differ = SnapshotDiffer::new(&fixture.repo, ".schema/tables");
        let statements = differ.diff(&from, &to.to_string()).unwrap();
        assert_eq!(
            statements,
            vec![
                Statement::DropTable { table: "U".into() },
                Statement::CreateTable {
                    table: "V".into(),
                    sql: "\nCREATE TABLE V (\n\tid int NOT NULL\n);\n".into(),
                },
            ]
        );
    }

    #[test]
    fn test_dropped_column_and_reverse() {
        let fixture = SchemaFixture::new();
        let from = fixture.commit(|w| {
            w.put_column("T", "id", &[("type", b"int")])?;
            w.put_column("T", "legacy", &[("type", b"text")])
        });
        let to = fixture.commit(|w| w.put_column("T", "id", &[("type", b"int")]));

        let differ = SnapshotDiffer::new(&fixture.repo, ".schema/tables");
        let forward = differ.diff_trees(fixture.tables(&from.to_string()), fixture.tables(&to.to_string()));
        assert_eq!(
            forward.unwrap(),
            vec![Statement::DropColumn {
                table: "T".into(),
                column: "legacy".into(),
            }]
        );

        let backward = differ.diff(&to.to_string(), &from.to_string()).unwrap();
        assert_eq!(
            backward,
            vec![Statement::AddColumn {
                table: "T".into(),
                definition: "legacy text".into(),
            }]
        );
    }

    #[test]
    fn test_file_replaced_by_directory() {
        let fixture = SchemaFixture::new();
        let from = fixture.commit(|w| {
            w.put_column("T", "id", &[("type", b"int")])?;
            w.put_file("T", "note", b"scratch")?;
            w.put_file("T", "later", b"placeholder")
        });
        let to = fixture.commit(|w| {
            w.put_column("T", "id", &[("type", b"int")])?;
            w.put_file("T", "note", b"edited")?;
            w.put_column("T", "later", &[("type", b"date")])
        });

        let differ = SnapshotDiffer::new(&fixture.repo, ".schema/tables");
        let statements = differ.diff(&from.to_string(), &to.to_string()).unwrap();
        assert_eq!(
            statements,
            vec![Statement::AddColumn {
                table: "T".into(),
                definition: "later date".into(),
            }]
        );
    }

    #[test]
    fn test_unresolvable_revision_is_fatal() {
        let fixture = SchemaFixture::new();
        let commit = base(&fixture);
        let differ = SnapshotDiffer::new(&fixture.repo, ".schema/tables");
        let result = differ.diff(&commit, "no-such-branch");
        assert!(result.is_err());
        assert!(!result.unwrap_err().is_skippable());
    }
}
