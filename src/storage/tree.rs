//! tree operations for schema snapshots.
//!
//! in Git, a tree is a directory. In a schema snapshot:
//! - the schema root (`.schema/tables` by default) holds one tree per table
//! - each table tree holds one tree per column plus an optional `.metadata` blob
//! - each column tree holds one blob per attribute (`type`, `not_null`, ...)
//!
//! this module provides safe abstractions over Git's tree reading and
//! building. Nothing here knows what an attribute means.

use std::collections::BTreeMap;

use git2::{FileMode, ObjectType, Repository, Tree, TreeBuilder as Git2TreeBuilder};

use crate::storage::blob;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::{EntryMode, TreeEntry, TreeId};

/// A read only handle to a git tree
///
/// think of it as a snapshot - it won't change even if new commits are made.
#[derive(Debug)]
pub struct TreeHandle<'repo> {
    tree: Tree<'repo>,
}

impl<'repo> TreeHandle<'repo> {
    /// create a TreeHandle from a git2::Tree
    pub(crate) fn new(tree: Tree<'repo>) -> Self {
        Self { tree }
    }

    /// look a tree up by id
    pub fn find(repo: &'repo Repository, id: TreeId) -> StorageResult<Self> {
        let tree = repo.find_tree(id.raw())?;
        Ok(Self::new(tree))
    }

    /// get the tree ID
    pub fn id(&self) -> TreeId {
        TreeId::new(self.tree.id())
    }

    /// get the underlying git2::Tree (for internal use)
    pub(crate) fn inner(&self) -> &Tree<'repo> {
        &self.tree
    }

    /// list the direct children in git's enumeration order
    ///
    /// entries whose names aren't valid UTF-8 are skipped.
    pub fn entries(&self) -> Vec<TreeEntry> {
        self.tree
            .iter()
            .filter_map(|entry| {
                let name = entry.name()?;
                Some(TreeEntry::new(
                    name,
                    entry.id(),
                    EntryMode::from_kind(entry.kind()),
                ))
            })
            .collect()
    }

    /// look up a single direct child by name
    pub fn get(&self, name: &str) -> Option<TreeEntry> {
        self.tree
            .get_name(name)
            .map(|entry| TreeEntry::new(name, entry.id(), EntryMode::from_kind(entry.kind())))
    }
}

/// builds a fresh tables tree, one table and one column at a time
///
/// nothing is modified in place: every column becomes a new tree object and
/// `write` produces the tables root.
///
/// # Usage Pattern
///
/// ```ignore
/// let mut writer = SchemaTreeWriter::new(repo);
/// writer.put_column("users", "id", &[("type", b"int(11)"), ("not_null", b"")])?;
/// writer.put_file("users", ".metadata", b"Primary Key: id\n")?;
/// let tables_tree = writer.write()?;
/// ```
pub struct SchemaTreeWriter<'repo> {
    repo: &'repo Repository,
    /// one builder per table, keyed by table name
    tables: BTreeMap<String, Git2TreeBuilder<'repo>>,
}

impl<'repo> SchemaTreeWriter<'repo> {
    pub fn new(repo: &'repo Repository) -> Self {
        Self {
            repo,
            tables: BTreeMap::new(),
        }
    }

    /// get or create a builder for a table's subtree
    fn table_builder(&mut self, table: &str) -> StorageResult<&mut Git2TreeBuilder<'repo>> {
        if !self.tables.contains_key(table) {
            let builder = self.repo.treebuilder(None)?;
            self.tables.insert(table.to_string(), builder);
        }
        self.tables
            .get_mut(table)
            .ok_or_else(|| StorageError::Internal(format!("missing builder for table {}", table)))
    }

    /// write a column as a tree of attribute blobs
    ///
    /// writing the same column twice replaces the earlier definition
    pub fn put_column(
        &mut self,
        table: &str,
        column: &str,
        attributes: &[(&str, &[u8])],
    ) -> StorageResult<()> {
        let mut column_builder = self.repo.treebuilder(None)?;
        for (name, content) in attributes {
            let blob_id = blob::write_blob(self.repo, content)?;
            column_builder.insert(*name, blob_id.raw(), FileMode::Blob.into())?;
        }
        let column_tree = column_builder.write()?;

        self.table_builder(table)?
            .insert(column, column_tree, FileMode::Tree.into())?;
        Ok(())
    }

    /// write a plain file directly under a table (e.g. `.metadata`)
    pub fn put_file(&mut self, table: &str, name: &str, content: &[u8]) -> StorageResult<()> {
        let blob_id = blob::write_blob(self.repo, content)?;
        self.table_builder(table)?
            .insert(name, blob_id.raw(), FileMode::Blob.into())?;
        Ok(())
    }

    /// number of tables touched so far
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// write all table trees and return the id of the tables root
    pub fn write(self) -> StorageResult<TreeId> {
        let mut root_builder = self.repo.treebuilder(None)?;
        for (table_name, table_builder) in self.tables {
            let table_tree_id = table_builder.write()?;
            root_builder.insert(&table_name, table_tree_id, FileMode::Tree.into())?;
        }

        let root_id = root_builder.write()?;
        Ok(TreeId::new(root_id))
    }
}

/// place `subtree` at `path` inside `base`, returning the new root tree
///
/// every other entry of `base` is kept as is. Missing intermediate
/// directories are created, and a file in the way is replaced.
pub fn graft_subtree(
    repo: &Repository,
    base: Option<&TreeHandle<'_>>,
    path: &str,
    subtree: TreeId,
) -> StorageResult<TreeId> {
    let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
    let root = graft(repo, base.map(|b| b.inner()), &components, subtree)?;
    Ok(TreeId::new(root))
}

fn graft(
    repo: &Repository,
    base: Option<&Tree<'_>>,
    components: &[&str],
    subtree: TreeId,
) -> StorageResult<git2::Oid> {
    let (first, rest) = components
        .split_first()
        .ok_or_else(|| StorageError::Internal("schema root path is empty".to_string()))?;

    let mut builder = repo.treebuilder(base)?;
    let child = if rest.is_empty() {
        subtree.raw()
    } else {
        let existing = match base.and_then(|tree| tree.get_name(first)) {
            Some(entry) if entry.kind() == Some(ObjectType::Tree) => {
                Some(repo.find_tree(entry.id())?)
            }
            _ => None,
        };
        graft(repo, existing.as_ref(), rest, subtree)?
    };

    builder.insert(*first, child, FileMode::Tree.into())?;
    Ok(builder.write()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_repo() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_writer_builds_nested_tables() {
        let (_dir, repo) = setup_repo();

        let mut writer = SchemaTreeWriter::new(&repo);
        writer
            .put_column("users", "id", &[("type", b"int(11)"), ("not_null", b"")])
            .unwrap();
        writer
            .put_column("users", "name", &[("type", b"varchar(64)")])
            .unwrap();
        writer
            .put_file("users", ".metadata", b"Primary Key: id\n")
            .unwrap();
        writer.put_column("posts", "id", &[("type", b"int")]).unwrap();
        assert_eq!(writer.table_count(), 2);

        let tables_id = writer.write().unwrap();
        let tables = TreeHandle::find(&repo, tables_id).unwrap();

        let names: Vec<_> = tables.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["posts", "users"]);

        let users_id = tables.get("users").unwrap().tree_id().unwrap();
        let users = TreeHandle::find(&repo, users_id).unwrap();
        assert_eq!(users.entries().len(), 3);
        assert_eq!(users.get(".metadata").unwrap().mode, EntryMode::Blob);
        assert_eq!(users.get("id").unwrap().mode, EntryMode::Tree);

        let id_col = TreeHandle::find(&repo, users.get("id").unwrap().tree_id().unwrap()).unwrap();
        let type_blob = id_col.get("type").unwrap().blob_id().unwrap();
        assert_eq!(blob::read_blob(&repo, type_blob).unwrap(), b"int(11)");
        assert!(id_col.get("not_null").is_some());
        assert!(id_col.get("default").is_none());
    }

    #[test]
    fn test_get_missing_entry() {
        let (_dir, repo) = setup_repo();
        let tables_id = SchemaTreeWriter::new(&repo).write().unwrap();
        let tables = TreeHandle::find(&repo, tables_id).unwrap();
        assert!(tables.entries().is_empty());
        assert!(tables.get("users").is_none());
    }

    #[test]
    fn test_graft_into_empty_base() {
        let (_dir, repo) = setup_repo();

        let mut writer = SchemaTreeWriter::new(&repo);
        writer.put_column("users", "id", &[("type", b"int")]).unwrap();
        let tables_id = writer.write().unwrap();

        let root_id = graft_subtree(&repo, None, ".schema/tables", tables_id).unwrap();
        let root = TreeHandle::find(&repo, root_id).unwrap();
        let schema = TreeHandle::find(&repo, root.get(".schema").unwrap().tree_id().unwrap()).unwrap();
        assert_eq!(schema.get("tables").unwrap().tree_id(), Some(tables_id));
    }

    #[test]
    fn test_graft_keeps_unrelated_entries() {
        let (_dir, repo) = setup_repo();

        // a base tree with a README next to an old schema
        let readme = blob::write_blob(&repo, b"hello").unwrap();
        let mut old = SchemaTreeWriter::new(&repo);
        old.put_column("legacy", "id", &[("type", b"int")]).unwrap();
        let old_tables = old.write().unwrap();
        let base_id = graft_subtree(&repo, None, ".schema/tables", old_tables).unwrap();
        let mut builder = repo
            .treebuilder(Some(&repo.find_tree(base_id.raw()).unwrap()))
            .unwrap();
        builder.insert("README", readme.raw(), FileMode::Blob.into()).unwrap();
        let base_id = TreeId::new(builder.write().unwrap());
        let base = TreeHandle::find(&repo, base_id).unwrap();

        let mut writer = SchemaTreeWriter::new(&repo);
        writer.put_column("users", "id", &[("type", b"int")]).unwrap();
        let new_tables = writer.write().unwrap();

        let root_id = graft_subtree(&repo, Some(&base), ".schema/tables", new_tables).unwrap();
        let root = TreeHandle::find(&repo, root_id).unwrap();
        assert!(root.get("README").is_some());

        let schema = TreeHandle::find(&repo, root.get(".schema").unwrap().tree_id().unwrap()).unwrap();
        let tables = TreeHandle::find(&repo, schema.get("tables").unwrap().tree_id().unwrap()).unwrap();
        assert!(tables.get("users").is_some());
        assert!(tables.get("legacy").is_none());
    }

    #[test]
    fn test_graft_rejects_empty_path() {
        let (_dir, repo) = setup_repo();
        let tables_id = SchemaTreeWriter::new(&repo).write().unwrap();
        let result = graft_subtree(&repo, None, "/", tables_id);
        assert!(matches!(result, Err(StorageError::Internal(_))));
    }
}
