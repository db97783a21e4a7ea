//! The read capability the schema engine needs from a snapshot store.

use crate::storage::error::StorageResult;
use crate::storage::repository::SchemaRepository;
use crate::storage::types::{BlobId, HashDiff, TreeEntry, TreeId};

/// Read-only access to content-addressed schema snapshots.
///
/// Rendering and diffing only ever walk `table -> column -> attribute`
/// one level at a time, so nothing beyond what is traversed is loaded.
pub trait TreeStore {
    /// Resolve a tree-ish to exactly one tree.
    fn resolve_tree(&self, treeish: &str) -> StorageResult<TreeId>;

    /// Direct children of a tree, in the store's enumeration order.
    fn list_children(&self, tree: TreeId) -> StorageResult<Vec<TreeEntry>>;

    /// Raw blob content.
    fn read_blob(&self, blob: BlobId) -> StorageResult<Vec<u8>>;

    /// Changed direct children between two trees.
    fn diff_trees(&self, from: TreeId, to: TreeId) -> StorageResult<Vec<HashDiff>>;
}

impl TreeStore for SchemaRepository {
    fn resolve_tree(&self, treeish: &str) -> StorageResult<TreeId> {
        SchemaRepository::resolve_tree(self, treeish)
    }

    fn list_children(&self, tree: TreeId) -> StorageResult<Vec<TreeEntry>> {
        SchemaRepository::list_children(self, tree)
    }

    fn read_blob(&self, blob: BlobId) -> StorageResult<Vec<u8>> {
        SchemaRepository::read_blob(self, blob)
    }

    fn diff_trees(&self, from: TreeId, to: TreeId) -> StorageResult<Vec<HashDiff>> {
        SchemaRepository::diff_trees(self, from, to)
    }
}
