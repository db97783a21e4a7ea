//!  Revision and reference resolution.
//!
//!  Snapshots are addressed with ordinary git revision syntax. This module handles:
//! - turning a revision (`HEAD`, `v1.2`, `main~3`) into the schema tree it holds
//! - reading and advancing HEAD for imports
//!
//! A revision that already names a path (`HEAD:db/schema`) is used verbatim.

use git2::{ErrorCode, Repository};

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::{CommitId, TreeId};

/// Manages Git references and revision parsing.
pub struct RefManager;

impl RefManager {
    /// Build the tree-ish for the schema root at a revision.
    ///
    /// `HEAD` becomes `HEAD:.schema/tables`, `HEAD:other/path` stays as is.
    pub fn schema_treeish(revision: &str, schema_root: &str) -> String {
        if revision.contains(':') {
            revision.to_string()
        } else {
            format!("{}:{}", revision, schema_root.trim_matches('/'))
        }
    }

    /// Resolve a tree-ish to exactly one tree.
    ///
    /// Unknown revisions, ambiguous short hashes, missing paths and paths
    /// that name a file all fail with `ReferenceResolutionFailed`.
    pub fn resolve_tree(repo: &Repository, treeish: &str) -> StorageResult<TreeId> {
        let object = repo
            .revparse_single(treeish)
            .map_err(|e| StorageError::resolution(treeish, e.message()))?;

        let tree = object
            .peel_to_tree()
            .map_err(|e| StorageError::resolution(treeish, e.message()))?;

        Ok(TreeId::new(tree.id()))
    }

    /// Get the current HEAD commit.
    pub fn head_commit(repo: &Repository) -> StorageResult<CommitId> {
        let head = repo.head().map_err(|e| {
            if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound {
                StorageError::EmptyRepository
            } else {
                StorageError::Git(e)
            }
        })?;

        let commit = head.peel_to_commit()?;
        Ok(CommitId::new(commit.id()))
    }

    /// Get the HEAD commit, or `None` on an unborn branch.
    pub fn head_commit_opt(repo: &Repository) -> StorageResult<Option<CommitId>> {
        match Self::head_commit(repo) {
            Ok(id) => Ok(Some(id)),
            Err(StorageError::EmptyRepository) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
