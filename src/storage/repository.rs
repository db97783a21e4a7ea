//!   Core Git repository wrapper.
//!
//!  This is the central component of the storage layer. It wraps `git2::Repository`
//!   and provides the high-level operations the rest of the crate uses.
//!
//! All other storage modules use this for Git access.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use git2::Repository;
use parking_lot::RwLock;

use crate::storage::blob;
use crate::storage::commit::{self, CommitBuilder, CommitInfo};
use crate::storage::diff;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::refs::RefManager;
use crate::storage::tree::{graft_subtree, SchemaTreeWriter, TreeHandle};
use crate::storage::types::{BlobId, CommitId, GitSignature, HashDiff, TreeEntry, TreeId};

/// The repository handle passed to every schema operation.
///
/// Clone this freely - it uses Arc internally.
#[derive(Clone)]
pub struct SchemaRepository {
    inner: Arc<SchemaRepositoryInner>,
    signature: GitSignature,
}

struct SchemaRepositoryInner {
    repo: RwLock<Repository>,
    path: PathBuf,
}

impl SchemaRepository {
    fn from_git2(repo: Repository, path: &Path) -> Self {
        Self {
            inner: Arc::new(SchemaRepositoryInner {
                repo: RwLock::new(repo),
                path: path.to_path_buf(),
            }),
            signature: GitSignature::gitschema(),
        }
    }

    /// Open an existing repository.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let repo =
            Repository::open(path).map_err(|_| StorageError::NotInitialized(path.to_path_buf()))?;
        Ok(Self::from_git2(repo, path))
    }

    /// Open the repository containing `path`, searching parent directories
    /// the way `git` itself does.
    pub fn discover(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path)
            .map_err(|_| StorageError::NotInitialized(path.to_path_buf()))?;
        Ok(Self::from_git2(repo, path))
    }

    /// Initialize a new, empty repository.
    pub fn init(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let repo = Repository::init(path)?;
        Ok(Self::from_git2(repo, path))
    }

    /// Get the repository path.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Set the signature for import commits.
    pub fn with_signature(mut self, signature: GitSignature) -> Self {
        self.signature = signature;
        self
    }

    /// Execute a function with read access to the repository.
    pub fn with_repo<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Repository) -> StorageResult<T>,
    {
        let repo = self.inner.repo.read();
        f(&repo)
    }

    /// Execute a function with write access to the repository.
    pub fn with_repo_mut<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Repository) -> StorageResult<T>,
    {
        let repo = self.inner.repo.write();
        f(&repo)
    }

    // ==================== Read Operations ====================

    /// Get the current HEAD commit.
    pub fn head(&self) -> StorageResult<CommitId> {
        self.with_repo(RefManager::head_commit)
    }

    /// Resolve a tree-ish (`HEAD:.schema/tables`) to a tree.
    pub fn resolve_tree(&self, treeish: &str) -> StorageResult<TreeId> {
        self.with_repo(|repo| RefManager::resolve_tree(repo, treeish))
    }

    /// Resolve the schema root at a revision.
    pub fn resolve_schema(&self, revision: &str, schema_root: &str) -> StorageResult<TreeId> {
        self.resolve_tree(&RefManager::schema_treeish(revision, schema_root))
    }

    /// List the direct children of a tree.
    pub fn list_children(&self, tree: TreeId) -> StorageResult<Vec<TreeEntry>> {
        self.with_repo(|repo| Ok(TreeHandle::find(repo, tree)?.entries()))
    }

    /// Read the raw content of a blob.
    pub fn read_blob(&self, id: BlobId) -> StorageResult<Vec<u8>> {
        self.with_repo(|repo| blob::read_blob(repo, id))
    }

    /// One-level diff between two trees.
    pub fn diff_trees(&self, from: TreeId, to: TreeId) -> StorageResult<Vec<HashDiff>> {
        self.with_repo(|repo| diff::diff_trees(repo, from, to))
    }

    /// Get information about a commit.
    pub fn get_commit(&self, id: CommitId) -> StorageResult<CommitInfo> {
        self.with_repo(|repo| commit::get_commit(repo, id))
    }

    // ==================== Write Operations ====================

    /// Build a fresh tables tree and commit it at `schema_root` on HEAD.
    ///
    /// The rest of the HEAD tree is carried over unchanged. On an unborn
    /// branch a root commit is created. The working directory is not touched.
    pub fn commit_schema<F>(
        &self,
        schema_root: &str,
        message: &str,
        build: F,
    ) -> StorageResult<CommitId>
    where
        F: FnOnce(&mut SchemaTreeWriter<'_>) -> StorageResult<()>,
    {
        self.with_repo_mut(|repo| {
            let mut writer = SchemaTreeWriter::new(repo);
            build(&mut writer)?;
            let tables = writer.write()?;

            let head = RefManager::head_commit_opt(repo)?;
            let base = head
                .map(|id| commit::get_tree_at_commit(repo, id))
                .transpose()?;
            let root = graft_subtree(repo, base.as_ref(), schema_root, tables)?;

            let mut builder = CommitBuilder::new(repo)
                .tree(root)
                .message(message)
                .signature(self.signature.clone())
                .update_ref("HEAD");
            if let Some(parent) = head {
                builder = builder.parent(parent);
            }
            builder.commit()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::EntryMode;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SchemaRepository) {
        let dir = TempDir::new().unwrap();
        let repo = SchemaRepository::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_init_and_open() {
        let dir = TempDir::new().unwrap();

        let repo = SchemaRepository::init(dir.path()).unwrap();
        assert!(matches!(repo.head(), Err(StorageError::EmptyRepository)));
        drop(repo);

        let repo = SchemaRepository::open(dir.path()).unwrap();
        assert_eq!(repo.path(), dir.path());
    }

    #[test]
    fn test_open_missing_repository() {
        let dir = TempDir::new().unwrap();
        let result = SchemaRepository::open(dir.path().join("missing"));
        assert!(matches!(result, Err(StorageError::NotInitialized(_))));
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let (dir, _repo) = setup();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        assert!(SchemaRepository::discover(&nested).is_ok());
    }

    #[test]
    fn test_commit_schema_on_unborn_branch() {
        let (_dir, repo) = setup();

        let commit = repo
            .commit_schema(".schema/tables", "first import", |w| {
                w.put_column("users", "id", &[("type", b"int")])
            })
            .unwrap();

        assert_eq!(repo.head().unwrap(), commit);
        let info = repo.get_commit(commit).unwrap();
        assert!(info.parent_ids.is_empty());
        assert_eq!(info.summary(), "first import");

        let tables = repo.resolve_schema("HEAD", ".schema/tables").unwrap();
        let entries = repo.list_children(tables).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "users");
        assert_eq!(entries[0].mode, EntryMode::Tree);
    }

    #[test]
    fn test_commit_schema_uses_configured_signature() {
        let dir = TempDir::new().unwrap();
        let repo = SchemaRepository::init(dir.path())
            .unwrap()
            .with_signature(GitSignature::new("Dana Ops", "dana@example.com"));

        let commit = repo
            .commit_schema(".schema/tables", "signed", |w| {
                w.put_column("users", "id", &[("type", b"int")])
            })
            .unwrap();

        let info = repo.get_commit(commit).unwrap();
        assert_eq!(info.author_name, "Dana Ops");
        assert_eq!(info.author_email, "dana@example.com");
    }

    #[test]
    fn test_commit_schema_chains_on_head() {
        let (_dir, repo) = setup();

        let first = repo
            .commit_schema(".schema/tables", "one", |w| {
                w.put_column("users", "id", &[("type", b"int")])
            })
            .unwrap();
        let second = repo
            .commit_schema(".schema/tables", "two", |w| {
                w.put_column("users", "id", &[("type", b"bigint")])
            })
            .unwrap();

        let info = repo.get_commit(second).unwrap();
        assert_eq!(info.parent_ids, vec![first]);

        let old = repo.resolve_schema(&first.to_string(), ".schema/tables").unwrap();
        let new = repo.resolve_schema("HEAD", ".schema/tables").unwrap();
        let diffs = repo.diff_trees(old, new).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].name, "users");
    }

    #[test]
    fn test_read_blob_through_handle() {
        let (_dir, repo) = setup();
        repo.commit_schema(".schema/tables", "import", |w| {
            w.put_column("users", "id", &[("type", b"int(11)")])
        })
        .unwrap();

        let column = repo.resolve_tree("HEAD:.schema/tables/users/id").unwrap();
        let entries = repo.list_children(column).unwrap();
        let type_blob = entries[0].blob_id().unwrap();
        assert_eq!(repo.read_blob(type_blob).unwrap(), b"int(11)");
    }

    #[test]
    fn test_resolution_failure_is_typed() {
        let (_dir, repo) = setup();
        let result = repo.resolve_schema("HEAD", ".schema/tables");
        assert!(matches!(result, Err(StorageError::ReferenceResolutionFailed { .. })));
    }
}
