//! storage layer for gitschema
//!
//! this module provides a complete abstraction over git for schema snapshots.
//! The upper layers (rendering, diffing, import) use this API and never
//! touch git2 directly.
//!
//!  # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │            SchemaRepository  (implements TreeStore)         │
//! │   (resolve revisions, list trees, read blobs, diff, import) │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!        ┌─────────────┬───────┴───────┬─────────────┐
//!        ▼             ▼               ▼             ▼
//!  ┌──────────┐  ┌──────────┐    ┌──────────┐  ┌──────────┐
//!  │   tree   │  │   blob   │    │   refs   │  │   diff   │
//!  │ (tables) │  │ (attrs)  │    │(revision)│  │(one level│
//!  └──────────┘  └──────────┘    └──────────┘  └──────────┘
//!                              │
//!                              ▼
//!                        ┌─────────────┐
//!                        │   commit    │
//!                        │  (imports)  │
//!                        └─────────────┘
//!  ```
//!
//! # Usage
//!
//! ```ignore
//! use gitschema::storage::SchemaRepository;
//!
//! let repo = SchemaRepository::discover(".")?;
//! let from = repo.resolve_schema("v1", ".schema/tables")?;
//! let to = repo.resolve_schema("HEAD", ".schema/tables")?;
//! for change in repo.diff_trees(from, to)? {
//!     println!("{} {:?}", change.name, change.status());
//! }
//! ```

mod blob;
mod commit;
mod diff;
mod error;
mod refs;
mod repository;
mod store;
mod tree;
mod types;

// Re-export public API
pub use commit::{CommitInfo, CommitMessage};
pub use error::{StorageError, StorageResult};
pub use refs::RefManager;
pub use repository::SchemaRepository;
pub use store::TreeStore;
pub use tree::{SchemaTreeWriter, TreeHandle};
pub use types::{
    BlobId, ChangeStatus, CommitId, EntryMode, GitSignature, HashDiff, InvalidNameError,
    TableName, TreeEntry, TreeId,
};

pub(crate) use types::validate_entry_name;
