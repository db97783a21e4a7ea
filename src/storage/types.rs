//! core type-safe wrappers around git primitives for the storage layer.

use std::fmt;
use std::fmt::Formatter;

use git2::{ObjectType, Oid};

/// This makes sure we don't accidentally pass a blob ID where a commit ID
/// is expected. The inner Oid is only accessible within the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitId(pub(crate) Oid);

impl CommitId {
    pub(crate) fn new(oid: Oid) -> Self {
        Self(oid)
    }

    /// raw Oid (for internal use only)
    pub(crate) fn raw(&self) -> Oid {
        self.0
    }

    /// short form of the commit ID
    pub fn short(&self) -> String {
        self.0.to_string()[..7].to_string()
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Git blob identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlobId(pub(crate) Oid);

impl BlobId {
    pub(crate) fn new(oid: Oid) -> Self {
        Self(oid)
    }

    pub(crate) fn raw(&self) -> Oid {
        self.0
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Git tree identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(pub(crate) Oid);

impl TreeId {
    pub(crate) fn new(oid: Oid) -> Self {
        Self(oid)
    }

    pub(crate) fn raw(&self) -> Oid {
        self.0
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of object a tree entry points at.
///
/// `Absent` only shows up on one side of a [`HashDiff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryMode {
    Absent,
    Blob,
    Tree,
}

impl EntryMode {
    /// map a git object kind to an entry mode
    ///
    /// anything that isn't a tree (symlinks, executables, gitlinks) is a leaf
    pub(crate) fn from_kind(kind: Option<ObjectType>) -> Self {
        match kind {
            Some(ObjectType::Tree) => EntryMode::Tree,
            _ => EntryMode::Blob,
        }
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryMode::Absent => "absent",
            EntryMode::Blob => "blob",
            EntryMode::Tree => "tree",
        };
        f.write_str(name)
    }
}

/// A single named entry of a tree in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeEntry {
    pub name: String,
    pub(crate) oid: Oid,
    pub mode: EntryMode,
}

impl TreeEntry {
    pub(crate) fn new(name: impl Into<String>, oid: Oid, mode: EntryMode) -> Self {
        Self {
            name: name.into(),
            oid,
            mode,
        }
    }

    /// an entry that doesn't exist on this side of a diff
    pub fn absent(name: impl Into<String>) -> Self {
        Self::new(name, Oid::zero(), EntryMode::Absent)
    }

    /// only directories count as tables or columns
    pub fn is_tree(&self) -> bool {
        self.mode == EntryMode::Tree
    }

    /// the subtree id, if this entry is a directory
    pub fn tree_id(&self) -> Option<TreeId> {
        match self.mode {
            EntryMode::Tree => Some(TreeId::new(self.oid)),
            _ => None,
        }
    }

    /// the blob id, if this entry is a file
    pub fn blob_id(&self) -> Option<BlobId> {
        match self.mode {
            EntryMode::Blob => Some(BlobId::new(self.oid)),
            _ => None,
        }
    }
}

/// One structural change between two trees, at a single level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashDiff {
    pub name: String,
    pub src: TreeEntry,
    pub dst: TreeEntry,
}

impl HashDiff {
    /// classify the change by which side holds a directory
    ///
    /// `None` when neither side does, e.g. an edited `.metadata` blob.
    pub fn status(&self) -> Option<ChangeStatus> {
        match (self.src.is_tree(), self.dst.is_tree()) {
            (false, true) => Some(ChangeStatus::Added),
            (true, false) => Some(ChangeStatus::Deleted),
            (true, true) => Some(ChangeStatus::Modified),
            (false, false) => None,
        }
    }
}

/// the type of change in a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Deleted,
    Modified,
}

/// A validated table name, used as a directory name when writing.
///
/// Valid names:
/// - 1-64 characters
/// - no `/` or NUL
/// - must not start with `.` (dot entries are reserved for table metadata)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableName(String);

impl TableName {
    /// create a new TableName, validating the input
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidNameError> {
        let name = name.into();
        validate_entry_name(&name, 64)?;
        Ok(Self(name))
    }

    /// get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// check that a name can be used as a single tree entry
pub(crate) fn validate_entry_name(name: &str, max_len: usize) -> Result<(), InvalidNameError> {
    if name.is_empty() {
        return Err(InvalidNameError::Empty);
    }

    let len = name.chars().count();
    if len > max_len {
        return Err(InvalidNameError::TooLong(len));
    }

    if name.starts_with('.') {
        return Err(InvalidNameError::InvalidStart('.'));
    }

    for (i, c) in name.chars().enumerate() {
        if c == '/' || c == '\0' {
            return Err(InvalidNameError::InvalidCharacter { char: c, position: i });
        }
    }

    Ok(())
}

/// git signature (author/committer info)
#[derive(Debug, Clone)]
pub struct GitSignature {
    pub name: String,
    pub email: String,
}

impl GitSignature {
    /// create a new signature
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// default signature for schema imports
    pub fn gitschema() -> Self {
        Self::new("gitschema", "gitschema@localhost")
    }

    /// convert to git2::Signature
    pub(crate) fn to_git2_signature(&self) -> Result<git2::Signature<'static>, git2::Error> {
        git2::Signature::now(&self.name, &self.email)
    }
}

impl Default for GitSignature {
    fn default() -> Self {
        Self::gitschema()
    }
}

/// error type for invalid table and column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidNameError {
    Empty,
    TooLong(usize),
    InvalidStart(char),
    InvalidCharacter { char: char, position: usize },
}

impl fmt::Display for InvalidNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "name cannot be empty"),
            Self::TooLong(len) => write!(f, "name too long: {} characters", len),
            Self::InvalidStart(c) => write!(f, "name cannot start with '{}'", c),
            Self::InvalidCharacter { char, position } => {
                write!(f, "invalid character {:?} at position {}", char, position)
            }
        }
    }
}

impl std::error::Error for InvalidNameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_valid() {
        assert!(TableName::new("users").is_ok());
        assert!(TableName::new("user_accounts").is_ok());
        assert!(TableName::new("123users").is_ok());
        assert!(TableName::new("Order Items").is_ok());
    }

    #[test]
    fn test_table_name_invalid() {
        assert_eq!(TableName::new(""), Err(InvalidNameError::Empty));
        assert!(TableName::new(".metadata").is_err());
        assert!(TableName::new("users/admin").is_err());
        assert!(TableName::new("a".repeat(65)).is_err());
    }

    #[test]
    fn test_name_length_counts_characters() {
        let cyrillic = "й".repeat(64);
        assert_eq!(cyrillic.len(), 128);
        assert!(TableName::new(cyrillic.as_str()).is_ok());
        assert_eq!(
            TableName::new("й".repeat(65)),
            Err(InvalidNameError::TooLong(65))
        );
    }

    #[test]
    fn test_hash_diff_status() {
        let present = TreeEntry::new("users", Oid::zero(), EntryMode::Tree);

        let added = HashDiff {
            name: "users".into(),
            src: TreeEntry::absent("users"),
            dst: present.clone(),
        };
        assert_eq!(added.status(), Some(ChangeStatus::Added));

        let deleted = HashDiff {
            name: "users".into(),
            src: present.clone(),
            dst: TreeEntry::absent("users"),
        };
        assert_eq!(deleted.status(), Some(ChangeStatus::Deleted));

        let modified = HashDiff {
            name: "users".into(),
            src: present.clone(),
            dst: present,
        };
        assert_eq!(modified.status(), Some(ChangeStatus::Modified));

        let blob = TreeEntry::new("users", Oid::zero(), EntryMode::Blob);
        let file_edit = HashDiff {
            name: "users".into(),
            src: blob.clone(),
            dst: blob.clone(),
        };
        assert_eq!(file_edit.status(), None);

        let file_to_dir = HashDiff {
            name: "users".into(),
            src: blob,
            dst: TreeEntry::new("users", Oid::zero(), EntryMode::Tree),
        };
        assert_eq!(file_to_dir.status(), Some(ChangeStatus::Added));
    }

    #[test]
    fn test_entry_ids_follow_mode() {
        let tree = TreeEntry::new("t", Oid::zero(), EntryMode::Tree);
        assert!(tree.tree_id().is_some());
        assert!(tree.blob_id().is_none());

        let blob = TreeEntry::new("b", Oid::zero(), EntryMode::Blob);
        assert!(blob.tree_id().is_none());
        assert!(blob.blob_id().is_some());

        let absent = TreeEntry::absent("x");
        assert!(!absent.is_tree());
        assert!(absent.tree_id().is_none());
        assert!(absent.blob_id().is_none());
    }
}
