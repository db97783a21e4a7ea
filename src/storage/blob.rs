//! Blob operations for attribute storage.
//!
//! Every leaf of the schema tree (a column attribute, a table's `.metadata`)
//! is a single blob. Blobs are content addressed, so two columns with the same
//! type share one object.

use git2::Repository;

use crate::storage::error::StorageResult;
use crate::storage::types::BlobId;

/// write raw bytes as a blob to the repository
///
/// returns the blob ID (SHA-1 hash of the content)
pub fn write_blob(repo: &Repository, content: &[u8]) -> StorageResult<BlobId> {
    let oid = repo.blob(content)?;
    Ok(BlobId::new(oid))
}

/// read a blob's content from the repository
pub fn read_blob(repo: &Repository, blob_id: BlobId) -> StorageResult<Vec<u8>> {
    let blob = repo.find_blob(blob_id.raw())?;
    Ok(blob.content().to_vec())
}
