//! Writes a catalog snapshot into the repository as one commit.

use tracing::{debug, info};

use super::catalog::CatalogSnapshot;
use super::error::ImportResult;
use crate::schema::METADATA_FILE;
use crate::storage::{CommitId, CommitMessage, SchemaRepository, StorageResult};

pub struct SchemaImporter<'r> {
    repo: &'r SchemaRepository,
    schema_root: String,
}

impl<'r> SchemaImporter<'r> {
    pub fn new(repo: &'r SchemaRepository, schema_root: impl Into<String>) -> Self {
        Self {
            repo,
            schema_root: schema_root.into(),
        }
    }

    /// Commit `snapshot` on HEAD, replacing the whole tables root.
    ///
    /// Everything outside the tables root is carried over from HEAD. The
    /// working directory is left alone.
    pub fn import(&self, snapshot: &CatalogSnapshot, message: Option<&str>) -> ImportResult<CommitId> {
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| CommitMessage::import(&snapshot.database, snapshot.table_count()));

        let commit = self
            .repo
            .commit_schema(&self.schema_root, &message, |writer| -> StorageResult<()> {
                for (table, column) in &snapshot.columns {
                    let blobs = column.attributes().to_blobs();
                    let attributes: Vec<(&str, &[u8])> = blobs
                        .iter()
                        .map(|(attribute, content)| (attribute.file_name(), content.as_slice()))
                        .collect();
                    writer.put_column(table.as_str(), column.name.as_str(), &attributes)?;
                }
                for table in &snapshot.tables {
                    if let Some(metadata) = table.metadata().encode() {
                        writer.put_file(table.name.as_str(), METADATA_FILE, metadata.as_bytes())?;
                    }
                }
                debug!(tables = writer.table_count(), "assembled tables tree");
                Ok(())
            })?;

        info!(
            commit = %commit.short(),
            database = %snapshot.database,
            tables = snapshot.table_count(),
            columns = snapshot.columns.len(),
            "imported schema"
        );
        Ok(commit)
    }
}
