//! Repository and import configuration.

use std::path::PathBuf;

use crate::import::{ImportError, ImportResult};
use crate::storage::{SchemaRepository, StorageResult};

/// Where snapshots live inside a commit's tree.
pub const DEFAULT_SCHEMA_ROOT: &str = ".schema/tables";

/// Default MySQL port.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Repository location options.
#[derive(Debug, Clone)]
pub struct SchemaConfig {
    /// Path to the repository, or a directory inside it.
    pub repo_path: PathBuf,
    /// Tree path of the tables root.
    pub schema_root: String,
    /// Search parent directories for the repository.
    pub discover: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            repo_path: PathBuf::from("."),
            schema_root: DEFAULT_SCHEMA_ROOT.to_string(),
            discover: true,
        }
    }
}

impl SchemaConfig {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            ..Default::default()
        }
    }

    pub fn schema_root(mut self, root: impl Into<String>) -> Self {
        let root = root.into();
        self.schema_root = root.trim_matches('/').to_string();
        self
    }

    pub fn discover(mut self, value: bool) -> Self {
        self.discover = value;
        self
    }

    /// Open the configured repository.
    pub fn open(&self) -> StorageResult<SchemaRepository> {
        if self.discover {
            SchemaRepository::discover(&self.repo_path)
        } else {
            SchemaRepository::open(&self.repo_path)
        }
    }
}

/// Connection options for a catalog import.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub dbname: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_MYSQL_PORT,
            user: String::new(),
            password: None,
            dbname: String::new(),
        }
    }
}

impl ImportConfig {
    pub fn new(host: impl Into<String>, user: impl Into<String>, dbname: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            dbname: dbname.into(),
            ..Default::default()
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    /// Host, user and database name are required.
    pub fn validate(&self) -> ImportResult<()> {
        if self.host.is_empty() {
            return Err(ImportError::MissingOption("host"));
        }
        if self.user.is_empty() {
            return Err(ImportError::MissingOption("user"));
        }
        if self.dbname.is_empty() {
            return Err(ImportError::MissingOption("dbname"));
        }
        Ok(())
    }
}
