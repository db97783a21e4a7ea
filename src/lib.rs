//! gitschema - database schemas versioned as git trees
//!
//! A schema snapshot is a directory tree committed to git: one directory per
//! table, one directory per column, one small file per column attribute.
//! This crate renders a snapshot back into `CREATE TABLE` statements, diffs
//! two snapshots into `ALTER`/`CREATE`/`DROP` statements, and imports a live
//! MySQL catalog as a new snapshot.
//!
//! # Example
//!
//! ```no_run
//! use gitschema::config::SchemaConfig;
//! use gitschema::ddl::{write_statements, SnapshotDiffer};
//!
//! let config = SchemaConfig::new(".");
//! let repo = config.open().unwrap();
//! let statements = SnapshotDiffer::new(&repo, &config.schema_root)
//!     .diff("v1.0", "HEAD")
//!     .unwrap();
//! write_statements(&mut std::io::stdout(), &statements).unwrap();
//! ```

pub mod config;
pub mod ddl;
pub mod import;
pub mod schema;
pub mod storage;
