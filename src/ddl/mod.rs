//! DDL generation from stored snapshots.
//!
//! - [`dump_revision`] renders a whole snapshot as `CREATE TABLE` statements.
//! - [`SnapshotDiffer`] computes the `CREATE`/`DROP`/`ALTER` statements
//!   between two snapshots.
//!
//! Both produce [`Statement`] values; [`write_statements`] prints them.

mod differ;
mod dump;
mod emit;

pub use differ::SnapshotDiffer;
pub use dump::{dump_revision, dump_tables};
pub use emit::{write_statements, Statement};
