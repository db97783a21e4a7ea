//! DDL statements and their textual form.

use std::fmt;
use std::io::{self, Write};

/// One schema change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A full table definition as produced by the table renderer, framing
    /// newlines included.
    CreateTable { table: String, sql: String },
    DropTable { table: String },
    AddColumn { table: String, definition: String },
    DropColumn { table: String, column: String },
    ModifyColumn { table: String, definition: String },
}

impl Statement {
    /// The table the statement touches.
    pub fn table(&self) -> &str {
        match self {
            Statement::CreateTable { table, .. }
            | Statement::DropTable { table }
            | Statement::AddColumn { table, .. }
            | Statement::DropColumn { table, .. }
            | Statement::ModifyColumn { table, .. } => table,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::CreateTable { sql, .. } => f.write_str(sql.trim()),
            Statement::DropTable { table } => write!(f, "DROP TABLE {};", table),
            Statement::AddColumn { table, definition } => {
                write!(f, "ALTER TABLE {} ADD COLUMN {};", table, definition)
            }
            Statement::DropColumn { table, column } => {
                write!(f, "ALTER TABLE {} DROP COLUMN {};", table, column)
            }
            Statement::ModifyColumn { table, definition } => {
                write!(f, "ALTER TABLE {} MODIFY COLUMN {};", table, definition)
            }
        }
    }
}

/// Write statements in order, one per line.
///
/// `CreateTable` text is written as rendered, since it already carries its
/// own leading blank line and trailing newline.
pub fn write_statements<W: Write + ?Sized>(out: &mut W, statements: &[Statement]) -> io::Result<()> {
    for statement in statements {
        match statement {
            Statement::CreateTable { sql, .. } => out.write_all(sql.as_bytes())?,
            other => writeln!(out, "{}", other)?,
        }
    }
    out.flush()
}
