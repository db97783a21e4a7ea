//! Per-table metadata stored in the `.metadata` blob.
//!
//! The format is plain text, one `Key: value` per line:
//!
//! ```text
//! Primary Key: id
//! Engine: InnoDB
//! Column Order: id,name,email
//! Character Set: utf8mb4
//! ```
//!
//! Lines may appear in any order and unknown lines are ignored, so newer
//! writers can add keys without breaking older readers.

use std::fmt;

use super::types::ColumnName;

/// Name of the metadata blob inside a table tree.
pub const METADATA_FILE: &str = ".metadata";

const PRIMARY_KEY: &str = "Primary Key:";
const COLUMN_ORDER: &str = "Column Order:";
const CHARACTER_SET: &str = "Character Set:";
const ENGINE: &str = "Engine:";

/// Decoded table metadata.
///
/// A missing or unreadable blob is the default value; that is the normal
/// state of a freshly imported table, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableMetadata {
    pub primary_key: Option<ColumnName>,
    /// `None` when no order was ever recorded, which is different from an
    /// explicitly recorded order.
    pub order: Option<Vec<ColumnName>>,
    pub charset: Option<String>,
    pub engine: Option<String>,
}

/// One classified line of a metadata blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataLine {
    PrimaryKey(ColumnName),
    ColumnOrder(Vec<ColumnName>),
    CharacterSet(String),
    Engine(String),
    Unrecognized,
}

impl MetadataLine {
    /// Classify a line by its (case-sensitive) prefix.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if let Some(value) = line.strip_prefix(PRIMARY_KEY) {
            MetadataLine::PrimaryKey(ColumnName::new(value.trim()))
        } else if let Some(value) = line.strip_prefix(COLUMN_ORDER) {
            let columns = value.split(',').map(|c| ColumnName::new(c.trim())).collect();
            MetadataLine::ColumnOrder(columns)
        } else if let Some(value) = line.strip_prefix(CHARACTER_SET) {
            MetadataLine::CharacterSet(value.trim().to_string())
        } else if let Some(value) = line.strip_prefix(ENGINE) {
            MetadataLine::Engine(value.trim().to_string())
        } else {
            MetadataLine::Unrecognized
        }
    }
}

impl fmt::Display for MetadataLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataLine::PrimaryKey(name) => write!(f, "{} {}", PRIMARY_KEY, name),
            MetadataLine::ColumnOrder(columns) => {
                let joined: Vec<&str> = columns.iter().map(ColumnName::as_str).collect();
                write!(f, "{} {}", COLUMN_ORDER, joined.join(","))
            }
            MetadataLine::CharacterSet(charset) => write!(f, "{} {}", CHARACTER_SET, charset),
            MetadataLine::Engine(engine) => write!(f, "{} {}", ENGINE, engine),
            MetadataLine::Unrecognized => Ok(()),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    Some(value).filter(|v| !v.is_empty())
}

impl TableMetadata {
    /// Decode a metadata blob. Invalid UTF-8 is replaced, never rejected.
    pub fn decode(blob: &[u8]) -> Self {
        let text = String::from_utf8_lossy(blob);
        let mut metadata = TableMetadata::default();
        for line in text.lines() {
            metadata.apply(MetadataLine::parse(line));
        }
        metadata
    }

    fn apply(&mut self, line: MetadataLine) {
        match line {
            MetadataLine::PrimaryKey(name) => {
                self.primary_key = Some(name).filter(|n| !n.is_empty());
            }
            MetadataLine::ColumnOrder(columns) => {
                self.order.get_or_insert_with(Vec::new).extend(columns);
            }
            MetadataLine::CharacterSet(charset) => self.charset = non_empty(charset),
            MetadataLine::Engine(engine) => self.engine = non_empty(engine),
            MetadataLine::Unrecognized => {}
        }
    }

    /// The lines `encode` writes, in their fixed order.
    pub fn lines(&self) -> Vec<MetadataLine> {
        let mut lines = Vec::new();
        if let Some(pk) = self.primary_key.as_ref().filter(|pk| !pk.is_empty()) {
            lines.push(MetadataLine::PrimaryKey(pk.clone()));
        }
        if let Some(engine) = self.engine.as_ref().filter(|e| !e.is_empty()) {
            lines.push(MetadataLine::Engine(engine.clone()));
        }
        if let Some(order) = self.order.as_ref().filter(|o| !o.is_empty()) {
            lines.push(MetadataLine::ColumnOrder(order.clone()));
        }
        if let Some(charset) = self.charset.as_ref().filter(|c| !c.is_empty()) {
            lines.push(MetadataLine::CharacterSet(charset.clone()));
        }
        lines
    }

    /// Encode to blob text, or `None` when there is nothing worth writing.
    pub fn encode(&self) -> Option<String> {
        let lines = self.lines();
        if lines.is_empty() {
            return None;
        }
        Some(lines.iter().map(|line| format!("{}\n", line)).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}
