//! JSON storage for statement lists
//!
//! A statement list is a single JSON array written by the extraction
//! pipeline. It is read under a shared file lock since the pipeline may
//! rewrite it in place.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{StatementError, StatementRecord};

/// An input element that was left out, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// Position in the input array
    pub index: usize,
    /// Id, when the element had a string one
    pub id: Option<String>,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: StatementError,
}

fn serialize_reason<S: serde::Serializer>(
    reason: &StatementError,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

/// Statements read from a list, plus the elements that were skipped
#[derive(Debug, Clone, Default)]
pub struct LoadedStatements {
    pub records: Vec<StatementRecord>,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadedStatements {
    /// Validates decoded JSON
    ///
    /// The top level must be an array. Elements that are not valid
    /// statements are skipped and reported; the rest keep their order.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            anyhow::bail!("Statement list must be a JSON array");
        };

        let mut loaded = Self::default();
        for (index, item) in items.into_iter().enumerate() {
            let id = item.get("id").and_then(Value::as_str).map(str::to_string);
            match StatementRecord::from_value(item) {
                Ok(record) => loaded.records.push(record),
                Err(reason) => loaded.skipped.push(SkippedRecord { index, id, reason }),
            }
        }

        Ok(loaded)
    }

    /// Parses a statement list from a reader
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let value: Value =
            serde_json::from_reader(reader).context("Failed to parse statement list JSON")?;
        Self::from_value(value)
    }
}

/// A statement list file on disk
pub struct StatementFile {
    path: PathBuf,
}

impl StatementFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and validates the whole list
    pub fn read(&self) -> Result<LoadedStatements> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open statement list: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on statement list")?;

        // Lock is released when file is dropped
        LoadedStatements::from_reader(BufReader::new(&file))
            .with_context(|| format!("Invalid statement list: {}", self.path.display()))
    }
}
