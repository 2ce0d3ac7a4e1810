//! Statement domain model
//!
//! A statement is one theorem-like entry extracted from lecture notes:
//! a theorem, lemma, definition and so on, together with the prior
//! results its proof refers to.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatementError {
    #[error("Record is not a JSON object")]
    NotAnObject,

    #[error("Invalid statement: {0}")]
    Invalid(String),
}

impl From<serde_json::Error> for StatementError {
    fn from(err: serde_json::Error) -> Self {
        StatementError::Invalid(err.to_string())
    }
}

/// Kind of statement, written in lowercase on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementType {
    Theorem,
    Proposition,
    Lemma,
    Example,
    Definition,
    Corollary,
}

impl StatementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::Theorem => "theorem",
            StatementType::Proposition => "proposition",
            StatementType::Lemma => "lemma",
            StatementType::Example => "example",
            StatementType::Definition => "definition",
            StatementType::Corollary => "corollary",
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single extracted statement
///
/// `id`, `type`, `name`, `topic` and `statement` are required. `proof` and
/// `previous_results` may be missing or null and then read as empty.
/// Fields the extraction pipeline adds beyond the known ones (for example
/// `preconditions`) are kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRecord {
    /// Identifier as it appears in the notes, e.g. "Lemma 2.3"
    pub id: String,

    #[serde(rename = "type")]
    pub kind: StatementType,

    /// Human label; may also be used to refer to the statement
    pub name: String,

    pub topic: String,

    pub statement: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub proof: String,

    /// References to earlier statements by id or name
    #[serde(default, deserialize_with = "null_as_default")]
    pub previous_results: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatementRecord {
    /// Creates a statement with empty text fields and no references
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: StatementType) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            topic: String::new(),
            statement: String::new(),
            proof: String::new(),
            previous_results: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Decodes one element of a statement list
    pub fn from_value(value: Value) -> Result<Self, StatementError> {
        if !value.is_object() {
            return Err(StatementError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Adds a reference to an earlier result
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.previous_results.push(reference.into());
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn with_proof(mut self, proof: impl Into<String>) -> Self {
        self.proof = proof.into();
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Collapses records sharing an `id` into one
///
/// The surviving record sits where the id first appeared and is the one
/// with the longest proof; ties keep the earlier record.
pub fn dedupe_by_id(records: Vec<StatementRecord>) -> Vec<StatementRecord> {
    let mut kept: Vec<StatementRecord> = Vec::with_capacity(records.len());

    for record in records {
        match kept.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                if record.proof.len() > existing.proof.len() {
                    *existing = record;
                }
            }
            None => kept.push(record),
        }
    }

    kept
}
