//! Domain models for theorem graphs
//!
//! Contains the statement model and dependency graph without any I/O
//! concerns.

mod graph;
mod statement;

pub use graph::{DependencyGraph, GraphError, UnresolvedReference};
pub use statement::{dedupe_by_id, StatementError, StatementRecord, StatementType};
