//! Theorem graph - dependency diagrams for lecture-note statements
//!
//! Takes the theorem, lemma and definition records extracted from a set of
//! lecture notes, resolves the prior results each one cites into a
//! dependency graph, and lays that graph out for a rendering client.

pub mod cli;
pub mod domain;
pub mod layout;
pub mod storage;

pub use domain::{DependencyGraph, StatementRecord, StatementType};
pub use layout::{lay_out, LayoutKind, NodeLinkGraph};
