//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `graph <file>` | Build, lay out and print the dependency graph of a statement list |
//! | `courses` | List saved statement lists |
//! | `check <file>` | Report skipped records, duplicates, unresolved references and cycles |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON; `graph` prints `{success, graph, theorem_list}`
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! thmgraph --verbose graph measure_theory
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod check;
mod courses;
mod graph_cmd;
mod output;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
