//! # Storage Layer
//!
//! Reading statement lists and configuration from disk.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Statement lists | JSON array of statements | `saved_course_jsons/{course}.json` |
//! | Project config | TOML | `thmgraph.toml` (current directory or a parent) |
//! | Global config | TOML | `~/.config/thmgraph/config.toml` |
//!
//! Statement lists are owned by the extraction pipeline; this crate only
//! reads them, under a shared lock (`fs2`).
//!
//! ## Key Types
//!
//! - [`StatementFile`] - Read and validate one statement list
//! - [`CourseLibrary`] - List and resolve saved statement lists
//! - [`Config`] - Effective configuration

mod config;
mod library;
mod statements;

pub use config::{Config, ConfigError, ConfigFile, DEFAULT_SAVED_DIR, PROJECT_CONFIG_FILE};
pub use library::CourseLibrary;
pub use statements::{LoadedStatements, SkippedRecord, StatementFile};
