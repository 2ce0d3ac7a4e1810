//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{check, courses, graph_cmd};
use crate::layout::LayoutKind;
use crate::storage::{Config, CourseLibrary};

#[derive(Parser)]
#[command(name = "thmgraph")]
#[command(author, version, about = "Dependency graphs and layouts for theorem lists")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Directory holding saved statement lists
    #[arg(long, global = true, env = "THMGRAPH_SAVED_DIR")]
    pub saved_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build and lay out the dependency graph of a statement list
    Graph {
        /// Statement list path, or the name of a saved list
        file: String,

        /// Layout strategy (defaults to the configured one)
        #[arg(long, short)]
        layout: Option<LayoutKind>,

        /// Seed for the breadth-first jitter
        #[arg(long)]
        seed: Option<u64>,

        /// Keep one statement per id, preferring the longest proof
        #[arg(long)]
        dedupe: bool,
    },

    /// List saved statement lists
    Courses,

    /// Report structural problems in a statement list
    Check {
        /// Statement list path, or the name of a saved list
        file: String,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("thmgraph starting");

    let config = Config::load()?;
    if let Some(path) = &config.project_file {
        output.verbose_ctx("config", &format!("Using project config: {}", path.display()));
    }

    let saved_dir = cli.saved_dir.unwrap_or_else(|| config.saved_dir.clone());
    output.verbose_ctx("config", &format!("Saved course directory: {}", saved_dir.display()));
    let library = CourseLibrary::new(saved_dir);

    match cli.command {
        Commands::Graph { file, layout, seed, dedupe } => {
            let options = graph_cmd::GraphOptions {
                layout: layout.unwrap_or(config.layout),
                seed: seed.or(config.seed),
                dedupe,
            };
            output.verbose_ctx(
                "graph",
                &format!(
                    "Building graph for {}: layout={}, seed={:?}, dedupe={}",
                    file,
                    options.layout.as_str(),
                    options.seed,
                    options.dedupe
                ),
            );
            graph_cmd::run(&output, &library, &file, &options)?
        }

        Commands::Courses => courses::list(&output, &library)?,

        Commands::Check { file } => {
            output.verbose_ctx("check", &format!("Checking {}", file));
            check::run(&output, &library, &file)?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}
