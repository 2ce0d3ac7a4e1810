//! thmgraph - dependency graphs for theorem lists

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = theorem_graph::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
