//! Structural check of a statement list

use anyhow::Result;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use super::graph_cmd::report_skipped;
use super::output::Output;
use crate::domain::DependencyGraph;
use crate::storage::{CourseLibrary, LoadedStatements, SkippedRecord};

#[derive(Debug, Serialize)]
struct Unresolved {
    statement: String,
    reference: String,
}

/// Everything `check` found
#[derive(Debug, Serialize)]
struct CheckReport {
    statements: usize,
    links: usize,
    skipped: Vec<SkippedRecord>,
    duplicate_ids: Vec<String>,
    unresolved: Vec<Unresolved>,
    self_loops: Vec<String>,
    cycles: Vec<Vec<String>>,
    acyclic: bool,
}

impl CheckReport {
    fn build(loaded: LoadedStatements) -> Self {
        let graph = DependencyGraph::from_records(&loaded.records);
        let ids = |nodes: &[NodeIndex]| -> Vec<String> {
            nodes.iter().map(|&idx| graph.id(idx).to_string()).collect()
        };

        let cycles: Vec<Vec<String>> = graph.cycles().iter().map(|c| ids(c)).collect();

        Self {
            statements: graph.len(),
            links: graph.edge_count(),
            skipped: loaded.skipped,
            duplicate_ids: graph.duplicate_ids().into_iter().map(String::from).collect(),
            unresolved: graph
                .unresolved()
                .iter()
                .map(|u| Unresolved {
                    statement: u.statement.clone(),
                    reference: u.reference.clone(),
                })
                .collect(),
            self_loops: ids(&graph.self_loops()),
            acyclic: cycles.is_empty(),
            cycles,
        }
    }
}

pub fn run(output: &Output, library: &CourseLibrary, file: &str) -> Result<()> {
    let source = library.resolve(file)?;
    output.verbose_ctx("check", &format!("Reading {}", source.path().display()));

    let report = CheckReport::build(source.read()?);

    if output.is_json() {
        output.data(&report);
    } else {
        print_report(output, &report);
    }

    if !report.acyclic {
        anyhow::bail!(
            "Statement list has {} dependency cycle(s)",
            report.cycles.len()
        );
    }

    Ok(())
}

fn print_report(output: &Output, report: &CheckReport) {
    report_skipped(output, &report.skipped);

    output.line(&format!(
        "{} statement(s), {} link(s)",
        report.statements, report.links
    ));

    if !report.duplicate_ids.is_empty() {
        output.blank();
        output.line("Duplicate ids (later record wins):");
        for id in &report.duplicate_ids {
            output.line(&format!("  {}", id));
        }
    }

    if !report.unresolved.is_empty() {
        output.blank();
        output.line("Unresolved references:");
        for u in &report.unresolved {
            output.line(&format!("  {} -> {}", u.statement, u.reference));
        }
    }

    if !report.self_loops.is_empty() {
        output.blank();
        output.line("Self-references:");
        for id in &report.self_loops {
            output.line(&format!("  {}", id));
        }
    }

    output.blank();
    if report.acyclic {
        output.line("No dependency cycles");
    } else {
        output.line("Dependency cycles:");
        for cycle in &report.cycles {
            output.line(&format!("  {}", cycle.join(", ")));
        }
    }
}
