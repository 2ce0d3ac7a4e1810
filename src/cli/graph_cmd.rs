//! Graph command: statement list in, laid-out node-link graph out

use anyhow::{Context, Result};
use serde::Serialize;

use super::output::Output;
use crate::domain::{dedupe_by_id, DependencyGraph, StatementRecord};
use crate::layout::{lay_out, LayoutKind, NodeLinkGraph};
use crate::storage::{CourseLibrary, SkippedRecord};

/// Options for `thmgraph graph`
#[derive(Debug, Clone)]
pub struct GraphOptions {
    pub layout: LayoutKind,
    pub seed: Option<u64>,
    pub dedupe: bool,
}

/// Response body, matching what the rendering client expects
#[derive(Serialize)]
struct GraphResponse<'a> {
    success: bool,
    graph: &'a NodeLinkGraph,
    theorem_list: &'a [StatementRecord],
    skipped: &'a [SkippedRecord],
}

pub fn run(output: &Output, library: &CourseLibrary, file: &str, options: &GraphOptions) -> Result<()> {
    let source = library.resolve(file)?;
    output.verbose_ctx("graph", &format!("Reading {}", source.path().display()));

    let loaded = source.read()?;
    report_skipped(output, &loaded.skipped);

    let records = if options.dedupe {
        let before = loaded.records.len();
        let records = dedupe_by_id(loaded.records);
        output.verbose_ctx(
            "graph",
            &format!("Dedupe removed {} statement(s)", before - records.len()),
        );
        records
    } else {
        loaded.records
    };

    let graph = DependencyGraph::from_records(&records);
    output.verbose_ctx(
        "graph",
        &format!(
            "{} statement(s), {} edge(s), {} unresolved reference(s)",
            graph.len(),
            graph.edge_count(),
            graph.unresolved().len()
        ),
    );

    let layout = lay_out(&graph, options.layout, options.seed)
        .with_context(|| format!("Failed to lay out {} graph", options.layout.as_str()))?;
    let node_link =
        NodeLinkGraph::new(&graph, &layout).context("Failed to serialize laid-out graph")?;

    if output.is_json() {
        output.data(&GraphResponse {
            success: true,
            graph: &node_link,
            theorem_list: &records,
            skipped: &loaded.skipped,
        });
        return Ok(());
    }

    if graph.is_empty() {
        output.line("No statements found");
        return Ok(());
    }

    output.row(&["ID", "TYPE", "DEPTH", "X", "Y"]);
    for idx in graph.node_indices() {
        let statement = graph.statement(idx);
        let placement = layout.placement(idx);
        let depth = placement.depth.to_string();
        let x = format!("{:.1}", placement.x);
        let y = format!("{:.1}", placement.y);
        output.row(&[
            statement.id.as_str(),
            statement.kind.as_str(),
            depth.as_str(),
            x.as_str(),
            y.as_str(),
        ]);
    }

    output.blank();
    output.line(&format!(
        "{} statement(s), {} link(s), {} layout",
        node_link.nodes.len(),
        node_link.links.len(),
        options.layout.as_str()
    ));

    Ok(())
}

pub(super) fn report_skipped(output: &Output, skipped: &[SkippedRecord]) {
    for record in skipped {
        let label = record.id.as_deref().unwrap_or("<no id>");
        output.warn(&format!(
            "Skipped record {} ({}): {}",
            record.index, label, record.reason
        ));
    }
}
