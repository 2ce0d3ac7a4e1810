//! Node-link serialization
//!
//! The transport shape handed to the rendering client: a node list
//! carrying every statement field plus its placement, and a link list of
//! `{source, target}` pairs in edge insertion order.

use serde::Serialize;
use serde_json::{Map, Value};

use super::{Layout, Placement};
use crate::domain::DependencyGraph;

/// A graph edge by statement id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub source: String,
    pub target: String,
}

/// A laid-out dependency graph ready to send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLinkGraph {
    pub directed: bool,
    pub multigraph: bool,
    pub graph: Map<String, Value>,
    pub nodes: Vec<Map<String, Value>>,
    pub links: Vec<Link>,
}

impl NodeLinkGraph {
    /// Combines a graph with its layout
    ///
    /// Layout fields (`depth`, `x`, `y` and, when present, `ancestors` and
    /// `descendants`) take precedence over statement fields of the same name.
    pub fn new(graph: &DependencyGraph, layout: &Layout) -> serde_json::Result<Self> {
        let nodes = graph
            .node_indices()
            .map(|idx| -> serde_json::Result<Map<String, Value>> {
                let mut node: Map<String, Value> =
                    serde_json::from_value(serde_json::to_value(graph.statement(idx))?)?;
                annotate(&mut node, layout.placement(idx));
                Ok(node)
            })
            .collect::<serde_json::Result<_>>()?;

        let links = graph
            .edges()
            .map(|(source, target)| Link {
                source: graph.id(source).to_string(),
                target: graph.id(target).to_string(),
            })
            .collect();

        Ok(Self {
            directed: true,
            multigraph: false,
            graph: Map::new(),
            nodes,
            links,
        })
    }

    /// Finds a node by statement id
    pub fn node(&self, id: &str) -> Option<&Map<String, Value>> {
        self.nodes
            .iter()
            .find(|node| node.get("id").and_then(Value::as_str) == Some(id))
    }
}

fn annotate(node: &mut Map<String, Value>, placement: &Placement) {
    node.insert("depth".into(), Value::from(placement.depth));
    node.insert("x".into(), Value::from(placement.x));
    node.insert("y".into(), Value::from(placement.y));

    if let Some(neighbours) = &placement.neighbours {
        node.insert("ancestors".into(), Value::from(neighbours.ancestors.clone()));
        node.insert("descendants".into(), Value::from(neighbours.descendants.clone()));
    }
}
