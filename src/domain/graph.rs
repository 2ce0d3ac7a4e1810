//! Dependency graph for statements
//!
//! Resolves `previous_results` references into directed edges
//! (dependency -> dependent). Uses petgraph for storage and ordering,
//! with incoming and outgoing adjacency kept side by side in insertion
//! order so layouts can walk neighbours in a stable order.

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use thiserror::Error;

use super::statement::StatementRecord;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Cyclic dependency between statements: {}", .nodes.join(", "))]
    CyclicDependency { nodes: Vec<String> },
}

/// A reference that matched no statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// Id of the statement carrying the reference
    pub statement: String,
    pub reference: String,
}

/// A dependency graph over statement records
///
/// One node per distinct `id`. When several records share an id, the
/// later record supplies the node's attributes while edges from every
/// occurrence are kept.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Node weights are the statement supplying the node's attributes
    graph: DiGraph<StatementRecord, ()>,

    /// Map from statement id to node index
    node_map: HashMap<String, NodeIndex>,

    outgoing: Vec<Vec<NodeIndex>>,
    incoming: Vec<Vec<NodeIndex>>,

    /// Number of input records per node
    occurrences: Vec<usize>,

    unresolved: Vec<UnresolvedReference>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from an ordered list of statements
    ///
    /// For a record A and each reference r it lists, an edge B -> A is
    /// added for every record B where r equals B's id or A's own name,
    /// ignoring case. The name test is against the referencing record.
    pub fn from_records(records: &[StatementRecord]) -> Self {
        let mut graph = Self::new();

        // First pass: nodes, later duplicates overwrite attributes
        let indices: Vec<NodeIndex> = records
            .iter()
            .map(|record| graph.add_statement(record.clone()))
            .collect();

        let lowered_ids: Vec<String> = records.iter().map(|r| r.id.to_lowercase()).collect();

        // Second pass: edges
        for (a, record) in records.iter().enumerate() {
            let own_name = record.name.to_lowercase();

            for reference in &record.previous_results {
                let reference_lower = reference.to_lowercase();
                let names_self = reference_lower == own_name;
                let mut matched = false;

                for (b, candidate_id) in lowered_ids.iter().enumerate() {
                    if names_self || *candidate_id == reference_lower {
                        graph.add_edge(indices[b], indices[a]);
                        matched = true;
                    }
                }

                if !matched {
                    graph.unresolved.push(UnresolvedReference {
                        statement: record.id.clone(),
                        reference: reference.clone(),
                    });
                }
            }
        }

        graph
    }

    /// Adds a statement, replacing the attributes of an existing node with
    /// the same id
    fn add_statement(&mut self, record: StatementRecord) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&record.id) {
            self.graph[idx] = record;
            self.occurrences[idx.index()] += 1;
            return idx;
        }

        let id = record.id.clone();
        let idx = self.graph.add_node(record);
        self.node_map.insert(id, idx);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        self.occurrences.push(1);
        idx
    }

    fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        self.graph.add_edge(from, to, ());
        self.outgoing[from.index()].push(to);
        self.incoming[to.index()].push(from);
    }

    /// Returns the number of statements in the graph
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns the number of edges, duplicates included
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Node indices in first-appearance order
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    /// The statement supplying a node's attributes
    pub fn statement(&self, idx: NodeIndex) -> &StatementRecord {
        &self.graph[idx]
    }

    pub fn id(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].id
    }

    /// Direct dependents, in edge insertion order
    pub fn outgoing(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.outgoing[idx.index()]
    }

    /// Direct dependencies, in edge insertion order
    pub fn incoming(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.incoming[idx.index()]
    }

    /// Returns true if nothing points into the node
    pub fn is_root(&self, idx: NodeIndex) -> bool {
        self.incoming[idx.index()].is_empty()
    }

    /// All edges as (source, target) in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target()))
    }

    /// References that matched no statement
    pub fn unresolved(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    /// Ids that appeared on more than one input record
    pub fn duplicate_ids(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|idx| self.occurrences[idx.index()] > 1)
            .map(|idx| self.id(idx))
            .collect()
    }

    /// Nodes with an edge to themselves
    pub fn self_loops(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|idx| self.outgoing[idx.index()].contains(idx))
            .collect()
    }

    /// Weakly-connected components
    ///
    /// Components appear in order of their first node; members are in
    /// depth-first pre-order, following outgoing edges before incoming ones.
    pub fn weak_components(&self) -> Vec<Vec<NodeIndex>> {
        let mut visited = vec![false; self.len()];
        let mut components = Vec::new();

        for start in self.graph.node_indices() {
            if visited[start.index()] {
                continue;
            }

            let mut component = Vec::new();
            let mut stack = vec![start];

            while let Some(node) = stack.pop() {
                if visited[node.index()] {
                    continue;
                }
                visited[node.index()] = true;
                component.push(node);

                // Reversed so the first neighbour is popped first
                let neighbours = self.outgoing(node).iter().chain(self.incoming(node));
                for &next in neighbours.rev() {
                    if !visited[next.index()] {
                        stack.push(next);
                    }
                }
            }

            components.push(component);
        }

        components
    }

    /// Returns all nodes in topological order (dependencies before dependents)
    pub fn topological_order(&self) -> Result<Vec<NodeIndex>, GraphError> {
        toposort(&self.graph, None).map_err(|_| GraphError::CyclicDependency {
            nodes: self
                .cycles()
                .into_iter()
                .flatten()
                .map(|idx| self.id(idx).to_string())
                .collect(),
        })
    }

    /// Groups of nodes that lie on a common cycle, self-loops included
    pub fn cycles(&self) -> Vec<Vec<NodeIndex>> {
        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.outgoing(scc[0]).contains(&scc[0]))
            .map(|mut scc| {
                scc.sort();
                scc
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Returns true if the graph has no cycles
    pub fn is_acyclic(&self) -> bool {
        toposort(&self.graph, None).is_ok()
    }
}
