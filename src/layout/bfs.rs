//! Breadth-first layout
//!
//! Seeds a breadth-first walk from every statement not reached yet and
//! numbers levels by first discovery. All nodes share one centre line
//! with random horizontal jitter, so overlapping levels stay legible.

use petgraph::graph::NodeIndex;
use rand::Rng;
use std::collections::VecDeque;

use super::{level_y, Layout, LayoutStrategy, Neighbours, Placement};
use crate::domain::{DependencyGraph, GraphError};

/// Horizontal centre line
pub const CENTRE_X: f64 = 800.0;

/// Largest horizontal offset from the centre line, either side
pub const MAX_JITTER: i32 = 200;

/// First-discovery depth of every node
///
/// Every node not reached yet seeds a walk at depth 1. A node is claimed
/// when it is enqueued, so the first walk to reach it fixes its depth.
/// Cycles are harmless.
pub fn bfs_depths(graph: &DependencyGraph) -> Vec<u32> {
    let mut visited = vec![false; graph.len()];
    let mut depth = vec![0u32; graph.len()];

    for seed in graph.node_indices() {
        if visited[seed.index()] {
            continue;
        }
        visited[seed.index()] = true;

        let mut queue = VecDeque::from([(seed, 1u32)]);
        while let Some((node, level)) = queue.pop_front() {
            depth[node.index()] = level;

            for &next in graph.outgoing(node) {
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    queue.push_back((next, level + 1));
                }
            }
        }
    }

    depth
}

/// Breadth-first layout drawing jitter from `R`
#[derive(Debug, Clone)]
pub struct BfsLayout<R> {
    rng: R,
}

impl<R: Rng> BfsLayout<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn jitter(&mut self) -> f64 {
        f64::from(self.rng.gen_range(-MAX_JITTER..=MAX_JITTER))
    }
}

impl<R: Rng> LayoutStrategy for BfsLayout<R> {
    fn layout(&mut self, graph: &DependencyGraph) -> Result<Layout, GraphError> {
        let depths = bfs_depths(graph);

        let placements = graph
            .node_indices()
            .map(|node| {
                let depth = depths[node.index()];
                Placement {
                    depth,
                    x: CENTRE_X + self.jitter(),
                    y: level_y(depth),
                    neighbours: Some(Neighbours {
                        ancestors: distinct_ids(graph, graph.incoming(node)),
                        descendants: distinct_ids(graph, graph.outgoing(node)),
                    }),
                }
            })
            .collect();

        Ok(Layout::new(placements))
    }
}

/// Ids of `nodes`, first occurrence kept
fn distinct_ids(graph: &DependencyGraph, nodes: &[NodeIndex]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(nodes.len());
    for &node in nodes {
        let id = graph.id(node);
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}
