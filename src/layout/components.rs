//! Component-aware longest-path layout
//!
//! Each weakly-connected component gets its own horizontal band. Inside a
//! band, roots are numbered left to right and every other statement sits
//! at the mean column of the roots it transitively depends on.

use petgraph::graph::NodeIndex;
use std::collections::BTreeSet;

use super::{level_y, Layout, LayoutStrategy, Placement};
use crate::domain::{DependencyGraph, GraphError};

/// Left edge of the first component
pub const ORIGIN_X: f64 = 500.0;

/// Horizontal distance between consecutive components
pub const COMPONENT_SPACING: f64 = 600.0;

/// Horizontal distance between root columns inside a component
pub const COLUMN_SPACING: f64 = 200.0;

/// Longest-path depth and root ancestry of every node
#[derive(Debug, Clone)]
pub struct LongestPaths {
    depth: Vec<u32>,
    roots: Vec<BTreeSet<NodeIndex>>,
}

impl LongestPaths {
    /// Walks the graph in topological order
    ///
    /// Roots have depth 1 and are their own sole root dependency. Any other
    /// node is one deeper than its deepest dependency and inherits the union
    /// of its dependencies' roots.
    pub fn compute(graph: &DependencyGraph) -> Result<Self, GraphError> {
        let order = graph.topological_order()?;

        let mut depth = vec![0u32; graph.len()];
        let mut roots = vec![BTreeSet::new(); graph.len()];

        for node in order {
            let node_ix = node.index();
            let dependencies = graph.incoming(node);

            if dependencies.is_empty() {
                depth[node_ix] = 1;
                roots[node_ix].insert(node);
                continue;
            }

            let deepest = dependencies
                .iter()
                .map(|dep| depth[dep.index()])
                .max()
                .unwrap_or(0);
            depth[node_ix] = deepest + 1;

            let inherited: BTreeSet<NodeIndex> = dependencies
                .iter()
                .flat_map(|dep| roots[dep.index()].iter().copied())
                .collect();
            roots[node_ix] = inherited;
        }

        Ok(Self { depth, roots })
    }

    pub fn depth(&self, node: NodeIndex) -> u32 {
        self.depth[node.index()]
    }

    /// Roots the node depends on, itself if it is a root
    pub fn root_dependencies(&self, node: NodeIndex) -> &BTreeSet<NodeIndex> {
        &self.roots[node.index()]
    }
}

/// Longest-path layout with one band per connected component
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentLayout;

impl LayoutStrategy for ComponentLayout {
    fn layout(&mut self, graph: &DependencyGraph) -> Result<Layout, GraphError> {
        let paths = LongestPaths::compute(graph)?;

        let mut component_of = vec![0usize; graph.len()];
        let mut column = vec![0usize; graph.len()];

        for (component_ix, members) in graph.weak_components().iter().enumerate() {
            let mut next_column = 0;
            for &node in members {
                component_of[node.index()] = component_ix;
                if paths.depth(node) == 1 {
                    column[node.index()] = next_column;
                    next_column += 1;
                }
            }
        }

        let placements = graph
            .node_indices()
            .map(|node| {
                let roots = paths.root_dependencies(node);
                // Never empty: every node resolves to at least one root
                let mean_column = roots.iter().map(|r| column[r.index()] as f64).sum::<f64>()
                    / roots.len() as f64;

                let depth = paths.depth(node);
                Placement {
                    depth,
                    x: ORIGIN_X
                        + COMPONENT_SPACING * component_of[node.index()] as f64
                        + COLUMN_SPACING * mean_column,
                    y: level_y(depth),
                    neighbours: None,
                }
            })
            .collect();

        Ok(Layout::new(placements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StatementRecord, StatementType};

    fn lemma(id: &str) -> StatementRecord {
        StatementRecord::new(id, format!("{} name", id), StatementType::Lemma)
    }

    fn layout_of(records: &[StatementRecord]) -> (DependencyGraph, Layout) {
        let graph = DependencyGraph::from_records(records);
        let layout = ComponentLayout.layout(&graph).unwrap();
        (graph, layout)
    }

    fn placement<'a>(graph: &DependencyGraph, layout: &'a Layout, id: &str) -> &'a Placement {
        layout.placement(graph.index_of(id).unwrap())
    }

    #[test]
    fn independent_statements_are_all_roots() {
        let (_, layout) = layout_of(&[lemma("A"), lemma("B"), lemma("C")]);
        assert!(layout.iter().all(|p| p.depth == 1 && p.y == 200.0));
    }

    #[test]
    fn chain_depths() {
        let (graph, layout) = layout_of(&[
            lemma("A"),
            lemma("B").with_reference("A"),
            lemma("C").with_reference("B"),
        ]);

        assert_eq!(placement(&graph, &layout, "A").depth, 1);
        assert_eq!(placement(&graph, &layout, "B").depth, 2);
        assert_eq!(placement(&graph, &layout, "C").depth, 3);
        // Single root in column 0 keeps the whole chain on one vertical
        assert!(layout.iter().all(|p| p.x == 500.0));
    }

    #[test]
    fn diamond_uses_longest_path() {
        let records = [
            lemma("A"),
            lemma("B").with_reference("A"),
            lemma("C").with_reference("A"),
            lemma("D").with_reference("B").with_reference("C"),
        ];
        let (graph, layout) = layout_of(&records);
        let paths = LongestPaths::compute(&graph).unwrap();

        let a = graph.index_of("A").unwrap();
        let d = graph.index_of("D").unwrap();
        assert_eq!(paths.depth(d), 3);
        assert_eq!(paths.root_dependencies(d), &BTreeSet::from([a]));
        assert_eq!(placement(&graph, &layout, "D").y, 600.0);
    }

    #[test]
    fn longer_branch_determines_depth() {
        // A -> B -> C -> E and A -> E
        let (graph, layout) = layout_of(&[
            lemma("A"),
            lemma("B").with_reference("A"),
            lemma("C").with_reference("B"),
            lemma("E").with_reference("A").with_reference("C"),
        ]);

        assert_eq!(placement(&graph, &layout, "E").depth, 4);
    }

    #[test]
    fn node_sits_at_mean_of_root_columns() {
        // Roots R0, R1, R2 in one component; M depends on R0 and R2
        let (graph, layout) = layout_of(&[
            lemma("R0"),
            lemma("R1"),
            lemma("R2"),
            lemma("M").with_reference("R0").with_reference("R2"),
            lemma("N").with_reference("R1").with_reference("R2"),
        ]);

        // Pre-order from R0: R0, M, R2, N, R1
        assert_eq!(placement(&graph, &layout, "R0").x, 500.0);
        assert_eq!(placement(&graph, &layout, "R2").x, 700.0);
        assert_eq!(placement(&graph, &layout, "R1").x, 900.0);
        assert_eq!(placement(&graph, &layout, "M").x, 600.0);
        assert_eq!(placement(&graph, &layout, "N").x, 800.0);
    }

    #[test]
    fn components_are_offset_by_spacing() {
        let (graph, layout) = layout_of(&[
            lemma("A"),
            lemma("B").with_reference("A"),
            lemma("X"),
            lemma("Y").with_reference("X"),
        ]);

        let first = placement(&graph, &layout, "A").x;
        let second = placement(&graph, &layout, "X").x;
        assert!(second - first >= 600.0);
        assert_eq!(placement(&graph, &layout, "Y").x, second);
    }

    #[test]
    fn columns_restart_in_each_component() {
        let (graph, layout) = layout_of(&[lemma("A"), lemma("B"), lemma("C").with_reference("B")]);

        // A alone in component 0; B starts component 1 at column 0
        assert_eq!(placement(&graph, &layout, "A").x, 500.0);
        assert_eq!(placement(&graph, &layout, "B").x, 1100.0);
        assert_eq!(placement(&graph, &layout, "C").x, 1100.0);
    }

    #[test]
    fn duplicate_ids_are_placed_once() {
        let (graph, layout) = layout_of(&[lemma("A"), lemma("B").with_reference("A"), lemma("A")]);

        assert_eq!(layout.len(), graph.len());
        assert_eq!(layout.len(), 2);
        assert_eq!(placement(&graph, &layout, "B").depth, 2);
    }

    #[test]
    fn layout_is_deterministic() {
        let records = [
            lemma("A"),
            lemma("B").with_reference("A"),
            lemma("C"),
            lemma("D").with_reference("B").with_reference("C"),
        ];
        let (_, first) = layout_of(&records);
        let (_, second) = layout_of(&records);

        assert_eq!(first, second);
    }

    #[test]
    fn cyclic_input_is_rejected() {
        let graph = DependencyGraph::from_records(&[
            lemma("A").with_reference("B"),
            lemma("B").with_reference("A"),
        ]);

        let result = ComponentLayout.layout(&graph);
        assert!(matches!(result, Err(GraphError::CyclicDependency { .. })));
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let records: Vec<_> = (0..2_000)
            .map(|i| {
                let record = lemma(&format!("L{}", i));
                if i == 0 {
                    record
                } else {
                    record.with_reference(format!("L{}", i - 1))
                }
            })
            .collect();
        let graph = DependencyGraph::from_records(&records);
        let paths = LongestPaths::compute(&graph).unwrap();

        assert_eq!(paths.depth(graph.index_of("L1999").unwrap()), 2_000);
    }
}
