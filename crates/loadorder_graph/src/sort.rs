//! Topological sorting of a validated plugin graph.

use core::cmp::Reverse;
use std::collections::BinaryHeap;

use loadorder_metadata::PluginName;

use crate::diagnostics::{DiagnosticSink, NullSink, SortEvent};
use crate::edge::EdgeKind;
use crate::error::SortError;
use crate::graph::LoadOrderGraph;

/// Reduces a [`LoadOrderGraph`] to one load order.
///
/// Kahn's algorithm where, among all plugins whose predecessors are placed,
/// the one with the lowest input index goes next. Identical graphs always
/// produce identical orders.
///
/// # Example
///
/// ```
/// use loadorder_graph::{ConstraintGraphBuilder, GroupGraph, TopologicalSorter};
/// use loadorder_metadata::{PluginFact, PluginName};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let facts = [
///     PluginFact::new(PluginName::new("B.esp")?),
///     PluginFact::new(PluginName::new("A.esp")?),
/// ];
/// let groups = GroupGraph::new().validate()?;
/// let graph = ConstraintGraphBuilder::new(&facts, &groups).build()?;
///
/// let order = TopologicalSorter::new().sort(&graph)?;
/// assert_eq!(order[0].as_str(), "B.esp");
/// # Ok(())
/// # }
/// ```
pub struct TopologicalSorter<'a> {
    sink: &'a dyn DiagnosticSink,
    check_uniqueness: bool,
}

impl Default for TopologicalSorter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TopologicalSorter<'a> {
    /// Creates a sorter that reports nothing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sink: &NullSink,
            check_uniqueness: false,
        }
    }

    /// Sets the sink receiving [`SortEvent::AmbiguousOrder`] reports.
    #[must_use]
    pub fn with_sink(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    /// Enables the report of consecutive plugins ordered only by their input
    /// positions.
    #[must_use]
    pub fn with_uniqueness_check(mut self, enabled: bool) -> Self {
        self.check_uniqueness = enabled;
        self
    }

    /// Returns the plugins of `graph` in load order.
    ///
    /// # Errors
    ///
    /// Returns [`SortError::InternalSortInconsistency`] if some vertices can
    /// never be placed, which means the graph was cyclic despite validation.
    pub fn sort(&self, graph: &LoadOrderGraph) -> Result<Vec<PluginName>, SortError> {
        let order = self.sort_indices(graph)?;

        if self.check_uniqueness {
            // Consecutive plugins can only be ordered by a direct edge.
            for pair in order.windows(2) {
                let kind = graph.edge_kind(pair[0], pair[1]);
                if kind.is_none_or(|kind| kind == EdgeKind::TieBreak) {
                    self.sink.record(&SortEvent::AmbiguousOrder {
                        earlier: graph.vertices()[pair[0]].clone(),
                        later: graph.vertices()[pair[1]].clone(),
                    });
                }
            }
        }

        Ok(order
            .into_iter()
            .map(|index| graph.vertices()[index].clone())
            .collect())
    }

    /// Returns the vertex indices of `graph` in load order.
    ///
    /// # Errors
    ///
    /// See [`sort`](Self::sort).
    pub fn sort_indices(&self, graph: &LoadOrderGraph) -> Result<Vec<usize>, SortError> {
        let adjacency = graph.adjacency();
        let mut in_degrees = adjacency.in_degrees();
        let mut ready: BinaryHeap<Reverse<usize>> = in_degrees
            .iter()
            .enumerate()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(vertex, _)| Reverse(vertex))
            .collect();

        let mut order = Vec::with_capacity(graph.vertex_count());
        while let Some(Reverse(vertex)) = ready.pop() {
            order.push(vertex);
            for &next in adjacency.successors(vertex) {
                in_degrees[next] -= 1;
                if in_degrees[next] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        if order.len() < graph.vertex_count() {
            let unresolved = in_degrees
                .iter()
                .enumerate()
                .filter(|&(_, &degree)| degree > 0)
                .map(|(vertex, _)| graph.vertices()[vertex].clone())
                .collect();
            return Err(SortError::InternalSortInconsistency { unresolved });
        }

        Ok(order)
    }
}
