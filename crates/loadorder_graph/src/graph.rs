//! The plugin constraint graph and its layered builder.
//!
//! [`ConstraintGraphBuilder`] creates one vertex per plugin, in input order, and
//! adds edges in six layers ([`EdgeKind::LAYERS`]). Each layer is staged in a
//! transaction over a copy of the graph and checked for cycles before it is
//! committed. A layer that introduces a cycle is discarded in full and the build
//! fails with [`SortError::CyclicPlugins`] naming that layer.
//!
//! # Example
//!
//! ```
//! use loadorder_graph::{ConstraintGraphBuilder, EdgeKind, GroupGraph};
//! use loadorder_metadata::{PluginFact, PluginName};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let facts = [
//!     PluginFact::new(PluginName::new("Mod.esp")?).with_masters([PluginName::new("Skyrim.esm")?]),
//!     PluginFact::new(PluginName::new("Skyrim.esm")?).with_master_flag(true),
//! ];
//! let groups = GroupGraph::new().validate()?;
//!
//! let graph = ConstraintGraphBuilder::new(&facts, &groups).build()?;
//! assert!(graph.has_path(1, 0));
//! assert_eq!(graph.edge_kind(1, 0), Some(EdgeKind::MasterFlag));
//! # Ok(())
//! # }
//! ```

use hashbrown::HashMap;
use loadorder_metadata::{DeclaredOverlaps, OverlapComparator, PluginFact, PluginName};
use serde::Serialize;

use crate::adjacency::{Adjacency, Reachability, row_contains};
use crate::config::SortConfig;
use crate::cycle::find_cycle;
use crate::diagnostics::{DiagnosticSink, SortEvent, TracingSink};
use crate::edge::{Edge, EdgeKind};
use crate::error::{CycleStep, SortError};
use crate::group::ValidatedGroupGraph;

// ─────────────────────────────────────────────────────────────────────────────
// LoadOrderGraph
// ─────────────────────────────────────────────────────────────────────────────

/// A validated, acyclic plugin graph.
///
/// Vertex `i` is the plugin at position `i` of the input. Each ordered pair of
/// plugins has at most one edge, owned by the first layer that added it.
/// Serializes as its vertex names and edge list.
#[derive(Debug, Clone, Serialize)]
pub struct LoadOrderGraph {
    vertices: Vec<PluginName>,
    edges: Vec<Edge>,
    #[serde(skip)]
    index: HashMap<PluginName, usize>,
    #[serde(skip)]
    adjacency: Adjacency,
    #[serde(skip)]
    reach: Reachability,
    #[serde(skip)]
    kinds: HashMap<(usize, usize), EdgeKind>,
}

impl LoadOrderGraph {
    fn with_vertices(vertices: Vec<PluginName>, index: HashMap<PluginName, usize>) -> Self {
        let vertex_count = vertices.len();
        Self {
            vertices,
            edges: Vec::new(),
            index,
            adjacency: Adjacency::new(vertex_count),
            reach: Reachability::new(vertex_count),
            kinds: HashMap::new(),
        }
    }

    /// Builds a graph from raw edges without any validation.
    #[cfg(test)]
    pub(crate) fn from_parts(vertices: Vec<PluginName>, edges: Vec<Edge>) -> Self {
        let index = vertices
            .iter()
            .enumerate()
            .map(|(position, name)| (name.clone(), position))
            .collect();
        let mut graph = Self::with_vertices(vertices, index);
        for edge in edges {
            graph.adjacency.add_edge(edge.source, edge.target);
            graph.kinds.insert((edge.source, edge.target), edge.kind);
            graph.edges.push(edge);
        }
        graph
    }

    /// Returns the plugin names, in input order.
    #[must_use]
    pub fn vertices(&self) -> &[PluginName] {
        &self.vertices
    }

    /// Returns every edge, in the order the edges were added.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the edges added by one layer.
    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the vertex index of `name`.
    #[must_use]
    pub fn vertex_index(&self, name: &PluginName) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns whether a non-empty path `source ~> target` exists.
    ///
    /// Out-of-range indices return `false`.
    #[must_use]
    pub fn has_path(&self, source: usize, target: usize) -> bool {
        source < self.vertex_count()
            && target < self.vertex_count()
            && self.reach.reaches(source, target)
    }

    /// Returns whether `earlier` must load before `later`.
    #[must_use]
    pub fn loads_before(&self, earlier: &PluginName, later: &PluginName) -> bool {
        match (self.vertex_index(earlier), self.vertex_index(later)) {
            (Some(source), Some(target)) => self.reach.reaches(source, target),
            _ => false,
        }
    }

    /// Returns the kind of the direct edge `source -> target`, if any.
    #[must_use]
    pub fn edge_kind(&self, source: usize, target: usize) -> Option<EdgeKind> {
        self.kinds.get(&(source, target)).copied()
    }

    pub(crate) fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layer transactions
// ─────────────────────────────────────────────────────────────────────────────

/// Edges staged for one layer on top of a copy of the committed graph.
struct LayerTransaction<'a> {
    layer: EdgeKind,
    adjacency: Adjacency,
    reach: Reachability,
    staged: Vec<Edge>,
    // Set once an edge is staged without updating `reach`.
    closure_stale: bool,
    facts: &'a [PluginFact],
    sink: &'a dyn DiagnosticSink,
    edge_events: bool,
}

impl<'a> LayerTransaction<'a> {
    fn begin(
        graph: &LoadOrderGraph,
        layer: EdgeKind,
        facts: &'a [PluginFact],
        sink: &'a dyn DiagnosticSink,
        edge_events: bool,
    ) -> Self {
        Self {
            layer,
            adjacency: graph.adjacency.clone(),
            reach: graph.reach.clone(),
            staged: Vec::new(),
            closure_stale: false,
            facts,
            sink,
            edge_events,
        }
    }

    /// Stages `source -> target`. The edge may close a cycle.
    fn stage(&mut self, source: usize, target: usize) {
        if self.push(source, target) {
            self.closure_stale = true;
        }
    }

    /// Stages `source -> target` for an unordered pair, keeping the closure
    /// current.
    fn stage_unordered(&mut self, source: usize, target: usize) {
        debug_assert!(!self.closure_stale, "closure must be current");
        debug_assert!(!self.reach.orders(source, target), "pair already ordered");
        if self.push(source, target) {
            self.reach.add_edge(source, target);
        }
    }

    fn push(&mut self, source: usize, target: usize) -> bool {
        if source == target || !self.adjacency.add_edge(source, target) {
            return false;
        }

        self.staged.push(Edge::new(self.layer, source, target));
        if self.edge_events {
            self.sink.record(&SortEvent::EdgeAdded {
                kind: self.layer,
                source: self.facts[source].name().clone(),
                target: self.facts[target].name().clone(),
            });
        }
        true
    }

    fn skip(&self, source: usize, target: usize) {
        if self.edge_events {
            self.sink.record(&SortEvent::EdgeSkipped {
                kind: self.layer,
                source: self.facts[source].name().clone(),
                target: self.facts[target].name().clone(),
            });
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ConstraintGraphBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a [`LoadOrderGraph`] from plugin facts and a validated group graph.
///
/// Defaults: [`SortConfig::default`], overlaps read from the facts
/// ([`DeclaredOverlaps`]) and diagnostics sent to [`TracingSink`].
pub struct ConstraintGraphBuilder<'a> {
    facts: &'a [PluginFact],
    groups: &'a ValidatedGroupGraph,
    config: SortConfig,
    overlap: &'a dyn OverlapComparator,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> ConstraintGraphBuilder<'a> {
    /// Creates a builder over `facts`, whose order is the tie-break order.
    #[must_use]
    pub fn new(facts: &'a [PluginFact], groups: &'a ValidatedGroupGraph) -> Self {
        Self {
            facts,
            groups,
            config: SortConfig::default(),
            overlap: &DeclaredOverlaps,
            sink: &TracingSink,
        }
    }

    /// Sets the sort configuration.
    #[must_use]
    pub fn with_config(mut self, config: SortConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the comparator deciding which plugins overlap.
    #[must_use]
    pub fn with_overlap_comparator(mut self, overlap: &'a dyn OverlapComparator) -> Self {
        self.overlap = overlap;
        self
    }

    /// Sets the diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    /// Checks the facts and adds every layer of edges.
    ///
    /// # Errors
    ///
    /// Checks run in this order, and the first failure is returned:
    ///
    /// - [`SortError::DuplicatePlugin`] if a name appears twice.
    /// - [`SortError::UndefinedGroup`] if a plugin's group is not in the group
    ///   graph.
    /// - [`SortError::IncompatiblePlugins`] if two present plugins are declared
    ///   incompatible.
    /// - [`SortError::CyclicPlugins`] for the first layer that closes a cycle.
    pub fn build(self) -> Result<LoadOrderGraph, SortError> {
        let index = self.index_plugins()?;
        let plugin_groups = self.resolve_groups()?;
        self.check_incompatibilities()?;

        let names = self.facts.iter().map(|fact| fact.name().clone()).collect();
        let mut graph = LoadOrderGraph::with_vertices(names, index);

        for layer in EdgeKind::LAYERS {
            self.sink.record(&SortEvent::LayerStarted { layer });
            let mut tx = LayerTransaction::begin(
                &graph,
                layer,
                self.facts,
                self.sink,
                self.config.edge_events,
            );

            match layer {
                EdgeKind::MasterFlag => self.add_master_flag_edges(&mut tx),
                EdgeKind::MasterDependency => self.add_master_edges(&mut tx, &graph),
                EdgeKind::Group => self.add_group_edges(&mut tx, &graph, &plugin_groups),
                EdgeKind::Requirement => self.add_requirement_edges(&mut tx, &graph),
                EdgeKind::Overlap => self.add_overlap_edges(&mut tx),
                EdgeKind::TieBreak => add_tie_break_edges(&mut tx),
            }

            self.commit(&mut graph, tx)?;
        }

        Ok(graph)
    }

    fn index_plugins(&self) -> Result<HashMap<PluginName, usize>, SortError> {
        let mut index = HashMap::with_capacity(self.facts.len());
        for (position, fact) in self.facts.iter().enumerate() {
            if index.insert(fact.name().clone(), position).is_some() {
                return Err(SortError::DuplicatePlugin {
                    name: fact.name().clone(),
                });
            }
        }
        Ok(index)
    }

    fn resolve_groups(&self) -> Result<Vec<usize>, SortError> {
        self.facts
            .iter()
            .map(|fact| {
                self.groups
                    .index_of(fact.group())
                    .ok_or_else(|| SortError::UndefinedGroup {
                        plugin: fact.name().clone(),
                        group: fact.group().to_string(),
                    })
            })
            .collect()
    }

    /// Reports the first pair by input position where either plugin declares
    /// the other incompatible, naming the declaring plugin first.
    fn check_incompatibilities(&self) -> Result<(), SortError> {
        for (position, fact) in self.facts.iter().enumerate() {
            for other in &self.facts[position + 1..] {
                if !fact.is_incompatible_with(other) {
                    continue;
                }
                let (plugin, incompatible) = if fact.incompatibilities().contains(other.name()) {
                    (fact, other)
                } else {
                    (other, fact)
                };
                return Err(SortError::IncompatiblePlugins {
                    plugin: plugin.name().clone(),
                    incompatible: incompatible.name().clone(),
                });
            }
        }
        Ok(())
    }

    fn add_master_flag_edges(&self, tx: &mut LayerTransaction<'_>) {
        for (source, master) in self.facts.iter().enumerate() {
            if !master.is_master() {
                continue;
            }
            for (target, plugin) in self.facts.iter().enumerate() {
                if !plugin.is_master() {
                    tx.stage(source, target);
                }
            }
        }
    }

    fn add_master_edges(&self, tx: &mut LayerTransaction<'_>, graph: &LoadOrderGraph) {
        for (target, fact) in self.facts.iter().enumerate() {
            for master in fact.masters() {
                if let Some(source) = graph.vertex_index(master) {
                    tx.stage(source, target);
                }
            }
        }
    }

    /// Paths are checked against the graph as committed before this layer.
    /// A pair already ordered in either direction gets no group edge, so only
    /// cycles formed by several group edges together can reject the layer.
    fn add_group_edges(
        &self,
        tx: &mut LayerTransaction<'_>,
        graph: &LoadOrderGraph,
        plugin_groups: &[usize],
    ) {
        for (target, &target_group) in plugin_groups.iter().enumerate() {
            for (source, &source_group) in plugin_groups.iter().enumerate() {
                if source_group == target_group
                    || !self.groups.must_load_after_index(target_group, source_group)
                {
                    continue;
                }

                if graph.has_path(source, target) || graph.has_path(target, source) {
                    tx.skip(source, target);
                } else {
                    tx.stage(source, target);
                }
            }
        }
    }

    fn add_requirement_edges(&self, tx: &mut LayerTransaction<'_>, graph: &LoadOrderGraph) {
        for (target, fact) in self.facts.iter().enumerate() {
            for file in fact.requirements().iter().chain(fact.load_after()) {
                if let Some(source) = graph.vertex_index(file) {
                    tx.stage(source, target);
                }
            }
        }
    }

    fn add_overlap_edges(&self, tx: &mut LayerTransaction<'_>) {
        let policy = self.config.overlap_policy;

        for (first, plugin) in self.facts.iter().enumerate() {
            for (second, other) in self.facts.iter().enumerate().skip(first + 1) {
                if !self.overlap.overlaps(plugin, other) {
                    continue;
                }

                let (count, other_count) =
                    (plugin.override_record_count(), other.override_record_count());
                let (source, target) =
                    if count == other_count || policy.loads_first(count, other_count) {
                        (first, second)
                    } else {
                        (second, first)
                    };

                if tx.reach.orders(first, second) {
                    tx.skip(source, target);
                } else {
                    tx.stage_unordered(source, target);
                }
            }
        }
    }

    fn commit(
        &self,
        graph: &mut LoadOrderGraph,
        tx: LayerTransaction<'_>,
    ) -> Result<(), SortError> {
        let layer = tx.layer;

        if let Some(cycle) = find_cycle(&tx.adjacency) {
            let steps = self.cycle_steps(graph, &cycle, layer);
            self.sink.record(&SortEvent::LayerRejected {
                layer,
                cycle: steps.clone(),
            });
            if layer == EdgeKind::Group {
                self.explain_group_edges(&steps);
            }
            return Err(SortError::CyclicPlugins {
                layer,
                cycle: steps,
            });
        }

        graph.reach = if tx.closure_stale {
            Reachability::of_acyclic(&tx.adjacency)
        } else {
            tx.reach
        };
        graph.adjacency = tx.adjacency;

        let edges_added = tx.staged.len();
        for edge in tx.staged {
            graph.kinds.insert((edge.source, edge.target), edge.kind);
            graph.edges.push(edge);
        }

        self.sink.record(&SortEvent::LayerCommitted { layer, edges_added });
        Ok(())
    }

    /// Edges not yet in the committed graph belong to the rejected layer.
    fn cycle_steps(
        &self,
        graph: &LoadOrderGraph,
        cycle: &[usize],
        layer: EdgeKind,
    ) -> Vec<CycleStep> {
        cycle
            .iter()
            .enumerate()
            .map(|(position, &vertex)| {
                let next = cycle[(position + 1) % cycle.len()];
                CycleStep {
                    plugin: self.facts[vertex].name().clone(),
                    edge_to_next: graph.edge_kind(vertex, next).unwrap_or(layer),
                }
            })
            .collect()
    }

    fn explain_group_edges(&self, steps: &[CycleStep]) {
        for (position, step) in steps.iter().enumerate() {
            if step.edge_to_next != EdgeKind::Group {
                continue;
            }
            let next = &steps[(position + 1) % steps.len()].plugin;
            let (Some(source), Some(target)) = (self.fact(&step.plugin), self.fact(next)) else {
                continue;
            };
            let Some(groups) = self.groups.path(source.group(), target.group()) else {
                continue;
            };

            self.sink.record(&SortEvent::GroupPathExplained {
                source: source.name().clone(),
                target: target.name().clone(),
                groups: groups.into_iter().map(str::to_string).collect(),
            });
        }
    }

    fn fact(&self, name: &PluginName) -> Option<&'a PluginFact> {
        self.facts.iter().find(|fact| fact.name() == name)
    }
}

/// Orders every remaining unordered pair by input position.
///
/// Pairs are visited as `(i, j)` with `i` ascending, then `j` ascending, and
/// `i -> j` is added when neither reaches the other. Descendants of `i` are
/// tracked in one packed row while scanning its `j`s and merged into `i`'s
/// ancestors once the row is done.
fn add_tie_break_edges(tx: &mut LayerTransaction<'_>) {
    let vertex_count = tx.adjacency.vertex_count();

    for earlier in 0..vertex_count {
        let mut reached = tx.reach.descendants(earlier);
        let mut added = false;

        for later in earlier + 1..vertex_count {
            if row_contains(&reached, later) || tx.reach.reaches(later, earlier) {
                continue;
            }
            if tx.push(earlier, later) {
                for (dst, src) in reached.iter_mut().zip(tx.reach.row_with_self(later)) {
                    *dst |= src;
                }
                added = true;
            }
        }

        if added {
            for vertex in 0..vertex_count {
                if vertex == earlier || tx.reach.reaches(vertex, earlier) {
                    tx.reach.merge_words(vertex, &reached);
                }
            }
        }
    }
}
