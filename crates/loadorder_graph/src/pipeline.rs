//! The full sorting pipeline.
//!
//! [`PluginSorter`] validates groups, builds the constraint graph and sorts it,
//! reporting progress to its diagnostic sink. Each call works on fresh state;
//! nothing is cached between calls.

use std::sync::Arc;

use loadorder_metadata::{DeclaredOverlaps, Group, OverlapComparator, PluginFact, PluginName};

use crate::config::SortConfig;
use crate::diagnostics::{DiagnosticSink, SortEvent, TracingSink};
use crate::error::SortError;
use crate::graph::{ConstraintGraphBuilder, LoadOrderGraph};
use crate::group::GroupGraph;
use crate::sort::TopologicalSorter;

/// Shared overlap comparator held by a [`PluginSorter`].
pub type SharedOverlapComparator = Arc<dyn OverlapComparator + Send + Sync>;

/// Entry point for computing load orders.
///
/// A sorter is cheap to clone and can be shared across threads; every call to
/// [`sort`](Self::sort) is independent.
///
/// # Example
///
/// ```
/// use loadorder_graph::PluginSorter;
/// use loadorder_metadata::{Group, PluginFact, PluginName};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let facts = [
///     PluginFact::new(PluginName::new("Mod.esp")?).with_group("Combat"),
///     PluginFact::new(PluginName::new("Mod2.esp")?),
/// ];
/// let groups = [Group::new("Combat")?.with_after_groups(["default"])];
///
/// let order = PluginSorter::new().sort(&facts, &groups)?;
/// assert_eq!(order[0].as_str(), "Mod2.esp");
/// assert_eq!(order[1].as_str(), "Mod.esp");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PluginSorter {
    config: SortConfig,
    sink: Arc<dyn DiagnosticSink>,
    overlap: SharedOverlapComparator,
}

impl Default for PluginSorter {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for PluginSorter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PluginSorter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PluginSorter {
    /// Creates a sorter with the default config, declared overlaps and
    /// diagnostics sent to `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SortConfig::default(),
            sink: Arc::new(TracingSink),
            overlap: Arc::new(DeclaredOverlaps),
        }
    }

    /// Sets the sort configuration.
    #[must_use]
    pub fn with_config(mut self, config: SortConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Sets the comparator deciding which plugins overlap.
    #[must_use]
    pub fn with_overlap_comparator(mut self, overlap: SharedOverlapComparator) -> Self {
        self.overlap = overlap;
        self
    }

    /// Returns the sort configuration.
    #[must_use]
    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Validates `groups` and builds the constraint graph for `facts`.
    ///
    /// The position of each fact is its tie-break index.
    ///
    /// # Errors
    ///
    /// Group errors ([`SortError::UndefinedAfterGroup`],
    /// [`SortError::CyclicGroups`]) are reported before any plugin is looked
    /// at. See [`ConstraintGraphBuilder::build`] for the rest.
    pub fn build_graph<'g>(
        &self,
        facts: &[PluginFact],
        groups: impl IntoIterator<Item = &'g Group>,
    ) -> Result<LoadOrderGraph, SortError> {
        let groups: Vec<&Group> = groups.into_iter().collect();
        self.sink.record(&SortEvent::SortStarted {
            plugin_count: facts.len(),
            group_count: groups.len(),
        });

        let groups = GroupGraph::from_groups(groups.into_iter().cloned()).validate()?;
        self.sink.record(&SortEvent::GroupsValidated {
            group_count: groups.len(),
        });

        ConstraintGraphBuilder::new(facts, &groups)
            .with_config(self.config.clone())
            .with_overlap_comparator(&*self.overlap)
            .with_sink(&*self.sink)
            .build()
    }

    /// Computes the load order of `facts`.
    ///
    /// Returns every input plugin exactly once. Empty input yields an empty
    /// order, though the groups are still validated.
    ///
    /// # Errors
    ///
    /// Any [`SortError`]; no partial order is ever returned.
    pub fn sort<'g>(
        &self,
        facts: &[PluginFact],
        groups: impl IntoIterator<Item = &'g Group>,
    ) -> Result<Vec<PluginName>, SortError> {
        let graph = self.build_graph(facts, groups)?;

        let order = TopologicalSorter::new()
            .with_sink(&*self.sink)
            .with_uniqueness_check(self.config.check_uniqueness)
            .sort(&graph)?;

        self.sink.record(&SortEvent::SortCompleted {
            plugin_count: order.len(),
            edge_count: graph.edge_count(),
        });
        Ok(order)
    }
}

/// Sorts `facts` with the default [`PluginSorter`].
///
/// # Errors
///
/// See [`PluginSorter::sort`].
pub fn sort_plugins<'g>(
    facts: &[PluginFact],
    groups: impl IntoIterator<Item = &'g Group>,
) -> Result<Vec<PluginName>, SortError> {
    PluginSorter::new().sort(facts, groups)
}
