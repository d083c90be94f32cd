//! Sort configuration.

use serde::{Deserialize, Serialize};

/// How the overlap layer orders two overlapping, otherwise unordered plugins.
///
/// Plugins with equal override counts always keep their input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// The plugin overriding fewer records loads first, so the more
    /// comprehensive plugin wins conflicts.
    #[default]
    FewerOverridesFirst,
    /// The plugin overriding more records loads first.
    MoreOverridesFirst,
}

impl OverlapPolicy {
    /// Returns whether the plugin with `count` overrides loads before the
    /// plugin with `other_count`, when both counts differ.
    #[must_use]
    pub fn loads_first(self, count: usize, other_count: usize) -> bool {
        match self {
            OverlapPolicy::FewerOverridesFirst => count < other_count,
            OverlapPolicy::MoreOverridesFirst => count > other_count,
        }
    }
}

/// Options for one sort.
///
/// # Example
///
/// ```
/// use loadorder_graph::{OverlapPolicy, SortConfig};
///
/// let config = SortConfig::default()
///     .with_overlap_policy(OverlapPolicy::MoreOverridesFirst)
///     .with_edge_events(false);
///
/// assert!(config.check_uniqueness);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// Ordering rule for the overlap layer.
    pub overlap_policy: OverlapPolicy,
    /// Report consecutive output plugins that no constraint orders.
    pub check_uniqueness: bool,
    /// Emit one diagnostic event per added edge.
    ///
    /// The tie-break layer can add a quadratic number of edges; turn this off
    /// for large inputs.
    pub edge_events: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            overlap_policy: OverlapPolicy::default(),
            check_uniqueness: true,
            edge_events: true,
        }
    }
}

impl SortConfig {
    /// Sets the overlap layer's ordering rule.
    #[must_use]
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// Enables or disables the ambiguous order report.
    #[must_use]
    pub fn with_uniqueness_check(mut self, enabled: bool) -> Self {
        self.check_uniqueness = enabled;
        self
    }

    /// Enables or disables per-edge diagnostic events.
    #[must_use]
    pub fn with_edge_events(mut self, enabled: bool) -> Self {
        self.edge_events = enabled;
        self
    }
}
