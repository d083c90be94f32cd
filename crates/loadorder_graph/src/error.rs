//! Error types for group validation, graph construction and sorting.

use core::fmt;

use loadorder_metadata::PluginName;

use crate::edge::EdgeKind;

/// One plugin on a reported cycle, with the kind of edge leading to the next
/// plugin on the cycle. The last step's edge leads back to the first plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStep {
    /// The plugin on the cycle.
    pub plugin: PluginName,
    /// Kind of the edge from this plugin to the next one.
    pub edge_to_next: EdgeKind,
}

impl fmt::Display for CycleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --[{}]-->", self.plugin, self.edge_to_next)
    }
}

/// Failure categories of a sort, independent of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The group "load after" relation is cyclic.
    CyclicGroups,
    /// A constraint layer made the plugin graph cyclic.
    CyclicPlugins,
    /// A plugin or group references a group that does not exist.
    UndefinedGroup,
    /// Two present plugins are declared incompatible.
    IncompatiblePlugins,
    /// The same plugin appears more than once in the input.
    DuplicatePlugin,
    /// The sorter could not order a graph that was validated as acyclic.
    InternalSortInconsistency,
}

/// Errors returned by the sorting pipeline.
///
/// Every variant carries the identifiers needed to explain the failure; cycle
/// variants carry the exact cycle path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    /// The group graph contains a cycle. Raised before any plugin graph work.
    #[error("cyclic interaction detected between groups: {}", .cycle.join(" -> "))]
    CyclicGroups {
        /// Group names on the cycle, in traversal order.
        cycle: Vec<String>,
    },

    /// Adding a layer of edges made the plugin graph cyclic.
    #[error("cyclic interaction detected in {layer} layer: {}", format_steps(.cycle))]
    CyclicPlugins {
        /// The layer whose edges were rejected.
        layer: EdgeKind,
        /// Plugins on the cycle, in traversal order.
        cycle: Vec<CycleStep>,
    },

    /// A plugin belongs to a group that was never defined.
    #[error("plugin \"{plugin}\" belongs to undefined group \"{group}\"")]
    UndefinedGroup {
        /// The plugin naming the group.
        plugin: PluginName,
        /// The missing group.
        group: String,
    },

    /// A group loads after a group that was never defined.
    #[error("group \"{group}\" loads after undefined group \"{after_group}\"")]
    UndefinedAfterGroup {
        /// The group declaring the relation.
        group: String,
        /// The missing group.
        after_group: String,
    },

    /// Two plugins declared incompatible are both present.
    #[error("plugin \"{plugin}\" is incompatible with \"{incompatible}\", which is also present")]
    IncompatiblePlugins {
        /// The plugin declaring the incompatibility.
        plugin: PluginName,
        /// The present plugin it is incompatible with.
        incompatible: PluginName,
    },

    /// A plugin appears more than once in the input sequence.
    #[error("plugin \"{name}\" appears more than once in the input")]
    DuplicatePlugin {
        /// The repeated plugin.
        name: PluginName,
    },

    /// Vertices remained after topological sorting of a validated graph.
    #[error("sorting left {} plugins unresolved: {}", .unresolved.len(), format_names(.unresolved))]
    InternalSortInconsistency {
        /// The plugins that were never emitted.
        unresolved: Vec<PluginName>,
    },
}

impl SortError {
    /// Returns the failure category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SortError::CyclicGroups { .. } => ErrorKind::CyclicGroups,
            SortError::CyclicPlugins { .. } => ErrorKind::CyclicPlugins,
            SortError::UndefinedGroup { .. } | SortError::UndefinedAfterGroup { .. } => {
                ErrorKind::UndefinedGroup
            }
            SortError::IncompatiblePlugins { .. } => ErrorKind::IncompatiblePlugins,
            SortError::DuplicatePlugin { .. } => ErrorKind::DuplicatePlugin,
            SortError::InternalSortInconsistency { .. } => ErrorKind::InternalSortInconsistency,
        }
    }

    /// Returns the plugin names on a plugin cycle, or `None` for other errors.
    #[must_use]
    pub fn cycle_plugins(&self) -> Option<Vec<&PluginName>> {
        match self {
            SortError::CyclicPlugins { cycle, .. } => {
                Some(cycle.iter().map(|step| &step.plugin).collect())
            }
            _ => None,
        }
    }
}

fn format_steps(cycle: &[CycleStep]) -> String {
    let mut out = String::new();
    for step in cycle {
        out.push_str(&step.to_string());
        out.push(' ');
    }
    if let Some(first) = cycle.first() {
        out.push_str(first.plugin.as_str());
    }
    out
}

fn format_names(names: &[PluginName]) -> String {
    names
        .iter()
        .map(PluginName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> PluginName {
        PluginName::new(s).unwrap()
    }

    #[test]
    fn group_cycle_message_lists_groups() {
        let err = SortError::CyclicGroups {
            cycle: vec!["G1".into(), "G2".into()],
        };
        assert_eq!(
            err.to_string(),
            "cyclic interaction detected between groups: G1 -> G2"
        );
        assert_eq!(err.kind(), ErrorKind::CyclicGroups);
    }

    #[test]
    fn plugin_cycle_message_closes_the_loop() {
        let err = SortError::CyclicPlugins {
            layer: EdgeKind::Requirement,
            cycle: vec![
                CycleStep {
                    plugin: name("A.esp"),
                    edge_to_next: EdgeKind::Requirement,
                },
                CycleStep {
                    plugin: name("B.esp"),
                    edge_to_next: EdgeKind::Requirement,
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "cyclic interaction detected in Requirement layer: \
             A.esp --[Requirement]--> B.esp --[Requirement]--> A.esp"
        );
        assert_eq!(
            err.cycle_plugins(),
            Some(vec![&name("A.esp"), &name("B.esp")])
        );
    }

    #[test]
    fn undefined_after_group_shares_kind_with_undefined_group() {
        let err = SortError::UndefinedAfterGroup {
            group: "Late".into(),
            after_group: "Missing".into(),
        };
        assert_eq!(err.kind(), ErrorKind::UndefinedGroup);
        assert_eq!(err.cycle_plugins(), None);
    }
}
