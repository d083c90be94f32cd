//! Edge types for the plugin graph.
//!
//! An edge `source -> target` means the source plugin loads before the target
//! plugin. Every edge records which constraint layer produced it.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The constraint responsible for an edge.
///
/// Variants are listed in layer order: edges of an earlier kind are added and
/// validated before any edge of a later kind is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Master-flagged plugins load before non-master plugins.
    MasterFlag,
    /// A plugin's declared masters load before it.
    MasterDependency,
    /// Plugins in a prerequisite group load before plugins in a dependent group.
    Group,
    /// Required and "load after" files load before the declaring plugin.
    Requirement,
    /// Overlapping plugins are ordered by override record count.
    Overlap,
    /// Otherwise unordered plugins keep their input order.
    TieBreak,
}

impl EdgeKind {
    /// All kinds, in the order their layers are applied.
    pub const LAYERS: [EdgeKind; 6] = [
        EdgeKind::MasterFlag,
        EdgeKind::MasterDependency,
        EdgeKind::Group,
        EdgeKind::Requirement,
        EdgeKind::Overlap,
        EdgeKind::TieBreak,
    ];

    /// Returns a human-readable description of the constraint.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            EdgeKind::MasterFlag => "Master Flag",
            EdgeKind::MasterDependency => "Master",
            EdgeKind::Group => "Group",
            EdgeKind::Requirement => "Requirement",
            EdgeKind::Overlap => "Overlap",
            EdgeKind::TieBreak => "Tie Break",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A directed edge between two plugin vertices.
///
/// Indices refer to positions in the graph's vertex list, which is the input
/// order of the sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// The constraint that produced this edge.
    pub kind: EdgeKind,
    /// Index of the plugin that loads earlier.
    pub source: usize,
    /// Index of the plugin that loads later.
    pub target: usize,
}

impl Edge {
    /// Creates a new edge.
    #[must_use]
    pub fn new(kind: EdgeKind, source: usize, target: usize) -> Self {
        Self {
            kind,
            source,
            target,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.source, self.kind, self.target)
    }
}
