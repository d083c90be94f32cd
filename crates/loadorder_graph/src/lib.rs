//! Constraint graph construction and sorting for loadorder (Layer 2).
//!
//! `loadorder_graph` turns a snapshot of plugin facts and group definitions
//! into one deterministic load order, or a structured error explaining why no
//! order exists.
//!
//! # Core Concepts
//!
//! - [`GroupGraph`] - Group definitions, validated into a [`ValidatedGroupGraph`]
//! - [`ConstraintGraphBuilder`] - Adds edges in six priority layers, checking
//!   for cycles after each one
//! - [`LoadOrderGraph`] - The validated plugin graph
//! - [`TopologicalSorter`] - Index-ordered Kahn's algorithm
//! - [`PluginSorter`] - Runs the whole pipeline
//!
//! # Example
//!
//! ```
//! use loadorder_graph::sort_plugins;
//! use loadorder_metadata::{Group, PluginFact, PluginName};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let facts = [
//!     PluginFact::new(PluginName::new("Skyrim.esm")?).with_master_flag(true),
//!     PluginFact::new(PluginName::new("Dawnguard.esm")?)
//!         .with_master_flag(true)
//!         .with_masters([PluginName::new("Skyrim.esm")?]),
//!     PluginFact::new(PluginName::new("Mod.esp")?)
//!         .with_masters([PluginName::new("Dawnguard.esm")?]),
//! ];
//!
//! let order = sort_plugins(&facts, &[] as &[Group])?;
//! let order: Vec<&str> = order.iter().map(|name| name.as_str()).collect();
//! assert_eq!(order, ["Skyrim.esm", "Dawnguard.esm", "Mod.esp"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Layer 1** (`loadorder_metadata`): input model
//! - **Layer 2** (`loadorder_graph`): constraint graph construction and sorting
//!   (this crate)

/// Indexed adjacency lists and reachability.
pub mod adjacency;

/// Sort configuration.
pub mod config;

/// Cycle detection.
pub mod cycle;

/// Structured diagnostics and sinks.
pub mod diagnostics;

/// Edge types.
pub mod edge;

/// Error types.
pub mod error;

/// The plugin constraint graph and its builder.
pub mod graph;

/// The group graph.
pub mod group;

/// The full sorting pipeline.
pub mod pipeline;

/// Topological sorting.
pub mod sort;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::config::{OverlapPolicy, SortConfig};
    pub use crate::diagnostics::{
        DiagnosticSink, NullSink, RecordingSink, SortEvent, TracingSink,
    };
    pub use crate::edge::{Edge, EdgeKind};
    pub use crate::error::{CycleStep, ErrorKind, SortError};
    pub use crate::graph::{ConstraintGraphBuilder, LoadOrderGraph};
    pub use crate::group::{GroupGraph, ValidatedGroupGraph};
    pub use crate::pipeline::{PluginSorter, SharedOverlapComparator, sort_plugins};
    pub use crate::sort::TopologicalSorter;
}

// Re-export key types at crate root for convenience
pub use config::{OverlapPolicy, SortConfig};
pub use diagnostics::{DiagnosticSink, SortEvent};
pub use edge::{Edge, EdgeKind};
pub use error::{CycleStep, ErrorKind, SortError};
pub use graph::{ConstraintGraphBuilder, LoadOrderGraph};
pub use group::{GroupGraph, ValidatedGroupGraph};
pub use pipeline::{PluginSorter, sort_plugins};
pub use sort::TopologicalSorter;
