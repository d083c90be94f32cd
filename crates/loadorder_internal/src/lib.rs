//! # loadorder Internal Library
//!
//! Re-exports the core loadorder crates for convenience.

/// Layer 1: Plugin facts and group definitions.
pub use loadorder_metadata;

/// Layer 2: Constraint graph construction and sorting.
pub use loadorder_graph;

/// Tracing subscriber setup.
pub use loadorder_tracing;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use loadorder_graph::prelude::*;
    pub use loadorder_metadata::prelude::*;
    pub use loadorder_tracing::{TracingFormat, TracingSetup};
}
