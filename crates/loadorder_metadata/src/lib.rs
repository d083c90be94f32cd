//! Plugin facts and group definitions for load order sorting (Layer 1).
//!
//! `loadorder_metadata` holds the immutable input model consumed by the
//! sorter. Everything here is produced upstream (plugin parsing, masterlist and
//! userlist merging) and handed over as one snapshot per sort.
//!
//! # Core Concepts
//!
//! - [`PluginName`] - Case-insensitive plugin identifier
//! - [`PluginFact`] - Fully merged facts about one plugin
//! - [`Group`] - Named bucket of plugins with "load after" precedence
//! - [`OverlapComparator`] - Capability deciding whether two plugins override
//!   the same records
//!
//! # Example
//!
//! ```
//! use loadorder_metadata::{Group, PluginFact, PluginName};
//!
//! # fn main() -> Result<(), loadorder_metadata::MetadataError> {
//! let skyrim = PluginFact::new(PluginName::new("Skyrim.esm")?).with_master_flag(true);
//! let dawnguard = PluginFact::new(PluginName::new("Dawnguard.esm")?)
//!     .with_master_flag(true)
//!     .with_masters([PluginName::new("skyrim.esm")?]);
//!
//! assert!(dawnguard.masters().contains(skyrim.name()));
//!
//! let combat = Group::new("Combat")?.with_after_groups(["default"]);
//! assert_eq!(combat.after_groups(), ["default"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Layer 1** (`loadorder_metadata`): input model (this crate)
//! - **Layer 2** (`loadorder_graph`): constraint graph construction and sorting

/// Helpers for arranging facts into a current load order.
pub mod arrange;

/// Error types for invalid metadata values.
pub mod error;

/// Group definitions.
pub mod group;

/// Case-insensitive plugin identifiers.
pub mod name;

/// Overlap comparison capability.
pub mod overlap;

/// Per-plugin facts.
pub mod plugin;

pub use arrange::arrange_by_load_order;
pub use error::MetadataError;
pub use group::{DEFAULT_GROUP, Group};
pub use name::PluginName;
pub use overlap::{DeclaredOverlaps, OverlapComparator};
pub use plugin::PluginFact;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::arrange::arrange_by_load_order;
    pub use crate::error::MetadataError;
    pub use crate::group::{DEFAULT_GROUP, Group};
    pub use crate::name::PluginName;
    pub use crate::overlap::{DeclaredOverlaps, OverlapComparator};
    pub use crate::plugin::PluginFact;
}
