//! Deterministic plugin load order sorting.
//!
//! Given facts about every installed plugin (master flags, masters, groups,
//! requirements, load-after hints, record overlaps) and a set of group
//! definitions, `loadorder` computes one load order that honours all of them,
//! or reports exactly which constraints contradict each other.
//!
//! # Example
//!
//! ```
//! use loadorder::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let facts = [
//!     PluginFact::new(PluginName::new("Patch.esp")?)
//!         .with_group("late")
//!         .with_load_after([PluginName::new("Mod.esp")?]),
//!     PluginFact::new(PluginName::new("Mod.esp")?),
//!     PluginFact::new(PluginName::new("Skyrim.esm")?).with_master_flag(true),
//! ];
//! let groups = [Group::new("late")?.with_after_groups(["default"])];
//!
//! let order = PluginSorter::new().sort(&facts, &groups)?;
//! let order: Vec<&str> = order.iter().map(|name| name.as_str()).collect();
//! assert_eq!(order, ["Skyrim.esm", "Mod.esp", "Patch.esp"]);
//! # Ok(())
//! # }
//! ```

pub use loadorder_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use loadorder_internal::prelude::*;
}
