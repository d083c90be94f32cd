//! Overlap comparison capability.
//!
//! Whether two plugins override the same records is decided by an
//! [`OverlapComparator`]. The default, [`DeclaredOverlaps`], reads the overlap
//! sets recorded on each [`PluginFact`]. Callers with richer plugin data can
//! inject their own comparator, including a plain closure.

use crate::plugin::PluginFact;

/// Decides whether two plugins override at least one record in common.
///
/// Implementations must be symmetric: `overlaps(a, b) == overlaps(b, a)`.
///
/// # Example
///
/// ```
/// use loadorder_metadata::{OverlapComparator, PluginFact, PluginName};
///
/// // Treat every pair of plugins with override records as overlapping.
/// let comparator = |a: &PluginFact, b: &PluginFact| {
///     a.override_record_count() > 0 && b.override_record_count() > 0
/// };
///
/// let a = PluginFact::new(PluginName::new("A.esp").unwrap()).with_override_record_count(1);
/// let b = PluginFact::new(PluginName::new("B.esp").unwrap()).with_override_record_count(4);
/// assert!(comparator.overlaps(&a, &b));
/// ```
pub trait OverlapComparator {
    /// Returns whether `plugin` and `other` override a common record.
    fn overlaps(&self, plugin: &PluginFact, other: &PluginFact) -> bool;
}

/// Comparator using the overlap sets declared on each fact.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredOverlaps;

impl OverlapComparator for DeclaredOverlaps {
    fn overlaps(&self, plugin: &PluginFact, other: &PluginFact) -> bool {
        plugin.overlaps_with(other)
    }
}

impl<F> OverlapComparator for F
where
    F: Fn(&PluginFact, &PluginFact) -> bool,
{
    fn overlaps(&self, plugin: &PluginFact, other: &PluginFact) -> bool {
        self(plugin, other)
    }
}
