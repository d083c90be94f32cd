//! Helpers for arranging facts into a current load order.
//!
//! The sorter treats input position as the tie-break rank. Upstream code that
//! knows the game's current load order can use [`arrange_by_load_order`] to
//! produce that input sequence, including for plugins that are installed but
//! not yet positioned.

use core::cmp::Ordering;

use hashbrown::HashMap;

use crate::name::PluginName;
use crate::plugin::PluginFact;

/// Reorders `facts` to follow `current_load_order`.
///
/// Plugins present in the current load order come first, by position. The
/// remaining plugins follow, ordered by basename and then by extension, both
/// compared case-insensitively. The sort is stable, so duplicate names keep
/// their relative order.
///
/// # Example
///
/// ```
/// use loadorder_metadata::{arrange_by_load_order, PluginFact, PluginName};
///
/// let name = |s: &str| PluginName::new(s).unwrap();
/// let facts = vec![
///     PluginFact::new(name("New.esp")),
///     PluginFact::new(name("B.esp")),
///     PluginFact::new(name("A.esp")),
/// ];
///
/// let arranged = arrange_by_load_order(facts, &[name("b.esp"), name("A.esp")]);
/// let names: Vec<_> = arranged.iter().map(|f| f.name().as_str()).collect();
/// assert_eq!(names, ["B.esp", "A.esp", "New.esp"]);
/// ```
#[must_use]
pub fn arrange_by_load_order(
    mut facts: Vec<PluginFact>,
    current_load_order: &[PluginName],
) -> Vec<PluginFact> {
    let mut positions: HashMap<&PluginName, usize> = HashMap::new();
    for (index, name) in current_load_order.iter().enumerate() {
        positions.entry(name).or_insert(index);
    }

    facts.sort_by(|a, b| {
        match (positions.get(a.name()), positions.get(b.name())) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => compare_unpositioned(a.name(), b.name()),
        }
    });

    facts
}

/// Orders two names by basename, then by extension.
///
/// Comparing basenames first keeps `Foo.esm` and `Foo.esp` adjacent.
fn compare_unpositioned(a: &PluginName, b: &PluginName) -> Ordering {
    let (a_base, a_ext) = a.folded_parts();
    let (b_base, b_ext) = b.folded_parts();
    a_base.cmp(b_base).then_with(|| a_ext.cmp(b_ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> PluginName {
        PluginName::new(s).unwrap()
    }

    fn names(facts: &[PluginFact]) -> Vec<&str> {
        facts.iter().map(|f| f.name().as_str()).collect()
    }

    #[test]
    fn positioned_plugins_come_first() {
        let facts = vec![
            PluginFact::new(name("Z.esp")),
            PluginFact::new(name("C.esp")),
            PluginFact::new(name("A.esp")),
        ];

        let arranged = arrange_by_load_order(facts, &[name("c.esp")]);
        assert_eq!(names(&arranged), ["C.esp", "A.esp", "Z.esp"]);
    }

    #[test]
    fn unpositioned_plugins_compare_basename_before_extension() {
        let facts = vec![
            PluginFact::new(name("Foo.esp")),
            PluginFact::new(name("Foo-Patch.esp")),
            PluginFact::new(name("Foo.esm")),
        ];

        let arranged = arrange_by_load_order(facts, &[]);
        assert_eq!(names(&arranged), ["Foo.esm", "Foo.esp", "Foo-Patch.esp"]);
    }

    #[test]
    fn repeated_load_order_entries_use_first_position() {
        let facts = vec![PluginFact::new(name("A.esp")), PluginFact::new(name("B.esp"))];

        let arranged = arrange_by_load_order(facts, &[name("B.esp"), name("A.esp"), name("B.esp")]);
        assert_eq!(names(&arranged), ["B.esp", "A.esp"]);
    }
}
