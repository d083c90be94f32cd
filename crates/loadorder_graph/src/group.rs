//! The group graph.
//!
//! Groups form a directed graph whose edges point from a prerequisite group to
//! each group that loads after it. [`GroupGraph`] collects definitions;
//! [`GroupGraph::validate`] checks references and acyclicity and produces a
//! [`ValidatedGroupGraph`] that answers precedence queries for the plugin
//! graph builder.

use hashbrown::HashMap;
use loadorder_metadata::{DEFAULT_GROUP, Group};

use crate::adjacency::{Adjacency, Reachability};
use crate::cycle::find_cycle;
use crate::error::SortError;

/// Collection of group definitions, not yet validated.
///
/// The default group is always registered first.
///
/// # Example
///
/// ```
/// use loadorder_graph::GroupGraph;
/// use loadorder_metadata::Group;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut groups = GroupGraph::new();
/// groups.add_group(Group::new("Combat")?.with_after_groups(["default"]));
/// groups.add_group(Group::new("Late")?.with_after_groups(["Combat"]));
///
/// let groups = groups.validate()?;
/// assert!(groups.must_load_after("Late", "default"));
/// assert!(!groups.must_load_after("default", "Late"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GroupGraph {
    groups: Vec<Group>,
    index: HashMap<String, usize>,
}

impl Default for GroupGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupGraph {
    /// Creates a graph containing only the default group.
    #[must_use]
    pub fn new() -> Self {
        let mut index = HashMap::new();
        index.insert(DEFAULT_GROUP.to_string(), 0);
        Self {
            groups: vec![Group::default()],
            index,
        }
    }

    /// Creates a graph from a sequence of definitions.
    #[must_use]
    pub fn from_groups(groups: impl IntoIterator<Item = Group>) -> Self {
        let mut graph = Self::new();
        for group in groups {
            graph.add_group(group);
        }
        graph
    }

    /// Registers a group.
    ///
    /// Registering a name again keeps its position and extends its
    /// after-groups with any new entries. The first non-empty description is
    /// kept.
    pub fn add_group(&mut self, group: Group) {
        let Some(&position) = self.index.get(group.name()) else {
            self.index.insert(group.name().to_string(), self.groups.len());
            self.groups.push(group);
            return;
        };

        let existing = &self.groups[position];
        let mut after_groups = existing.after_groups().to_vec();
        for after in group.after_groups() {
            if !after_groups.contains(after) {
                after_groups.push(after.clone());
            }
        }
        let description = if existing.description().is_empty() {
            group.description()
        } else {
            existing.description()
        };

        let merged = existing
            .clone()
            .with_description(description.to_string())
            .with_after_groups(after_groups);
        self.groups[position] = merged;
    }

    /// Returns the number of registered groups, including the default group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Always `false`: the default group is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the registered groups in registration order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Returns the group registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Group> {
        self.index.get(name).map(|&position| &self.groups[position])
    }

    /// Checks the graph and freezes it for queries.
    ///
    /// # Errors
    ///
    /// - [`SortError::UndefinedAfterGroup`] if a group loads after a group that
    ///   was never registered. Groups are checked in registration order.
    /// - [`SortError::CyclicGroups`] if the "load after" relation is cyclic.
    pub fn validate(&self) -> Result<ValidatedGroupGraph, SortError> {
        let mut adjacency = Adjacency::new(self.groups.len());

        for (dependent, group) in self.groups.iter().enumerate() {
            for after in group.after_groups() {
                let Some(&prerequisite) = self.index.get(after.as_str()) else {
                    return Err(SortError::UndefinedAfterGroup {
                        group: group.name().to_string(),
                        after_group: after.clone(),
                    });
                };
                adjacency.add_edge(prerequisite, dependent);
            }
        }

        if let Some(cycle) = find_cycle(&adjacency) {
            return Err(SortError::CyclicGroups {
                cycle: cycle
                    .into_iter()
                    .map(|index| self.groups[index].name().to_string())
                    .collect(),
            });
        }

        let closure = Reachability::of_acyclic(&adjacency);
        Ok(ValidatedGroupGraph {
            names: self
                .groups
                .iter()
                .map(|group| group.name().to_string())
                .collect(),
            index: self.index.clone(),
            adjacency,
            closure,
        })
    }
}

/// An acyclic group graph with every reference resolved.
#[derive(Debug, Clone)]
pub struct ValidatedGroupGraph {
    names: Vec<String>,
    index: HashMap<String, usize>,
    adjacency: Adjacency,
    closure: Reachability,
}

impl ValidatedGroupGraph {
    /// Returns whether every plugin in `group` must load after every plugin in
    /// `other`, directly or transitively.
    ///
    /// Unknown names and `group == other` return `false`.
    #[must_use]
    pub fn must_load_after(&self, group: &str, other: &str) -> bool {
        match (self.index.get(group), self.index.get(other)) {
            (Some(&dependent), Some(&prerequisite)) => self.closure.reaches(prerequisite, dependent),
            _ => false,
        }
    }

    /// Index-based form of [`must_load_after`](Self::must_load_after).
    pub(crate) fn must_load_after_index(&self, group: usize, other: usize) -> bool {
        self.closure.reaches(other, group)
    }

    /// Returns every group that `group` transitively loads after, in
    /// registration order. Unknown names yield an empty list.
    #[must_use]
    pub fn transitive_after_groups(&self, group: &str) -> Vec<&str> {
        let Some(&dependent) = self.index.get(group) else {
            return Vec::new();
        };

        (0..self.names.len())
            .filter(|&prerequisite| self.closure.reaches(prerequisite, dependent))
            .map(|prerequisite| self.names[prerequisite].as_str())
            .collect()
    }

    /// Returns the shortest chain of groups from prerequisite `from` to
    /// dependent `to`, both ends included.
    #[must_use]
    pub fn path(&self, from: &str, to: &str) -> Option<Vec<&str>> {
        let (&from, &to) = (self.index.get(from)?, self.index.get(to)?);
        let path = self.adjacency.shortest_path(from, to)?;
        Some(path.into_iter().map(|index| self.names[index].as_str()).collect())
    }

    /// Returns the index of `group`, if registered.
    #[must_use]
    pub fn index_of(&self, group: &str) -> Option<usize> {
        self.index.get(group).copied()
    }

    /// Returns the name of the group at `index`.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Returns the number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`: the default group is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
