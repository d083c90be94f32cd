//! Group definitions.
//!
//! A group is a named bucket of plugins. Groups declare which other groups
//! they must load after, which expresses coarse ordering without listing
//! per-plugin edges.

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// Name of the group every plugin without an explicit group belongs to.
pub const DEFAULT_GROUP: &str = "default";

/// A named group with "must load after" relations to other groups.
///
/// Group names are compared exactly (unlike plugin names).
///
/// # Example
///
/// ```
/// use loadorder_metadata::Group;
///
/// let late = Group::new("Late Loaders")
///     .unwrap()
///     .with_description("Patches that must win conflicts")
///     .with_after_groups(["default", "Combat"]);
///
/// assert_eq!(late.name(), "Late Loaders");
/// assert_eq!(late.after_groups().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GroupDef")]
pub struct Group {
    name: String,
    description: String,
    after_groups: Vec<String>,
}

impl Group {
    /// Creates a group with no description and no prerequisites.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::EmptyGroupName`] if `name` has no visible
    /// characters.
    pub fn new(name: impl Into<String>) -> Result<Self, MetadataError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MetadataError::EmptyGroupName);
        }

        Ok(Self {
            name,
            description: String::new(),
            after_groups: Vec::new(),
        })
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the groups this group must load after.
    ///
    /// Duplicate entries are dropped, keeping the first occurrence.
    #[must_use]
    pub fn with_after_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.after_groups.clear();
        for group in groups {
            let group = group.into();
            if !self.after_groups.contains(&group) {
                self.after_groups.push(group);
            }
        }
        self
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, which may be empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the names of the groups this group directly loads after.
    #[must_use]
    pub fn after_groups(&self) -> &[String] {
        &self.after_groups
    }

    /// Returns whether this is the implicit default group.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_GROUP
    }
}

impl Default for Group {
    fn default() -> Self {
        Self {
            name: DEFAULT_GROUP.to_string(),
            description: String::new(),
            after_groups: Vec::new(),
        }
    }
}

/// Unvalidated wire form of a [`Group`].
#[derive(Deserialize)]
struct GroupDef {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    after_groups: Vec<String>,
}

impl TryFrom<GroupDef> for Group {
    type Error = MetadataError;

    fn try_from(def: GroupDef) -> Result<Self, Self::Error> {
        Ok(Group::new(def.name)?
            .with_description(def.description)
            .with_after_groups(def.after_groups))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_group_has_no_prerequisites() {
        let group = Group::default();
        assert!(group.is_default());
        assert!(group.after_groups().is_empty());
    }

    #[test]
    fn after_groups_are_deduplicated() {
        let group = Group::new("b").unwrap().with_after_groups(["a", "a", "c"]);
        assert_eq!(group.after_groups(), ["a", "c"]);
    }

    #[test]
    fn empty_group_name_is_rejected() {
        assert_eq!(Group::new(" "), Err(MetadataError::EmptyGroupName));
    }

    #[test]
    fn deserializes_with_defaults() {
        let group: Group = serde_json::from_str(r#"{"name": "Combat"}"#).unwrap();
        assert_eq!(group.name(), "Combat");
        assert!(group.description().is_empty());
        assert!(group.after_groups().is_empty());

        let invalid = serde_json::from_str::<Group>(r#"{"name": ""}"#);
        assert!(invalid.is_err());
    }
}
