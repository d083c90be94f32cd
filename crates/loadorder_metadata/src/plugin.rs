//! Per-plugin facts.
//!
//! A [`PluginFact`] is the fully merged view of one plugin: header data
//! (master flag, masters, override count, overlaps) and metadata hints
//! (group, requirements, incompatibilities, load-after entries). Facts are
//! immutable for the duration of one sort.

use serde::{Deserialize, Serialize};

use crate::group::DEFAULT_GROUP;
use crate::name::PluginName;

/// Fully resolved ordering facts for one plugin.
///
/// The position of a fact in the sequence handed to the sorter is its
/// load-order index. That index only breaks ties; it never creates ordering
/// constraints of its own.
///
/// # Example
///
/// ```
/// use loadorder_metadata::{PluginFact, PluginName};
///
/// let name = |s: &str| PluginName::new(s).unwrap();
///
/// let fact = PluginFact::new(name("Patch.esp"))
///     .with_masters([name("Skyrim.esm")])
///     .with_group("Late Loaders")
///     .with_load_after([name("Weapons.esp")])
///     .with_override_record_count(12)
///     .with_overlaps([name("Weapons.esp")]);
///
/// assert_eq!(fact.group(), "Late Loaders");
/// assert!(!fact.is_master());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PluginFactDef")]
pub struct PluginFact {
    name: PluginName,
    is_master: bool,
    masters: Vec<PluginName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    requirements: Vec<PluginName>,
    incompatibilities: Vec<PluginName>,
    load_after: Vec<PluginName>,
    override_record_count: usize,
    overlaps: Vec<PluginName>,
}

impl PluginFact {
    /// Creates a fact for a non-master plugin with no metadata.
    #[must_use]
    pub fn new(name: PluginName) -> Self {
        Self {
            name,
            is_master: false,
            masters: Vec::new(),
            group: None,
            requirements: Vec::new(),
            incompatibilities: Vec::new(),
            load_after: Vec::new(),
            override_record_count: 0,
            overlaps: Vec::new(),
        }
    }

    /// Sets whether the plugin carries the master flag.
    #[must_use]
    pub fn with_master_flag(mut self, is_master: bool) -> Self {
        self.is_master = is_master;
        self
    }

    /// Sets the masters the plugin hard-depends on.
    #[must_use]
    pub fn with_masters(mut self, masters: impl IntoIterator<Item = PluginName>) -> Self {
        self.masters = dedup(masters);
        self
    }

    /// Sets the plugin's group. Plugins without a group belong to
    /// [`DEFAULT_GROUP`].
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the files the plugin requires.
    #[must_use]
    pub fn with_requirements(mut self, files: impl IntoIterator<Item = PluginName>) -> Self {
        self.requirements = dedup(files);
        self
    }

    /// Sets the files the plugin is incompatible with.
    #[must_use]
    pub fn with_incompatibilities(mut self, files: impl IntoIterator<Item = PluginName>) -> Self {
        self.incompatibilities = dedup(files);
        self
    }

    /// Sets the files the plugin must load after.
    #[must_use]
    pub fn with_load_after(mut self, files: impl IntoIterator<Item = PluginName>) -> Self {
        self.load_after = dedup(files);
        self
    }

    /// Sets the number of records the plugin overrides.
    #[must_use]
    pub fn with_override_record_count(mut self, count: usize) -> Self {
        self.override_record_count = count;
        self
    }

    /// Sets the plugins this one overrides records in common with.
    #[must_use]
    pub fn with_overlaps(mut self, plugins: impl IntoIterator<Item = PluginName>) -> Self {
        self.overlaps = dedup(plugins);
        self
    }

    /// Returns the plugin name.
    #[must_use]
    pub fn name(&self) -> &PluginName {
        &self.name
    }

    /// Returns whether the plugin carries the master flag.
    #[must_use]
    pub fn is_master(&self) -> bool {
        self.is_master
    }

    /// Returns the plugin's masters, in declaration order.
    #[must_use]
    pub fn masters(&self) -> &[PluginName] {
        &self.masters
    }

    /// Returns the plugin's group, falling back to [`DEFAULT_GROUP`].
    #[must_use]
    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_GROUP)
    }

    /// Returns whether a group was set explicitly.
    #[must_use]
    pub fn has_explicit_group(&self) -> bool {
        self.group.is_some()
    }

    /// Returns the files the plugin requires.
    #[must_use]
    pub fn requirements(&self) -> &[PluginName] {
        &self.requirements
    }

    /// Returns the files the plugin is incompatible with.
    #[must_use]
    pub fn incompatibilities(&self) -> &[PluginName] {
        &self.incompatibilities
    }

    /// Returns the files the plugin must load after.
    #[must_use]
    pub fn load_after(&self) -> &[PluginName] {
        &self.load_after
    }

    /// Returns the number of records the plugin overrides.
    #[must_use]
    pub fn override_record_count(&self) -> usize {
        self.override_record_count
    }

    /// Returns the plugins this one declares record overlaps with.
    #[must_use]
    pub fn overlaps(&self) -> &[PluginName] {
        &self.overlaps
    }

    /// Returns whether either plugin declares a record overlap with the other.
    #[must_use]
    pub fn overlaps_with(&self, other: &PluginFact) -> bool {
        self.overlaps.contains(&other.name) || other.overlaps.contains(&self.name)
    }

    /// Returns whether either plugin declares the other incompatible.
    #[must_use]
    pub fn is_incompatible_with(&self, other: &PluginFact) -> bool {
        self.incompatibilities.contains(&other.name) || other.incompatibilities.contains(&self.name)
    }
}

/// Wire form of a [`PluginFact`]. Missing collections default to empty.
#[derive(Deserialize)]
struct PluginFactDef {
    name: PluginName,
    #[serde(default)]
    is_master: bool,
    #[serde(default)]
    masters: Vec<PluginName>,
    #[serde(default)]
    group: Option<String>,
    #[serde(default)]
    requirements: Vec<PluginName>,
    #[serde(default)]
    incompatibilities: Vec<PluginName>,
    #[serde(default)]
    load_after: Vec<PluginName>,
    #[serde(default)]
    override_record_count: usize,
    #[serde(default)]
    overlaps: Vec<PluginName>,
}

impl From<PluginFactDef> for PluginFact {
    fn from(def: PluginFactDef) -> Self {
        let fact = PluginFact::new(def.name)
            .with_master_flag(def.is_master)
            .with_masters(def.masters)
            .with_requirements(def.requirements)
            .with_incompatibilities(def.incompatibilities)
            .with_load_after(def.load_after)
            .with_override_record_count(def.override_record_count)
            .with_overlaps(def.overlaps);
        match def.group {
            Some(group) => fact.with_group(group),
            None => fact,
        }
    }
}

fn dedup(names: impl IntoIterator<Item = PluginName>) -> Vec<PluginName> {
    let mut out: Vec<PluginName> = Vec::new();
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}
