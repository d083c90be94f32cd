//! Case-insensitive plugin identifiers.
//!
//! Plugin file names are compared the way the game's file system compares
//! them: without regard to case. [`PluginName`] keeps the original spelling for
//! display and a folded copy for equality, hashing and ordering.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// A case-insensitive plugin file name.
///
/// Internally uses `Arc<str>` for cheap cloning, since names are copied into
/// graph vertices, edges and error payloads.
///
/// # Example
///
/// ```
/// use loadorder_metadata::PluginName;
///
/// let a = PluginName::new("Skyrim.esm").unwrap();
/// let b = PluginName::new("SKYRIM.ESM").unwrap();
///
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "Skyrim.esm");
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PluginName {
    display: Arc<str>,
    folded: Arc<str>,
}

impl PluginName {
    /// Creates a plugin name, rejecting empty or whitespace-only input.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::EmptyPluginName`] if `name` has no visible
    /// characters.
    pub fn new(name: impl Into<String>) -> Result<Self, MetadataError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MetadataError::EmptyPluginName);
        }

        let folded = name.to_lowercase();
        Ok(Self {
            display: name.into(),
            folded: folded.into(),
        })
    }

    /// Returns the name as originally spelled.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Returns the case-folded form used for comparisons.
    #[must_use]
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Splits the folded name into its basename and extension.
    ///
    /// The extension includes the leading dot. Names without a dot have an
    /// empty extension.
    #[must_use]
    pub fn folded_parts(&self) -> (&str, &str) {
        match self.folded.rfind('.') {
            Some(dot) => self.folded.split_at(dot),
            None => (&self.folded, ""),
        }
    }
}

impl PartialEq for PluginName {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for PluginName {}

impl Hash for PluginName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl PartialOrd for PluginName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PluginName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded.cmp(&other.folded)
    }
}

impl fmt::Debug for PluginName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.display)
    }
}

impl fmt::Display for PluginName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl TryFrom<String> for PluginName {
    type Error = MetadataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PluginName {
    type Error = MetadataError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PluginName> for String {
    fn from(name: PluginName) -> Self {
        name.display.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[test]
    fn names_compare_case_insensitively() {
        let a = PluginName::new("Dawnguard.esm").unwrap();
        let b = PluginName::new("dawnguard.ESM").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert_eq!([a.clone(), b].into_iter().collect::<HashSet<_>>().len(), 1);
        assert_eq!(a.to_string(), "Dawnguard.esm");
    }

    #[test]
    fn empty_names_are_rejected() {
        assert_eq!(PluginName::new(""), Err(MetadataError::EmptyPluginName));
        assert_eq!(PluginName::new("   "), Err(MetadataError::EmptyPluginName));
    }

    #[test]
    fn folded_parts_split_on_last_dot() {
        let name = PluginName::new("My.Mod.ESP").unwrap();
        assert_eq!(name.folded_parts(), ("my.mod", ".esp"));

        let bare = PluginName::new("README").unwrap();
        assert_eq!(bare.folded_parts(), ("readme", ""));
    }
}
