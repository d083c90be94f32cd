//! Error types for metadata values.

/// Error constructing a metadata value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    /// A plugin name was empty or only whitespace.
    #[error("plugin names must not be empty")]
    EmptyPluginName,

    /// A group name was empty or only whitespace.
    #[error("group names must not be empty")]
    EmptyGroupName,
}
