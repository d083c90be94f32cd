//! Tracing subscriber setup for loadorder.
//!
//! The sorter reports diagnostics through `tracing` (via its default
//! `TracingSink`). Applications that do not already install a subscriber can
//! use [`TracingSetup`] to get formatted output with an environment filter.
//!
//! # Example
//!
//! ```
//! use loadorder_tracing::{TracingFormat, TracingSetup};
//! use tracing::Level;
//!
//! TracingSetup::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .with_env_filter("loadorder_graph=trace")
//!     .init();
//!
//! tracing::debug!("Subscriber installed");
//! ```

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingSetup
// ─────────────────────────────────────────────────────────────────────────────

/// Subscriber configuration.
///
/// Serializable so it can live in an application's config file:
///
/// ```
/// use loadorder_tracing::{TracingFormat, TracingSetup};
/// use tracing::Level;
///
/// let setup: TracingSetup = serde_json::from_str(r#"{"level": "debug", "format": "json"}"#).unwrap();
/// assert_eq!(setup.level(), Level::DEBUG);
/// assert_eq!(setup.format(), TracingFormat::Json);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingSetup {
    /// Maximum log level, used when no filter is set or the filter is invalid.
    #[serde(with = "level_name")]
    level: Level,
    /// Output format.
    format: TracingFormat,
    /// Environment filter (e.g., `"loadorder_graph=debug"`).
    env_filter: Option<String>,
    /// Whether to include span events (enter/exit).
    span_events: bool,
}

impl Default for TracingSetup {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingSetup {
    /// Creates a setup with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the configured level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the configured format.
    #[must_use]
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    /// Returns the configured environment filter, if any.
    #[must_use]
    pub fn env_filter(&self) -> Option<&str> {
        self.env_filter.as_deref()
    }

    /// Builds the filter, falling back to the configured level when the
    /// filter string does not parse.
    #[must_use]
    pub fn build_filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        }
    }

    /// Installs the global subscriber.
    ///
    /// Returns `false` if a global subscriber was already installed, in
    /// which case nothing changes.
    pub fn init(&self) -> bool {
        let env_filter = self.build_filter();
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        let installed = match self.format {
            TracingFormat::Pretty => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_span_events(span_events),
                )
                .try_init()
                .is_ok(),
            TracingFormat::Compact => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_span_events(span_events),
                )
                .try_init()
                .is_ok(),
            TracingFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(span_events),
                )
                .try_init()
                .is_ok(),
        };

        if installed {
            tracing::info!(
                level = %self.level,
                format = ?self.format,
                "Tracing initialized"
            );
        }
        installed
    }
}

/// Serializes [`Level`] as its lowercase name.
mod level_name {
    use core::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::Level;

    pub(super) fn serialize<S: Serializer>(level: &Level, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&level.as_str().to_lowercase())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Level, D::Error> {
        let name = String::deserialize(deserializer)?;
        Level::from_str(&name).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_format_default_is_pretty() {
        assert_eq!(TracingFormat::default(), TracingFormat::Pretty);
    }

    #[test]
    fn tracing_setup_default_level_is_info() {
        let setup = TracingSetup::default();
        assert_eq!(setup.level(), Level::INFO);
        assert_eq!(setup.env_filter(), None);
    }

    #[test]
    fn tracing_setup_builders() {
        let setup = TracingSetup::new()
            .with_level(Level::TRACE)
            .with_format(TracingFormat::Json)
            .with_env_filter("loadorder_graph=debug")
            .with_span_events(true);

        assert_eq!(setup.level(), Level::TRACE);
        assert_eq!(setup.format(), TracingFormat::Json);
        assert_eq!(setup.env_filter(), Some("loadorder_graph=debug"));
        assert!(setup.span_events);
    }

    #[test]
    fn invalid_filter_falls_back_to_level() {
        let setup = TracingSetup::new()
            .with_level(Level::WARN)
            .with_env_filter("loadorder_graph=loudest");
        assert_eq!(setup.build_filter().to_string().to_lowercase(), "warn");
    }

    #[test]
    fn setup_round_trips_through_json() {
        let setup = TracingSetup::new()
            .with_level(Level::DEBUG)
            .with_format(TracingFormat::Compact);
        let json = serde_json::to_string(&setup).unwrap();
        assert!(json.contains(r#""level":"debug""#));
        assert_eq!(serde_json::from_str::<TracingSetup>(&json).unwrap(), setup);
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(serde_json::from_str::<TracingSetup>(r#"{"level": "loud"}"#).is_err());
    }

    #[test]
    fn second_init_is_a_no_op() {
        TracingSetup::new().with_format(TracingFormat::Compact).init();
        assert!(!TracingSetup::new().init());
    }
}
