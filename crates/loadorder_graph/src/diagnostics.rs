//! Structured diagnostics emitted while sorting.
//!
//! The sorter never logs directly. It reports [`SortEvent`]s to an injected
//! [`DiagnosticSink`]; the default [`TracingSink`] forwards them to `tracing`.
//!
//! # Example
//!
//! ```
//! use loadorder_graph::diagnostics::{DiagnosticSink, RecordingSink, SortEvent};
//!
//! let sink = RecordingSink::new();
//! sink.record(&SortEvent::SortStarted {
//!     plugin_count: 2,
//!     group_count: 1,
//! });
//!
//! assert_eq!(sink.events().len(), 1);
//! ```

use loadorder_metadata::PluginName;
use parking_lot::Mutex;
use tracing::Level;

use crate::edge::EdgeKind;
use crate::error::CycleStep;

/// Unified event enum for everything the sorter reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortEvent {
    // ─────────────────────────────────────────────────────────────────────────
    // Sort-Level Events
    // ─────────────────────────────────────────────────────────────────────────
    /// Emitted before any validation work starts.
    SortStarted {
        /// Number of plugins to sort.
        plugin_count: usize,
        /// Number of group definitions supplied.
        group_count: usize,
    },

    /// Emitted once the group graph is known to be acyclic.
    GroupsValidated {
        /// Number of distinct groups, including the default group.
        group_count: usize,
    },

    /// Emitted after a load order has been produced.
    SortCompleted {
        /// Number of plugins in the load order.
        plugin_count: usize,
        /// Number of edges in the final graph.
        edge_count: usize,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Layer Events
    // ─────────────────────────────────────────────────────────────────────────
    /// Emitted before a layer's edges are staged.
    LayerStarted {
        /// The layer.
        layer: EdgeKind,
    },

    /// Emitted when a layer passed cycle validation and was applied.
    LayerCommitted {
        /// The layer.
        layer: EdgeKind,
        /// Number of edges the layer added.
        edges_added: usize,
    },

    /// Emitted when a layer introduced a cycle and was discarded.
    LayerRejected {
        /// The layer.
        layer: EdgeKind,
        /// The cycle found after staging the layer.
        cycle: Vec<CycleStep>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Edge Events
    // ─────────────────────────────────────────────────────────────────────────
    /// Emitted for each staged edge, if enabled in the config.
    EdgeAdded {
        /// The layer adding the edge.
        kind: EdgeKind,
        /// Plugin loading earlier.
        source: PluginName,
        /// Plugin loading later.
        target: PluginName,
    },

    /// Emitted when a group or overlap edge is not added because the pair is
    /// already ordered.
    EdgeSkipped {
        /// The layer that considered the edge.
        kind: EdgeKind,
        /// Plugin that would have loaded earlier.
        source: PluginName,
        /// Plugin that would have loaded later.
        target: PluginName,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Explanations
    // ─────────────────────────────────────────────────────────────────────────
    /// Emitted for each group edge on a rejected cycle, naming the chain of
    /// groups that forced it.
    GroupPathExplained {
        /// Plugin in the prerequisite group.
        source: PluginName,
        /// Plugin in the dependent group.
        target: PluginName,
        /// Groups from the source's group to the target's group.
        groups: Vec<String>,
    },

    /// Emitted for consecutive plugins in the output that no constraint
    /// orders. Their relative order comes only from the input order.
    AmbiguousOrder {
        /// The plugin placed first.
        earlier: PluginName,
        /// The plugin placed second.
        later: PluginName,
    },
}

/// Receiver for [`SortEvent`]s.
///
/// Sinks are shared across threads, so implementations use interior
/// mutability when they need to store events.
pub trait DiagnosticSink: Send + Sync {
    /// Handles one event.
    fn record(&self, event: &SortEvent);
}

impl SortEvent {
    /// Returns the level [`TracingSink`] logs this event at.
    ///
    /// Edge events are `TRACE`, layer progress and ambiguous orders are
    /// `DEBUG`, start and completion are `INFO`, and rejected layers and their
    /// explanations are `WARN`.
    #[must_use]
    pub fn level(&self) -> Level {
        match self {
            Self::EdgeAdded { .. } | Self::EdgeSkipped { .. } => Level::TRACE,
            Self::GroupsValidated { .. }
            | Self::LayerStarted { .. }
            | Self::LayerCommitted { .. }
            | Self::AmbiguousOrder { .. } => Level::DEBUG,
            Self::SortStarted { .. } | Self::SortCompleted { .. } => Level::INFO,
            Self::LayerRejected { .. } | Self::GroupPathExplained { .. } => Level::WARN,
        }
    }
}

/// Logs through the `tracing` macro matching a runtime [`Level`].
macro_rules! event_at {
    ($level:expr, $($arg:tt)+) => {{
        let level = $level;
        if level == Level::TRACE {
            tracing::trace!($($arg)+);
        } else if level == Level::DEBUG {
            tracing::debug!($($arg)+);
        } else if level == Level::INFO {
            tracing::info!($($arg)+);
        } else if level == Level::WARN {
            tracing::warn!($($arg)+);
        } else {
            tracing::error!($($arg)+);
        }
    }};
}

/// Sink forwarding every event to `tracing`, at [`SortEvent::level`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &SortEvent) {
        let level = event.level();
        match event {
            SortEvent::SortStarted {
                plugin_count,
                group_count,
            } => {
                event_at!(level, plugin_count, group_count, "Sorting plugins");
            }
            SortEvent::GroupsValidated { group_count } => {
                event_at!(level, group_count, "Group graph validated");
            }
            SortEvent::SortCompleted {
                plugin_count,
                edge_count,
            } => {
                event_at!(level, plugin_count, edge_count, "Sorting complete");
            }
            SortEvent::LayerStarted { layer } => {
                event_at!(level, %layer, "Adding edges");
            }
            SortEvent::LayerCommitted { layer, edges_added } => {
                event_at!(level, %layer, edges_added, "Layer committed");
            }
            SortEvent::LayerRejected { layer, cycle } => {
                let cycle: Vec<&str> = cycle.iter().map(|step| step.plugin.as_str()).collect();
                event_at!(level, %layer, ?cycle, "Layer rejected, cycle detected");
            }
            SortEvent::EdgeAdded {
                kind,
                source,
                target,
            } => {
                event_at!(level, %kind, %source, %target, "Edge added");
            }
            SortEvent::EdgeSkipped {
                kind,
                source,
                target,
            } => {
                event_at!(level, %kind, %source, %target, "Edge skipped, already ordered");
            }
            SortEvent::GroupPathExplained {
                source,
                target,
                groups,
            } => {
                event_at!(
                    level,
                    %source,
                    %target,
                    groups = %groups.join(" -> "),
                    "Group edge forced by group chain"
                );
            }
            SortEvent::AmbiguousOrder { earlier, later } => {
                event_at!(
                    level,
                    %earlier,
                    %later,
                    "Relative order is not constrained; using input order"
                );
            }
        }
    }
}

/// Sink discarding every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _event: &SortEvent) {}
}

/// Sink collecting events in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SortEvent>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<SortEvent> {
        self.events.lock().clone()
    }

    /// Removes and returns the recorded events.
    pub fn take(&self) -> Vec<SortEvent> {
        core::mem::take(&mut *self.events.lock())
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, event: &SortEvent) {
        self.events.lock().push(event.clone());
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn record(&self, event: &SortEvent) {
        (**self).record(event);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<S> {
    fn record(&self, event: &SortEvent) {
        (**self).record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.record(&SortEvent::LayerStarted {
            layer: EdgeKind::MasterFlag,
        });
        sink.record(&SortEvent::LayerCommitted {
            layer: EdgeKind::MasterFlag,
            edges_added: 3,
        });

        let events = sink.take();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], SortEvent::LayerCommitted { edges_added: 3, .. }));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn shared_sink_records_through_arc() {
        let sink = std::sync::Arc::new(RecordingSink::new());
        let shared: std::sync::Arc<dyn DiagnosticSink> = sink.clone();
        shared.record(&SortEvent::GroupsValidated { group_count: 1 });
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn ambiguous_orders_are_not_warnings() {
        let name = PluginName::new("A.esp").unwrap();
        let ambiguous = SortEvent::AmbiguousOrder {
            earlier: name.clone(),
            later: name,
        };
        assert_eq!(ambiguous.level(), Level::DEBUG);

        let rejected = SortEvent::LayerRejected {
            layer: EdgeKind::Requirement,
            cycle: Vec::new(),
        };
        assert_eq!(rejected.level(), Level::WARN);
        assert_eq!(
            SortEvent::SortStarted {
                plugin_count: 0,
                group_count: 0,
            }
            .level(),
            Level::INFO
        );
    }

    #[test]
    fn tracing_sink_accepts_every_event() {
        let name = PluginName::new("A.esp").unwrap();
        let events = [
            SortEvent::LayerRejected {
                layer: EdgeKind::Group,
                cycle: vec![CycleStep {
                    plugin: name.clone(),
                    edge_to_next: EdgeKind::Group,
                }],
            },
            SortEvent::GroupPathExplained {
                source: name.clone(),
                target: name.clone(),
                groups: vec!["default".into(), "Late".into()],
            },
            SortEvent::AmbiguousOrder {
                earlier: name.clone(),
                later: name,
            },
        ];
        for event in &events {
            TracingSink.record(event);
        }
    }
}
