//! Tests for layered graph construction.
//!
//! These tests inspect the [`LoadOrderGraph`] produced by
//! [`ConstraintGraphBuilder`] and the events it reports:
//! - Which layer owns each edge
//! - Redundant group and overlap edges being skipped
//! - Rejected layers leaving no trace
//! - Graph export


use loadorder_graph::diagnostics::{NullSink, RecordingSink, SortEvent};
use loadorder_graph::{
    ConstraintGraphBuilder, Edge, EdgeKind, GroupGraph, LoadOrderGraph, SortConfig, SortError,
};
use loadorder_metadata::{Group, PluginFact};
use test_utils::*;

fn build_with(
    facts: &[PluginFact],
    groups: &[Group],
    sink: &RecordingSink,
) -> Result<LoadOrderGraph, SortError> {
    let groups = GroupGraph::from_groups(groups.iter().cloned()).validate()?;
    ConstraintGraphBuilder::new(facts, &groups)
        .with_sink(sink)
        .build()
}

fn build(facts: &[PluginFact], groups: &[Group]) -> LoadOrderGraph {
    build_with(facts, groups, &RecordingSink::new()).expect("graph builds")
}

// ─────────────────────────────────────────────────────────────────────────────
// Edge ownership
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn every_edge_belongs_to_exactly_one_layer() {
    let facts = [
        master("Skyrim.esm", &[]),
        plugin("A.esp").with_masters(names(&["Skyrim.esm"])),
        plugin("B.esp")
            .with_masters(names(&["Skyrim.esm"]))
            .with_requirements(names(&["A.esp"])),
        plugin("C.esp"),
    ];
    let graph = build(&facts, NO_GROUPS);

    let mut pairs: Vec<_> = graph.edges().iter().map(|e| (e.source, e.target)).collect();
    pairs.sort_unstable();
    pairs.dedup();
    assert_eq!(pairs.len(), graph.edge_count());

    assert_eq!(
        graph.edges_of_kind(EdgeKind::MasterFlag).count(),
        3,
        "Skyrim.esm precedes every other plugin"
    );
    assert_eq!(graph.edges_of_kind(EdgeKind::MasterDependency).count(), 0);
    assert_eq!(graph.edge_kind(1, 2), Some(EdgeKind::Requirement));
}

#[test]
fn edges_are_listed_layer_by_layer() {
    let facts = [
        master("Base.esm", &[]),
        plugin("Late.esp").with_group("late"),
        plugin("Mod.esp").with_load_after(names(&["Other.esp"])),
        plugin("Other.esp"),
    ];
    let graph = build(&facts, &[group("late", &["default"])]);

    let kinds: Vec<_> = graph.edges().iter().map(|edge| edge.kind).collect();
    let mut sorted = kinds.clone();
    sorted.sort();
    assert_eq!(kinds, sorted);
}

#[test]
fn tie_break_completes_a_total_order() {
    let facts = [
        plugin("D.esp"),
        plugin("C.esp").with_load_after(names(&["A.esp"])),
        plugin("B.esp"),
        plugin("A.esp"),
    ];
    let graph = build(&facts, NO_GROUPS);

    for a in 0..facts.len() {
        for b in 0..facts.len() {
            if a != b {
                assert!(
                    graph.has_path(a, b) ^ graph.has_path(b, a),
                    "{a} and {b} must be ordered one way"
                );
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Skipped edges
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn group_edge_already_implied_by_a_master_is_skipped() {
    let facts = [
        plugin("Base.esp"),
        plugin("Patch.esp")
            .with_group("late")
            .with_masters(names(&["Base.esp"])),
    ];
    let sink = RecordingSink::new();
    let graph = build_with(&facts, &[group("late", &["default"])], &sink).unwrap();

    assert_eq!(graph.edges_of_kind(EdgeKind::Group).count(), 0);
    assert!(sink.events().contains(&SortEvent::EdgeSkipped {
        kind: EdgeKind::Group,
        source: name("Base.esp"),
        target: name("Patch.esp"),
    }));
}

#[test]
fn group_edge_against_a_master_is_skipped() {
    let facts = [
        plugin("Base.esp").with_group("late"),
        plugin("Patch.esp").with_masters(names(&["Base.esp"])),
    ];
    let sink = RecordingSink::new();
    let graph = build_with(&facts, &[group("late", &["default"])], &sink).unwrap();

    assert_eq!(graph.edges_of_kind(EdgeKind::Group).count(), 0);
    assert!(graph.loads_before(&name("Base.esp"), &name("Patch.esp")));
    assert!(sink.events().contains(&SortEvent::EdgeSkipped {
        kind: EdgeKind::Group,
        source: name("Patch.esp"),
        target: name("Base.esp"),
    }));
    assert!(sink.events().contains(&SortEvent::LayerCommitted {
        layer: EdgeKind::Group,
        edges_added: 0,
    }));
}

#[test]
fn overlap_between_ordered_plugins_is_skipped() {
    let facts = [
        plugin("A.esp")
            .with_override_record_count(9)
            .with_overlaps(names(&["B.esp"])),
        plugin("B.esp").with_masters(names(&["A.esp"])),
    ];
    let sink = RecordingSink::new();
    let graph = build_with(&facts, NO_GROUPS, &sink).unwrap();

    assert_eq!(graph.edges_of_kind(EdgeKind::Overlap).count(), 0);
    assert!(sink.events().contains(&SortEvent::EdgeSkipped {
        kind: EdgeKind::Overlap,
        source: name("B.esp"),
        target: name("A.esp"),
    }));
}

// ─────────────────────────────────────────────────────────────────────────────
// Rejected layers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn rejected_layer_stops_construction() {
    let facts = [
        plugin("A.esp").with_masters(names(&["B.esp"])),
        plugin("B.esp").with_masters(names(&["A.esp"])),
    ];
    let sink = RecordingSink::new();
    let err = build_with(&facts, NO_GROUPS, &sink).unwrap_err();

    assert!(matches!(
        err,
        SortError::CyclicPlugins {
            layer: EdgeKind::MasterDependency,
            ..
        }
    ));

    let events = sink.events();
    assert!(matches!(
        events.last(),
        Some(SortEvent::LayerRejected {
            layer: EdgeKind::MasterDependency,
            ..
        })
    ));
    assert!(!events.iter().any(|event| matches!(
        event,
        SortEvent::LayerStarted {
            layer: EdgeKind::Group
        }
    )));
}

#[test]
fn edge_events_can_be_disabled() {
    let facts = [plugin("A.esp"), plugin("B.esp"), plugin("C.esp")];
    let groups = GroupGraph::new().validate().unwrap();
    let sink = RecordingSink::new();

    let graph = ConstraintGraphBuilder::new(&facts, &groups)
        .with_config(SortConfig::default().with_edge_events(false))
        .with_sink(&sink)
        .build()
        .unwrap();

    assert_eq!(graph.edge_count(), 3);
    assert!(
        !sink
            .events()
            .iter()
            .any(|event| matches!(event, SortEvent::EdgeAdded { .. }))
    );
    assert!(sink.events().contains(&SortEvent::LayerCommitted {
        layer: EdgeKind::TieBreak,
        edges_added: 3,
    }));
}

// ─────────────────────────────────────────────────────────────────────────────
// Export
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn graph_exports_names_and_kinds() {
    let facts = [
        plugin("Mod.esp").with_masters(names(&["Update.esm"])),
        plugin("Update.esm"),
    ];
    let groups = GroupGraph::new().validate().unwrap();
    let graph = ConstraintGraphBuilder::new(&facts, &groups)
        .with_sink(&NullSink)
        .build()
        .unwrap();

    assert_eq!(graph.vertices(), names(&["Mod.esp", "Update.esm"]));
    assert_eq!(
        graph.edges(),
        [Edge::new(EdgeKind::MasterDependency, 1, 0)]
    );
    assert_eq!(graph.vertex_index(&name("update.esm")), Some(1));
    assert!(graph.loads_before(&name("Update.esm"), &name("Mod.esp")));
    assert!(!graph.loads_before(&name("Mod.esp"), &name("Update.esm")));

    let json = serde_json::to_value(&graph).unwrap();
    assert_eq!(json["edges"][0]["kind"], "MasterDependency");
    assert_eq!(json["vertices"][1], "Update.esm");
}
