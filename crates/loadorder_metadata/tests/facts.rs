//! Tests for handing facts over from an ingestion layer.
//!
//! Fact batches arrive as serialized data; these tests check the wire format
//! and the arrangement helper used to fix the input order.

use loadorder_metadata::{DEFAULT_GROUP, Group, PluginFact, PluginName, arrange_by_load_order};

fn name(s: &str) -> PluginName {
    PluginName::new(s).expect("valid plugin name")
}

const BATCH: &str = r#"[
    {"name": "Skyrim.esm", "is_master": true},
    {"name": "Dawnguard.esm", "is_master": true, "masters": ["Skyrim.esm"]},
    {
        "name": "Mod.esp",
        "masters": ["dawnguard.esm"],
        "group": "Combat",
        "requirements": ["SKSE.esp"],
        "incompatibilities": ["OldMod.esp"],
        "load_after": ["Other.esp", "other.ESP"],
        "override_record_count": 42,
        "overlaps": ["Other.esp"]
    }
]"#;

#[test]
fn batch_deserializes_with_defaults() {
    let facts: Vec<PluginFact> = serde_json::from_str(BATCH).unwrap();

    assert_eq!(facts.len(), 3);
    assert!(facts[0].is_master());
    assert_eq!(facts[0].group(), DEFAULT_GROUP);
    assert!(facts[0].masters().is_empty());

    let mod_fact = &facts[2];
    assert_eq!(mod_fact.masters(), [name("Dawnguard.esm")]);
    assert_eq!(mod_fact.group(), "Combat");
    assert_eq!(mod_fact.requirements(), [name("skse.esp")]);
    assert_eq!(mod_fact.incompatibilities(), [name("OldMod.esp")]);
    assert_eq!(mod_fact.override_record_count(), 42);
    assert!(mod_fact.overlaps_with(&PluginFact::new(name("OTHER.esp"))));
}

#[test]
fn load_after_entries_keep_first_spelling() {
    let facts: Vec<PluginFact> = serde_json::from_str(BATCH).unwrap();
    let load_after = facts[2].load_after();

    assert_eq!(load_after.len(), 1);
    assert_eq!(load_after[0].as_str(), "Other.esp");
}

#[test]
fn empty_names_are_rejected_on_the_wire() {
    let result = serde_json::from_str::<PluginFact>(r#"{"name": "  "}"#);
    assert!(result.is_err());

    let result = serde_json::from_str::<PluginFact>(r#"{"name": "A.esp", "masters": [""]}"#);
    assert!(result.is_err());
}

#[test]
fn facts_round_trip_through_json() {
    let fact = PluginFact::new(name("Patch.esp"))
        .with_group("Late")
        .with_load_after([name("Base.esp")]);

    let json = serde_json::to_string(&fact).unwrap();
    let back: PluginFact = serde_json::from_str(&json).unwrap();
    assert_eq!(back, fact);
}

#[test]
fn groups_deserialize_from_a_masterlist_section() {
    let groups: Vec<Group> = serde_json::from_str(
        r#"[
            {"name": "Early", "description": "Load first"},
            {"name": "default", "after_groups": ["Early"]},
            {"name": "Late", "after_groups": ["default", "default"]}
        ]"#,
    )
    .unwrap();

    assert_eq!(groups[0].description(), "Load first");
    assert!(groups[1].is_default());
    assert_eq!(groups[2].after_groups(), ["default"]);
}

#[test]
fn arrangement_follows_current_load_order_then_file_names() {
    let facts = vec![
        PluginFact::new(name("Zeta.esp")),
        PluginFact::new(name("alpha.esp")),
        PluginFact::new(name("Alpha.esm")),
        PluginFact::new(name("Skyrim.esm")),
        PluginFact::new(name("Mod.esp")),
    ];
    let current = [name("Skyrim.esm"), name("Mod.esp"), name("Uninstalled.esp")];

    let arranged = arrange_by_load_order(facts, &current);
    let names: Vec<_> = arranged.iter().map(|fact| fact.name().as_str()).collect();

    assert_eq!(
        names,
        ["Skyrim.esm", "Mod.esp", "Alpha.esm", "alpha.esp", "Zeta.esp"]
    );
}
