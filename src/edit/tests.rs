//! Tests for the edit-operation engine.

use super::*;
use serde_json::json;

fn base() -> ConfigModel {
    ConfigModel {
        sources: vec![PackageSource::new("a", "http://a")],
        mappings: Vec::new(),
        raw_unknown: None,
    }
}

fn abc() -> ConfigModel {
    ConfigModel {
        sources: vec![
            PackageSource::new("a", "https://a"),
            PackageSource::new("b", "https://b"),
            PackageSource::new("c", "https://c"),
        ],
        mappings: vec![
            PackageSourceMapping::new("c", vec!["C.*".into()]),
            PackageSourceMapping::new("a", vec!["A.*".into()]),
            PackageSourceMapping::new("orphan", vec!["O.*".into()]),
            PackageSourceMapping::new("b", vec!["B.*".into()]),
        ],
        raw_unknown: Some("<configuration />".into()),
    }
}

fn keys(model: &ConfigModel) -> Vec<&str> {
    model.sources.iter().map(|s| s.key.as_str()).collect()
}

fn mapping_keys(model: &ConfigModel) -> Vec<&str> {
    model.mappings.iter().map(|m| m.source_key.as_str()).collect()
}

#[test]
fn test_add_source() {
    let updated = apply_edit_ops(
        &base(),
        &[EditOp::AddSource {
            key: "b".into(),
            url: "http://b".into(),
        }],
    );
    assert_eq!(updated.sources.len(), 2);
    assert!(updated.sources[1].enabled);
}

#[test]
fn test_add_source_first_writer_wins() {
    let updated = apply_edit_ops(
        &base(),
        &[
            EditOp::AddSource {
                key: "b".into(),
                url: "http://first".into(),
            },
            EditOp::AddSource {
                key: "b".into(),
                url: "http://second".into(),
            },
            EditOp::AddSource {
                key: "a".into(),
                url: "http://dup".into(),
            },
        ],
    );
    assert_eq!(keys(&updated), vec!["a", "b"]);
    assert_eq!(updated.source("b").unwrap().url, "http://first");
    assert_eq!(updated.source("a").unwrap().url, "http://a");
}

#[test]
fn test_toggle_source() {
    let updated = apply_edit_ops(
        &base(),
        &[EditOp::ToggleSource {
            key: "a".into(),
            enabled: false,
        }],
    );
    assert!(!updated.sources[0].enabled);

    let unchanged = apply_edit_ops(
        &base(),
        &[EditOp::ToggleSource {
            key: "missing".into(),
            enabled: false,
        }],
    );
    assert_eq!(unchanged, base());
}

#[test]
fn test_update_source_rename_and_url() {
    let updated = apply_edit_ops(
        &base(),
        &[EditOp::UpdateSource {
            key: "a".into(),
            new_key: Some("c".into()),
            url: Some("http://a2".into()),
        }],
    );
    assert!(updated.source("c").is_some());
    assert_eq!(updated.sources[0].url, "http://a2");
}

#[test]
fn test_update_source_rename_cascades_to_mappings() {
    let mut model = base();
    model.mappings.push(PackageSourceMapping::new("a", vec!["A.*".into()]));

    let updated = apply_edit_ops(
        &model,
        &[EditOp::UpdateSource {
            key: "a".into(),
            new_key: Some("c".into()),
            url: None,
        }],
    );
    assert_eq!(mapping_keys(&updated), vec!["c"]);
    assert!(updated.mappings.iter().all(|m| m.source_key != "a"));
    assert_eq!(updated.sources[0].url, "http://a");
}

#[test]
fn test_update_source_collision_is_skipped() {
    let model = abc();
    let updated = apply_edit_ops(
        &model,
        &[EditOp::UpdateSource {
            key: "a".into(),
            new_key: Some("b".into()),
            url: Some("https://changed".into()),
        }],
    );
    assert_eq!(updated, model);
}

#[test]
fn test_update_source_unknown_key_is_skipped() {
    let updated = apply_edit_ops(
        &base(),
        &[EditOp::UpdateSource {
            key: "zzz".into(),
            new_key: None,
            url: Some("https://x".into()),
        }],
    );
    assert_eq!(updated, base());
}

#[test]
fn test_delete_source() {
    let updated = apply_edit_ops(&base(), &[EditOp::DeleteSource { key: "a".into() }]);
    assert_eq!(updated.sources.len(), 0);
}

#[test]
fn test_delete_source_cascades_to_mappings() {
    let updated = apply_edit_ops(&abc(), &[EditOp::DeleteSource { key: "c".into() }]);
    assert_eq!(keys(&updated), vec!["a", "b"]);
    assert!(updated.mappings.iter().all(|m| m.source_key != "c"));
    assert_eq!(mapping_keys(&updated), vec!["a", "orphan", "b"]);
}

#[test]
fn test_set_mappings_replaces_and_creates() {
    let updated = apply_edit_ops(
        &abc(),
        &[
            EditOp::SetMappings {
                key: "a".into(),
                patterns: vec!["X".into(), "X".into()],
            },
            EditOp::SetMappings {
                key: "new".into(),
                patterns: vec!["N.*".into()],
            },
        ],
    );
    assert_eq!(updated.mapping("a").unwrap().patterns, vec!["X", "X"]);
    assert_eq!(updated.mappings.last().unwrap().source_key, "new");
}

#[test]
fn test_reorder_sources_keeps_unlisted_at_end() {
    let updated = apply_edit_ops(
        &abc(),
        &[EditOp::ReorderSources {
            keys: vec!["b".into(), "a".into()],
        }],
    );
    assert_eq!(keys(&updated), vec!["b", "a", "c"]);
    assert_eq!(mapping_keys(&updated), vec!["b", "a", "c", "orphan"]);
}

#[test]
fn test_reorder_sources_ignores_unknown_and_repeated_keys() {
    let updated = apply_edit_ops(
        &abc(),
        &[EditOp::ReorderSources {
            keys: vec!["zzz".into(), "c".into(), "c".into()],
        }],
    );
    assert_eq!(keys(&updated), vec!["c", "a", "b"]);
    assert_eq!(updated.sources.len(), 3);
}

#[test]
fn test_ops_apply_sequentially() {
    let updated = apply_edit_ops(
        &base(),
        &[
            EditOp::AddSource {
                key: "tmp".into(),
                url: "https://tmp".into(),
            },
            EditOp::SetMappings {
                key: "tmp".into(),
                patterns: vec!["T.*".into()],
            },
            EditOp::UpdateSource {
                key: "tmp".into(),
                new_key: Some("final".into()),
                url: None,
            },
            EditOp::ToggleSource {
                key: "final".into(),
                enabled: false,
            },
        ],
    );
    assert_eq!(keys(&updated), vec!["a", "final"]);
    assert!(!updated.source("final").unwrap().enabled);
    assert_eq!(mapping_keys(&updated), vec!["final"]);
}

#[test]
fn test_input_model_is_not_modified() {
    let model = abc();
    let snapshot = model.clone();
    let updated = apply_edit_ops(
        &model,
        &[
            EditOp::DeleteSource { key: "a".into() },
            EditOp::ToggleSource {
                key: "b".into(),
                enabled: false,
            },
        ],
    );
    assert_eq!(model, snapshot);
    assert_ne!(updated, snapshot);
    assert_eq!(updated.raw_unknown, snapshot.raw_unknown);
}

#[test]
fn test_wire_format() {
    let ops: Vec<EditOp> = serde_json::from_value(json!([
        {"kind": "addSource", "key": "a", "url": "https://a"},
        {"kind": "updateSource", "key": "a", "newKey": "b"},
        {"kind": "deleteSource", "key": "b"},
        {"kind": "toggleSource", "key": "c", "enabled": false},
        {"kind": "setMappings", "key": "c", "patterns": ["C.*"]},
        {"kind": "reorderSources", "keys": ["c"]}
    ]))
    .unwrap();

    assert_eq!(ops.len(), 6);
    assert_eq!(
        ops[1],
        EditOp::UpdateSource {
            key: "a".into(),
            new_key: Some("b".into()),
            url: None,
        }
    );
    assert_eq!(ops[5].kind(), "reorderSources");

    let value = serde_json::to_value(&ops[1]).unwrap();
    assert_eq!(value, json!({"kind": "updateSource", "key": "a", "newKey": "b"}));
}
