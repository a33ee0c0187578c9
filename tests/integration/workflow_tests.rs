//! Config file to JSON output, through grouping.

use nodups::logging::init_test_logging;
use nodups::{Config, Deduplicator, Value};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn records() -> Vec<Value> {
    Value::from(json!([
        { "id": 1, "meta": { "seen": "mon" }, "tags": ["a"] },
        { "id": 2, "meta": { "seen": "mon" }, "tags": ["a"] },
        { "id": 1, "meta": { "seen": "tue" }, "tags": ["a"] },
        { "id": "1", "meta": { "seen": "wed" }, "tags": ["a"] },
        { "id": 2, "meta": { "seen": "thu" }, "tags": ["b"] }
    ]))
    .to_vec()
    .unwrap()
}

fn deduplicator_from(toml: &str) -> Deduplicator {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, toml).unwrap();

    let options = Config::load_from_path(&path).unwrap().to_options().unwrap();
    Deduplicator::new(&options).unwrap()
}

#[test]
fn test_skip_from_config_then_group() {
    init_test_logging();
    let dedup = deduplicator_from("skip = [\"meta.seen\"]\n");

    let (groups, summary) = dedup.group(&records());

    assert_eq!(summary.total_values, 5);
    assert_eq!(summary.unique_values, 4);
    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(groups[0].duplicate_count(), 1);
    assert_eq!(
        groups[0].duplicates[0].to_json().unwrap(),
        json!({ "id": 1, "meta": { "seen": "tue" }, "tags": ["a"] })
    );
}

#[test]
fn test_loose_by_from_config() {
    init_test_logging();
    let dedup = deduplicator_from("strict = false\nby = \"id\"\n");

    let uniques = dedup.dedup(&records());
    let ids: Vec<_> = uniques
        .iter()
        .map(|v| v.get("id").unwrap().to_json().unwrap())
        .collect();

    assert_eq!(ids, vec![json!(1), json!(2)]);
}

#[test]
fn test_output_serializes_to_json() {
    init_test_logging();
    let dedup = deduplicator_from("by = [[\"tags\", 0]]\n");

    let uniques = Value::list(dedup.dedup(&records()));
    assert_eq!(
        uniques.to_json().unwrap(),
        json!([
            { "id": 1, "meta": { "seen": "mon" }, "tags": ["a"] },
            { "id": 2, "meta": { "seen": "thu" }, "tags": ["b"] }
        ])
    );
}
