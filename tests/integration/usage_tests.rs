//! The documented usage examples, end to end.

use nodups::{nodups, Compare, DedupError, DedupOptions, Deduplicator, Value};
use serde_json::json;

fn values(json: serde_json::Value) -> Vec<Value> {
    Value::from(json).to_vec().unwrap()
}

fn nums(items: &[i32]) -> Vec<Value> {
    items.iter().copied().map(Value::from).collect()
}

#[test]
fn test_basic_usage() {
    let input = values(json!([1, { "a": 5 }, 2, { "a": 5 }, 1]));
    let result = nodups(&input, &DedupOptions::default()).unwrap();

    assert_eq!(result, values(json!([1, { "a": 5 }, 2])));
    assert_eq!(input.len(), 5, "input is left untouched");
}

#[test]
fn test_in_place_usage() {
    let list = Value::from(json!([1, { "a": 5 }, 2, { "a": 5 }, 1]));
    let alias = list.clone();

    Deduplicator::with_defaults().dedup_value_in_place(&list);

    assert!(alias.same_node(&list));
    assert_eq!(list, Value::from(json!([1, { "a": 5 }, 2])));
}

#[test]
fn test_nan_is_deduplicated() {
    let input = vec![Value::nan(), Value::from(0), Value::nan(), Value::nan()];
    let result = nodups(&input, &DedupOptions::default()).unwrap();

    assert_eq!(result.len(), 2);
    assert!(result[0].is_nan());
    assert_eq!(result[1], Value::from(0));
}

#[test]
fn test_custom_compare() {
    let same_decade = DedupOptions::new().with_comparator(|a, b| {
        let decade = |v: &Value| v.as_number().map(|n| (n / 10.0).trunc());
        decade(a) == decade(b)
    });

    let result = nodups(&nums(&[1, 5, 7, 14, 19, 33, 36]), &same_decade).unwrap();
    assert_eq!(result, nums(&[1, 14, 33]));
}

#[test]
fn test_strict_operator_compares_identity() {
    let obj = Value::from(json!({ "a": 1 }));
    let other1 = Value::from(json!({ "a": 1 }));
    let other2 = Value::from(json!({ "a": 1 }));
    let input = vec![obj.clone(), other1.clone(), obj.clone(), other2.clone(), obj.clone()];

    let result = nodups(&input, &DedupOptions::new().with_compare(Compare::Strict)).unwrap();

    assert_eq!(result.len(), 3);
    assert!(result[0].same_node(&obj));
    assert!(result[1].same_node(&other1));
    assert!(result[2].same_node(&other2));
}

#[test]
fn test_loose_operator() {
    let input = values(json!([0, "", false, []]));
    let options = DedupOptions::new().with_compare("==".parse().unwrap());

    assert_eq!(nodups(&input, &options).unwrap(), nums(&[0]));
}

#[test]
fn test_strict_false() {
    let input = values(json!([{ "a": 1 }, { "a": "1" }]));
    let result = nodups(&input, &DedupOptions::new().with_strict(false)).unwrap();

    assert_eq!(result, values(json!([{ "a": 1 }])));
}

#[test]
fn test_loose_operator_versus_strict_false() {
    let input = || {
        let mut items = values(json!([0, "", false]));
        items.extend([Value::nan(), Value::nan()]);
        items.extend(values(json!([{ "a": 1 }, { "a": "1" }, { "a": "1" }])));
        items
    };

    let deep = nodups(&input(), &DedupOptions::new().with_strict(false)).unwrap();
    let mut expected = nums(&[0]);
    expected.push(Value::nan());
    expected.push(Value::from(json!({ "a": 1 })));
    assert_eq!(deep, expected);

    // Operators are shallow: NaN never matches and records only match themselves
    let shallow = nodups(&input(), &DedupOptions::new().with_compare(Compare::Loose)).unwrap();
    assert_eq!(shallow.len(), 6);
    assert_eq!(shallow[0], Value::from(0));
    assert!(shallow[1].is_nan() && shallow[2].is_nan());
    assert_eq!(shallow[3..], values(json!([{ "a": 1 }, { "a": "1" }, { "a": "1" }]))[..]);
}

#[test]
fn test_sorted() {
    let options = DedupOptions::new().with_sorted(true);
    assert_eq!(nodups(&nums(&[1, 1, 1, 3, 3, 4, 5]), &options).unwrap(), nums(&[1, 3, 4, 5]));
}

#[test]
fn test_sorted_on_unsorted_input_keeps_repeats() {
    let options = DedupOptions::new().with_sorted(true);
    assert_eq!(
        nodups(&nums(&[1, 3, 1, 1, 3, 4, 5]), &options).unwrap(),
        nums(&[1, 3, 1, 3, 4, 5])
    );
}

fn by_skip_input() -> Vec<Value> {
    values(json!([{ "a": 1, "b": 3 }, { "a": 2, "b": 4 }, { "a": 1, "b": 5 }]))
}

#[test]
fn test_by() {
    let result = nodups(&by_skip_input(), &DedupOptions::new().with_by(vec!["a"])).unwrap();
    assert_eq!(result, values(json!([{ "a": 1, "b": 3 }, { "a": 2, "b": 4 }])));
}

#[test]
fn test_skip() {
    let result = nodups(&by_skip_input(), &DedupOptions::new().with_skip(vec!["b"])).unwrap();
    assert_eq!(result, values(json!([{ "a": 1, "b": 3 }, { "a": 2, "b": 4 }])));
}

#[test]
fn test_by_and_skip_together() {
    let options = DedupOptions::new().with_by(vec!["a"]).with_skip(vec!["a"]);
    assert!(matches!(
        nodups(&by_skip_input(), &options),
        Err(DedupError::ConflictingRestrictions)
    ));
}

#[test]
fn test_by_paths() {
    let input = values(json!([
        { "a": { "b": 1, "c": 2 }, "d": 7 },
        { "a": { "b": 5, "c": 4 }, "d": 8 },
        { "a": { "b": 1, "c": 2 }, "d": 9 }
    ]));
    let by = nodups::PathSpecInput::try_from(json!(["a.b", ["a", "c"]])).unwrap();

    let result = nodups(&input, &DedupOptions::new().with_by(by)).unwrap();
    assert_eq!(
        result,
        values(json!([{ "a": { "b": 1, "c": 2 }, "d": 7 }, { "a": { "b": 5, "c": 4 }, "d": 8 }]))
    );
}

#[test]
fn test_on_unique_counts_duplicates() {
    let input = values(json!([{ "a": 1 }, { "a": 2 }, { "a": 1 }]));
    let result = Deduplicator::with_defaults().dedup_with(&input, |unique, duplicates, _| {
        unique.set("dups", duplicates.len() as i64);
    });

    assert_eq!(result, values(json!([{ "a": 1, "dups": 1 }, { "a": 2, "dups": 0 }])));
}

#[test]
fn test_on_unique_maps_uniques() {
    let result = Deduplicator::with_defaults().dedup_with(&nums(&[1, 3, 2, 3]), |unique, _, _| {
        if let Some(n) = unique.as_number() {
            *unique = Value::from(n * 2.0);
        }
    });

    assert_eq!(result, nums(&[2, 6, 4]));
}
