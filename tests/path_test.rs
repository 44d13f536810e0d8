use formwork::{value, DataPath, LogicalPath};
use serde_json::json;

#[test]
fn test_path_round_trip_property() {
    // get(set({}, p, v), p) == v for representative paths and values
    let cases = [
        ("name", json!("Ada")),
        ("a.b", json!(42)),
        ("deeply.nested.leaf.field", json!({"kept": true})),
        ("security.password", json!("hunter22")),
    ];

    for (path, stored) in cases {
        let path = LogicalPath::new(path);
        let mut data = json!({});
        value::set(&mut data, &path, stored.clone());
        assert_eq!(value::get(&data, &path), Some(&stored), "round trip for {}", path);
    }
}

#[test]
fn test_missing_intermediate_reads_none_writes_create() {
    let mut data = json!({});
    assert_eq!(value::get(&data, &LogicalPath::new("a.b.c")), None);

    value::set(&mut data, &LogicalPath::new("a.b.c"), json!(1));
    assert_eq!(data, json!({"a": {"b": {"c": 1}}}));

    // Intermediates are plain objects, never arrays
    assert!(data["a"].is_object());
    assert!(data["a"]["b"].is_object());
}

#[test]
fn test_delete_then_has() {
    let mut data = json!({"a": {"b": 1}});
    assert!(value::has(&data, &LogicalPath::new("a.b")));

    value::delete(&mut data, &LogicalPath::new("a.b"));
    assert!(!value::has(&data, &LogicalPath::new("a.b")));
    assert!(value::has(&data, &LogicalPath::new("a")));
}

#[test]
fn test_indexed_issue_path_normalizes_to_logical() {
    // ["addresses", 1, "zip"] -> "addresses.zip"
    let issue_path = DataPath::root()
        .push_field("addresses")
        .push_index(1)
        .push_field("zip");

    assert_eq!(issue_path.to_string(), "addresses[1].zip");
    assert_eq!(issue_path.logical(), LogicalPath::new("addresses.zip"));
}

#[test]
fn test_every_index_of_an_array_shares_one_logical_identity() {
    let first = DataPath::root().push_field("items").push_index(0).push_field("sku");
    let tenth = DataPath::root().push_field("items").push_index(9).push_field("sku");

    assert_ne!(first, tenth);
    assert_eq!(first.logical(), tenth.logical());
}
