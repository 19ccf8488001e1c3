//! Integration tests for issue paths.

use litmus::{safe_parse, Config, JsonPath, PathSegment, Schema};
use serde_json::json;

#[test]
fn test_complex_path_building() {
    let path = JsonPath::root()
        .push_field("users")
        .push_index(0)
        .push_field("addresses")
        .push_index(1)
        .push_field("zip");

    assert_eq!(path.to_string(), "users[0].addresses[1].zip");
    assert_eq!(path.dot_path(), "users.0.addresses.1.zip");
    assert_eq!(path.len(), 5);
}

#[test]
fn test_path_is_immutable() {
    let base = JsonPath::root().push_field("items");

    let path1 = base.push_index(0);
    let path2 = base.push_index(1);
    let path3 = base.push_field("count");

    assert_eq!(base.to_string(), "items");
    assert_eq!(path1.to_string(), "items[0]");
    assert_eq!(path2.to_string(), "items[1]");
    assert_eq!(path3.to_string(), "items.count");
}

#[test]
fn test_with_parent_prepends() {
    let path = JsonPath::from_field("email")
        .with_parent(PathSegment::index(2))
        .with_parent(PathSegment::field("users"));

    let segments: Vec<_> = path.segments().cloned().collect();
    assert_eq!(
        segments,
        vec![
            PathSegment::field("users"),
            PathSegment::index(2),
            PathSegment::field("email"),
        ]
    );
    assert_eq!(path.last(), Some(&PathSegment::field("email")));
}

#[test]
fn test_consecutive_indices() {
    let path = JsonPath::root().push_index(0).push_index(1).push_index(2);
    assert_eq!(path.to_string(), "[0][1][2]");
    assert_eq!(path.dot_path(), "0.1.2");
}

#[test]
fn test_path_hash() {
    use std::collections::HashSet;

    let mut set = HashSet::new();
    set.insert(JsonPath::from_field("a"));
    set.insert(JsonPath::from_field("b"));
    set.insert(JsonPath::from_field("a"));

    assert_eq!(set.len(), 2);
}

#[test]
fn test_leaf_issues_have_root_path() {
    let result = safe_parse(&Schema::string(), json!(1), &Config::default());
    assert!(result.issues.unwrap().first().path.is_root());
}

#[test]
fn test_paths_built_through_nested_composites() {
    let schema = Schema::object().field(
        "matrix",
        Schema::array(Schema::tuple().item(Schema::number()).item(Schema::number())),
    );
    let result = safe_parse(
        &schema,
        json!({"matrix": [[1, 2], [3, "4"]]}),
        &Config::default(),
    );

    let issue = result.issues.unwrap().first().clone();
    assert_eq!(issue.path.to_string(), "matrix[1][1]");
    assert_eq!(
        issue.path,
        JsonPath::from_field("matrix").push_index(1).push_index(1)
    );
}

#[test]
fn test_field_names_with_dots_stay_single_segments() {
    let schema = Schema::object().field("a.b", Schema::number());
    let result = safe_parse(&schema, json!({"a.b": "x"}), &Config::default());
    let issue = result.issues.unwrap().first().clone();
    assert_eq!(issue.path.len(), 1);
    assert_eq!(issue.path.last().and_then(PathSegment::as_field), Some("a.b"));
}
