//! Integration tests for array and tuple schemas.

use litmus::{safe_parse, Action, Config, Schema, SchemaLike};
use serde_json::json;

#[test]
fn test_array_accepts_matching_items() {
    let schema = Schema::array(Schema::string().pipe(Action::to_upper_case()));
    let result = safe_parse(&schema, json!(["a", "b"]), &Config::default());
    assert!(result.success);
    assert_eq!(result.output, Some(json!(["A", "B"])));
}

#[test]
fn test_array_reports_every_bad_item() {
    let schema = Schema::array(Schema::number());
    let result = safe_parse(&schema, json!([1, "two", 3, null]), &Config::default());

    assert!(!result.typed);
    let issues = result.issues.unwrap();
    let paths: Vec<_> = issues.iter().map(|i| i.path.to_string()).collect();
    assert_eq!(paths, vec!["[1]", "[3]"]);
}

#[test]
fn test_array_abort_early_stops_at_first_bad_item() {
    let schema = Schema::array(Schema::number());
    let config = Config::new().abort_early(true);
    let result = safe_parse(&schema, json!([1, "two", "three"]), &config);
    assert_eq!(result.issues.unwrap().len(), 1);
}

#[test]
fn test_array_rejects_non_arrays() {
    let schema = Schema::array(Schema::number());
    let result = safe_parse(&schema, json!({"0": 1}), &Config::default());
    let issues = result.issues.unwrap();
    assert_eq!(issues.first().expected.as_deref(), Some("Array"));
    assert_eq!(issues.first().received, "Object");
}

#[test]
fn test_array_of_objects_paths() {
    let schema = Schema::array(Schema::object().field("email", Schema::string()));
    let result = safe_parse(
        &schema,
        json!([{"email": "a"}, {"email": 1}]),
        &Config::default(),
    );
    let issues = result.issues.unwrap();
    assert_eq!(issues.first().path.to_string(), "[1].email");
    assert_eq!(issues.first().path.dot_path(), "1.email");
}

#[test]
fn test_empty_array_is_valid() {
    let schema = Schema::array(Schema::never());
    let result = safe_parse(&schema, json!([]), &Config::default());
    assert!(result.success);
    assert_eq!(result.output, Some(json!([])));
}

#[test]
fn test_array_length_actions() {
    let schema = Schema::array(Schema::number())
        .pipe(Action::min_length(2))
        .pipe(Action::max_length(3));

    assert!(safe_parse(&schema, json!([1, 2]), &Config::default()).success);

    let short = safe_parse(&schema, json!([1]), &Config::default());
    let issue = short.issues.unwrap().first().clone();
    assert_eq!(issue.type_name, "min_length");
    assert_eq!(issue.message, "Invalid length: Expected >=2 but received 1");
}

#[test]
fn test_tuple_validates_positions() {
    let schema = Schema::tuple().item(Schema::string()).item(Schema::number());
    let ok = safe_parse(&schema, json!(["a", 1, "dropped"]), &Config::default());
    assert!(ok.success);
    assert_eq!(ok.output, Some(json!(["a", 1])));

    let bad = safe_parse(&schema, json!([1, "a"]), &Config::default());
    let paths: Vec<_> = bad
        .issues
        .unwrap()
        .iter()
        .map(|i| i.path.to_string())
        .collect();
    assert_eq!(paths, vec!["[0]", "[1]"]);
}

#[test]
fn test_tuple_missing_position_runs_with_absent_value() {
    let schema = Schema::tuple()
        .item(Schema::string())
        .item(Schema::optional(Schema::number()));
    let result = safe_parse(&schema, json!(["a"]), &Config::default());
    assert!(result.success);
    assert_eq!(result.output, Some(json!(["a", null])));
}

#[test]
fn test_loose_tuple_keeps_extra_items() {
    let schema = Schema::loose_tuple().item(Schema::string());
    let result = safe_parse(&schema, json!(["a", 1, true]), &Config::default());
    assert!(result.success);
    assert_eq!(result.output, Some(json!(["a", 1, true])));
}

#[test]
fn test_strict_tuple_rejects_first_extra_item() {
    let schema = Schema::strict_tuple().item(Schema::string());
    let result = safe_parse(&schema, json!(["a", 1, true]), &Config::default());

    let issues = result.issues.unwrap();
    assert_eq!(issues.len(), 1);
    let issue = issues.first();
    assert_eq!(issue.type_name, "strict_tuple");
    assert_eq!(issue.path.to_string(), "[1]");
    assert_eq!(issue.message, "Invalid type: Expected never but received 1");
}

#[test]
fn test_tuple_with_rest_validates_extras() {
    let schema = Schema::tuple_with_rest(Schema::boolean()).item(Schema::string());
    let result = safe_parse(&schema, json!(["a", true, 0, false]), &Config::default());
    let issues = result.issues.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues.first().path.to_string(), "[2]");
    assert_eq!(result.output, Some(json!(["a", true, 0, false])));
}
