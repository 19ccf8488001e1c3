//! Integration tests for issue collections and parse errors.

use litmus::{parse, safe_parse, Action, Config, Issues, JsonPath, Schema, SchemaLike, ValiError};
use serde_json::json;
use stillwater::{Semigroup, Validation};

fn signup() -> litmus::ObjectSchema {
    Schema::object()
        .field("email", Schema::string().pipe(Action::regex("@").unwrap()))
        .field("password", Schema::string().pipe(Action::min_length(8)))
        .field("tags", Schema::array(Schema::string()))
}

fn failing_issues() -> Issues {
    safe_parse(
        &signup(),
        json!({"email": "nope", "password": "short", "tags": ["a", 1]}),
        &Config::default(),
    )
    .issues
    .unwrap()
}

#[test]
fn test_issues_keep_discovery_order() {
    let issues = failing_issues();
    let types: Vec<_> = issues.iter().map(|i| i.type_name).collect();
    assert_eq!(types, vec!["regex", "min_length", "string"]);
}

#[test]
fn test_issues_at_path() {
    let issues = failing_issues();
    let at_password = issues.at_path(&JsonPath::root().push_field("password"));
    assert_eq!(at_password.len(), 1);
    assert_eq!(at_password[0].type_name, "min_length");

    let at_tag = issues.at_path(&JsonPath::root().push_field("tags").push_index(1));
    assert_eq!(at_tag.len(), 1);
}

#[test]
fn test_issues_of_type() {
    let issues = failing_issues();
    assert_eq!(issues.of_type("regex").len(), 1);
    assert!(issues.of_type("max_length").is_empty());
}

#[test]
fn test_flatten_groups_by_dot_path() {
    let flat = failing_issues().flatten();
    assert!(flat.root.is_empty());
    let keys: Vec<_> = flat.nested.keys().cloned().collect();
    assert_eq!(keys, vec!["email", "password", "tags.1"]);
    assert_eq!(
        flat.nested["password"],
        vec!["Invalid length: Expected >=8 but received 5"]
    );
}

#[test]
fn test_flatten_collects_root_issues() {
    let result = safe_parse(&signup(), json!("not an object"), &Config::default());
    let flat = result.issues.unwrap().flatten();
    assert_eq!(flat.root, vec!["Invalid type: Expected Object but received \"not an object\""]);
    assert!(flat.nested.is_empty());
}

#[test]
fn test_issues_combine() {
    let left = failing_issues();
    let right = safe_parse(&Schema::number(), json!(null), &Config::default())
        .issues
        .unwrap();
    let combined = left.combine(right);
    assert_eq!(combined.len(), 4);
    assert_eq!(combined.last().type_name, "number");
}

#[test]
fn test_issues_display_lists_every_issue() {
    let text = failing_issues().to_string();
    assert!(text.starts_with("Validation failed with 3 issue(s):"));
    assert!(text.contains("password"));
    assert!(text.contains("tags[1]"));
}

#[test]
fn test_parse_error_wraps_issues() {
    let err: ValiError = parse(&signup(), json!({}), &Config::default()).unwrap_err();
    assert_eq!(err.issues().len(), 3);
    assert_eq!(err.to_string(), err.issues().first().message);

    let issues = err.into_issues();
    assert_eq!(issues.first().path.to_string(), "email");
}

#[test]
fn test_safe_parse_into_validation() {
    let ok = safe_parse(&Schema::string(), json!("x"), &Config::default());
    assert!(matches!(ok.into_validation(), Validation::Success(Some(_))));

    let bad = safe_parse(&Schema::string(), json!(1), &Config::default());
    match bad.into_validation() {
        Validation::Failure(issues) => assert_eq!(issues.len(), 1),
        Validation::Success(_) => panic!("expected failure"),
    }
}

#[test]
fn test_partial_output_survives_failure() {
    let result = safe_parse(
        &Schema::object()
            .field("name", Schema::string().pipe(Action::trim()))
            .field("age", Schema::number()),
        json!({"name": " Ada ", "age": "x"}),
        &Config::default(),
    );
    assert!(!result.success);
    assert_eq!(result.output, Some(json!({"name": "Ada", "age": "x"})));
}
