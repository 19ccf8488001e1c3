//! Schema combinators for composing validation logic.
//!
//! This module provides two combinators:
//! - [`UnionSchema`]: the first option that matches cleanly wins
//! - [`IntersectSchema`]: every option must match, and their outputs are merged
//!
//! Both run their options against the same input. Candidate resolution lives
//! in small accumulators so that the async runners reuse it unchanged.

use std::ops::ControlFlow;
use std::sync::Arc;

use serde_json::Value;
use stillwater::Semigroup;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::Issues;
use crate::message::{add_issue, join_expects, IssueOverrides, Message};

use super::traits::{IssueContext, Kind, SchemaLike};

/// Matches the first option that accepts the input without issues.
///
/// When no option matches cleanly:
/// - a single typed candidate (right shape, failed validation) is returned as is
/// - several typed candidates produce one issue wrapping all of their issues
/// - otherwise a single untyped candidate is returned as is, and several
///   produce one issue wrapping theirs
///
/// # Example
///
/// ```rust
/// use litmus::{Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let id = Schema::union().option(Schema::string()).option(Schema::number());
///
/// assert!(id.run(Dataset::new(json!(7)), &Config::default()).is_valid());
///
/// let dataset = id.run(Dataset::new(json!(true)), &Config::default());
/// let issue = dataset.issues.unwrap().first().clone();
/// assert_eq!(issue.expected.as_deref(), Some("(string | number)"));
/// assert_eq!(issue.issues.map(|sub| sub.len()), Some(2));
/// ```
pub struct UnionSchema<S: ?Sized = dyn SchemaLike> {
    options: Vec<Arc<S>>,
    message: Option<Message>,
}

impl<S: ?Sized> UnionSchema<S> {
    pub(crate) fn empty() -> Self {
        Self {
            options: Vec::new(),
            message: None,
        }
    }

    pub(crate) fn push(&mut self, option: Arc<S>) {
        self.options.push(option);
    }

    /// Sets the message used when no option matches.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the options in declaration order.
    pub fn options(&self) -> &[Arc<S>] {
        &self.options
    }
}

impl UnionSchema<dyn SchemaLike> {
    /// Appends an option.
    pub fn option<T: SchemaLike + 'static>(mut self, schema: T) -> Self {
        self.push(Arc::new(schema));
        self
    }
}

impl<S: IssueContext + ?Sized> IssueContext for UnionSchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_name(&self) -> &'static str {
        "union"
    }

    fn expects(&self) -> Option<String> {
        Some(join_expects(
            self.options.iter().filter_map(|option| option.expects()),
            '|',
        ))
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl SchemaLike for UnionSchema<dyn SchemaLike> {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        let mut candidates = UnionCandidates::default();
        for option in &self.options {
            let candidate = option.run(Dataset::new(dataset.value.clone()), config);
            if let Some(matched) = candidates.offer(candidate) {
                return matched;
            }
        }
        candidates.resolve(self, dataset, config)
    }
}

/// Sorts union candidates by typed-ness, keeping declaration order.
#[derive(Default)]
pub(crate) struct UnionCandidates {
    typed: Vec<Dataset>,
    untyped: Vec<Dataset>,
}

impl UnionCandidates {
    /// Records a candidate, handing it back if it is a clean match.
    pub(crate) fn offer(&mut self, candidate: Dataset) -> Option<Dataset> {
        if candidate.typed {
            if candidate.issues.is_none() {
                return Some(candidate);
            }
            self.typed.push(candidate);
        } else {
            self.untyped.push(candidate);
        }
        None
    }

    /// Picks the result once every option failed to match cleanly.
    pub(crate) fn resolve<C: IssueContext + ?Sized>(
        self,
        context: &C,
        mut dataset: Dataset,
        config: &Config,
    ) -> Dataset {
        let UnionCandidates { mut typed, mut untyped } = self;

        if !typed.is_empty() {
            if typed.len() == 1 {
                return typed.remove(0);
            }
            tracing::debug!(candidates = typed.len(), "union is ambiguous between typed options");
            add_issue(
                context,
                "type",
                &mut dataset,
                config,
                IssueOverrides::new().issues(collect_issues(typed)),
            );
            dataset.typed = true;
            return dataset;
        }

        if untyped.len() == 1 {
            return untyped.remove(0);
        }
        add_issue(
            context,
            "type",
            &mut dataset,
            config,
            IssueOverrides::new().issues(collect_issues(untyped)),
        );
        dataset
    }
}

/// Concatenates the issues of `datasets` in order.
fn collect_issues(datasets: Vec<Dataset>) -> Option<Issues> {
    datasets
        .into_iter()
        .filter_map(|dataset| dataset.issues)
        .reduce(|collected, issues| collected.combine(issues))
}

/// Requires every option to match and merges their outputs.
///
/// Objects merge key by key and equal-length arrays position by position.
/// Any other pair of differing outputs cannot be merged and produces an issue.
///
/// # Example
///
/// ```rust
/// use litmus::{Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::intersect()
///     .option(Schema::object().field("id", Schema::number()))
///     .option(Schema::object().field("name", Schema::string()));
///
/// let dataset = schema.run(
///     Dataset::new(json!({"id": 1, "name": "Ada", "extra": 0})),
///     &Config::default(),
/// );
/// assert_eq!(dataset.value, Some(json!({"id": 1, "name": "Ada"})));
/// ```
pub struct IntersectSchema<S: ?Sized = dyn SchemaLike> {
    options: Vec<Arc<S>>,
    message: Option<Message>,
}

impl<S: ?Sized> IntersectSchema<S> {
    pub(crate) fn empty() -> Self {
        Self {
            options: Vec::new(),
            message: None,
        }
    }

    pub(crate) fn push(&mut self, option: Arc<S>) {
        self.options.push(option);
    }

    /// Sets the message used for type issues and merge conflicts.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the options in declaration order.
    pub fn options(&self) -> &[Arc<S>] {
        &self.options
    }
}

impl IntersectSchema<dyn SchemaLike> {
    /// Appends an option.
    pub fn option<T: SchemaLike + 'static>(mut self, schema: T) -> Self {
        self.push(Arc::new(schema));
        self
    }
}

impl<S: IssueContext + ?Sized> IssueContext for IntersectSchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_name(&self) -> &'static str {
        "intersect"
    }

    fn expects(&self) -> Option<String> {
        Some(join_expects(
            self.options.iter().filter_map(|option| option.expects()),
            '&',
        ))
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl SchemaLike for IntersectSchema<dyn SchemaLike> {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if self.options.is_empty() {
            add_issue(self, "type", &mut dataset, config, IssueOverrides::new());
            return dataset;
        }

        let input = dataset.value.clone();
        let mut run = IntersectRun::new(dataset);
        for option in &self.options {
            let child = option.run(Dataset::new(input.clone()), config);
            if run.merge(child, config).is_break() {
                break;
            }
        }
        run.finish(self, config)
    }
}

/// Collects intersect option results and merges their outputs.
pub(crate) struct IntersectRun {
    dataset: Dataset,
    outputs: Vec<Option<Value>>,
}

impl IntersectRun {
    pub(crate) fn new(mut dataset: Dataset) -> Self {
        dataset.typed = true;
        Self {
            dataset,
            outputs: Vec::new(),
        }
    }

    /// Records one option's result.
    ///
    /// Option issues are kept with their own paths. Returns `Break` when
    /// `abort_early` requires the caller to stop.
    pub(crate) fn merge(&mut self, child: Dataset, config: &Config) -> ControlFlow<()> {
        if let Some(issues) = child.issues {
            self.dataset.extend_issues(issues);
            if config.abort_early {
                self.dataset.typed = false;
                return ControlFlow::Break(());
            }
        }
        if !child.typed {
            self.dataset.typed = false;
        }
        if self.dataset.typed {
            self.outputs.push(child.value);
        }
        ControlFlow::Continue(())
    }

    /// Merges the collected outputs when every option was typed.
    pub(crate) fn finish<C: IssueContext + ?Sized>(self, context: &C, config: &Config) -> Dataset {
        let IntersectRun { mut dataset, outputs } = self;
        if !dataset.typed {
            return dataset;
        }

        let mut outputs = outputs.into_iter();
        let mut merged = outputs.next().flatten();
        for next in outputs {
            match merge_outputs(merged.clone(), next) {
                Ok(value) => merged = value,
                Err(MergeConflict) => {
                    tracing::debug!("intersect outputs could not be merged");
                    dataset.value = merged;
                    add_issue(
                        context,
                        "type",
                        &mut dataset,
                        config,
                        IssueOverrides::new().received("unknown"),
                    );
                    return dataset;
                }
            }
        }
        dataset.value = merged;
        dataset
    }
}

/// Two outputs that cannot be combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MergeConflict;

fn merge_outputs(left: Option<Value>, right: Option<Value>) -> Result<Option<Value>, MergeConflict> {
    match (left, right) {
        (None, None) => Ok(None),
        (Some(left), Some(right)) => merge_values(left, right).map(Some),
        _ => Err(MergeConflict),
    }
}

/// Deep-merges two values.
///
/// Equal values merge to themselves. Objects merge key by key, keeping the
/// left key order, and arrays of equal length merge position by position.
pub(crate) fn merge_values(left: Value, right: Value) -> Result<Value, MergeConflict> {
    if left == right {
        return Ok(left);
    }
    match (left, right) {
        (Value::Object(mut left), Value::Object(right)) => {
            for (key, value) in right {
                match left.get_mut(&key) {
                    Some(slot) => {
                        let merged = merge_values(slot.take(), value)?;
                        *slot = merged;
                    }
                    None => {
                        left.insert(key, value);
                    }
                }
            }
            Ok(Value::Object(left))
        }
        (Value::Array(left), Value::Array(right)) if left.len() == right.len() => left
            .into_iter()
            .zip(right)
            .map(|(l, r)| merge_values(l, r))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        _ => Err(MergeConflict),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::schema::Schema;
    use serde_json::json;

    fn run<S: SchemaLike>(schema: &S, value: Value) -> Dataset {
        schema.run(Dataset::new(value), &Config::default())
    }

    #[test]
    fn test_union_first_clean_match_wins() {
        let schema = Schema::union()
            .option(Schema::string().pipe(Action::to_upper_case()))
            .option(Schema::string());
        let dataset = run(&schema, json!("abc"));
        assert!(dataset.is_valid());
        assert_eq!(dataset.value, Some(json!("ABC")));
    }

    #[test]
    fn test_union_single_typed_candidate_returned_verbatim() {
        let schema = Schema::union()
            .option(Schema::string().pipe(Action::min_length(5)))
            .option(Schema::number());
        let dataset = run(&schema, json!("abc"));
        assert!(dataset.typed);
        let issues = dataset.issues.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues.first().type_name, "min_length");
    }

    #[test]
    fn test_union_several_typed_candidates_wrap_issues() {
        let schema = Schema::union()
            .option(Schema::string().pipe(Action::min_length(5)))
            .option(Schema::string().pipe(Action::regex("^x").unwrap()));
        let dataset = run(&schema, json!("abc"));
        assert!(dataset.typed);
        let issue = dataset.issues.unwrap().first().clone();
        assert_eq!(issue.type_name, "union");
        let nested: Vec<_> = issue.issues.unwrap().iter().map(|i| i.type_name).collect();
        assert_eq!(nested, vec!["min_length", "regex"]);
    }

    #[test]
    fn test_union_single_untyped_candidate_returned_verbatim() {
        let schema = Schema::union().option(Schema::string());
        let dataset = run(&schema, json!(1));
        let issue = dataset.issues.unwrap().first().clone();
        assert_eq!(issue.type_name, "string");
    }

    #[test]
    fn test_empty_union() {
        let schema = Schema::union();
        let dataset = run(&schema, json!(1));
        let issue = dataset.issues.unwrap().first().clone();
        assert_eq!(issue.expected.as_deref(), Some("never"));
        assert!(issue.issues.is_none());
    }

    #[test]
    fn test_intersect_merges_nested_objects() {
        let schema = Schema::intersect()
            .option(Schema::loose_object().field("a", Schema::object().field("x", Schema::number())))
            .option(Schema::object().field("a", Schema::object().field("y", Schema::number())));
        let dataset = run(&schema, json!({"a": {"x": 1, "y": 2}, "b": 3}));
        assert!(dataset.is_valid());
        assert_eq!(dataset.value, Some(json!({"a": {"x": 1, "y": 2}, "b": 3})));
    }

    #[test]
    fn test_intersect_conflict() {
        let schema = Schema::intersect()
            .option(Schema::string().pipe(Action::to_upper_case()))
            .option(Schema::string());
        let dataset = run(&schema, json!("abc"));
        assert!(!dataset.typed);
        let issue = dataset.issues.unwrap().first().clone();
        assert_eq!(issue.received, "unknown");
        assert_eq!(issue.expected.as_deref(), Some("string"));
    }

    #[test]
    fn test_intersect_keeps_option_issue_paths() {
        let schema = Schema::intersect()
            .option(Schema::object().field("a", Schema::number()))
            .option(Schema::object().field("b", Schema::number()));
        let dataset = run(&schema, json!({"a": "x", "b": "y"}));
        assert!(!dataset.typed);
        let paths: Vec<_> = dataset
            .issues
            .unwrap()
            .iter()
            .map(|i| i.path.to_string())
            .collect();
        assert_eq!(paths, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_intersect() {
        let dataset = run(&Schema::intersect(), json!(1));
        assert!(!dataset.typed);
        assert_eq!(
            dataset.issues.unwrap().first().expected.as_deref(),
            Some("never")
        );
    }

    #[test]
    fn test_merge_values() {
        assert_eq!(merge_values(json!(1), json!(1)), Ok(json!(1)));
        assert_eq!(merge_values(json!([1, {"a": 1}]), json!([1, {"b": 2}])), Ok(json!([1, {"a": 1, "b": 2}])));
        assert_eq!(merge_values(json!([1]), json!([1, 2])), Err(MergeConflict));
        assert_eq!(merge_values(json!("a"), json!(1)), Err(MergeConflict));
    }
}
