//! The record threaded through every schema and action.

use serde_json::Value;
use stillwater::{Semigroup, Validation};

use crate::error::{Issue, Issues};
use crate::path::PathSegment;

/// A value under validation together with its typed-ness and issues.
///
/// - `value` is the current, possibly partially transformed value. `None`
///   stands for an absent (undefined) value.
/// - `typed` is true iff `value` conforms to the output type of the schema
///   that produced the dataset. A typed dataset may still carry issues from
///   validations that ran on an already conforming value.
/// - `issues` is `None` until the first problem is recorded.
///
/// # Example
///
/// ```rust
/// use litmus::{Action, Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::string().pipe(Action::trim()).pipe(Action::min_length(1));
/// let dataset = schema.run(Dataset::new(json!("  ")), &Config::default());
///
/// assert!(dataset.typed);
/// assert_eq!(dataset.value, Some(json!("")));
/// assert_eq!(dataset.issues.unwrap().first().type_name, "min_length");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// The current value; `None` when absent.
    pub value: Option<Value>,
    /// Whether `value` conforms to the declared output type.
    pub typed: bool,
    /// Recorded problems, if any.
    pub issues: Option<Issues>,
}

impl Dataset {
    /// Creates an untyped dataset without issues.
    pub fn new(value: impl Into<Option<Value>>) -> Self {
        Self {
            value: value.into(),
            typed: false,
            issues: None,
        }
    }

    /// Creates an untyped dataset holding an absent value.
    pub fn undefined() -> Self {
        Self::default()
    }

    /// Returns true if at least one issue was recorded.
    pub fn has_issues(&self) -> bool {
        self.issues.is_some()
    }

    /// Returns true if the dataset is typed and carries no issue.
    pub fn is_valid(&self) -> bool {
        self.typed && self.issues.is_none()
    }

    /// Appends an issue, creating the list on first use.
    pub fn push_issue(&mut self, issue: Issue) {
        self.issues = Some(match self.issues.take() {
            Some(existing) => existing.push(issue),
            None => Issues::single(issue),
        });
    }

    /// Appends every issue of a child dataset, prepending `segment` to each path.
    pub fn absorb(&mut self, issues: Issues, segment: &PathSegment) {
        for issue in issues {
            self.push_issue(issue.with_parent(segment.clone()));
        }
    }

    /// Appends every issue of another list unchanged.
    pub fn extend_issues(&mut self, issues: Issues) {
        self.issues = Some(match self.issues.take() {
            Some(existing) => existing.combine(issues),
            None => issues,
        });
    }

    /// Returns true if any recorded issue asks the surrounding pipe to stop.
    pub(crate) fn requests_pipe_abort(&self) -> bool {
        self.issues
            .as_ref()
            .is_some_and(|issues| issues.iter().any(|issue| issue.abort_pipe_early))
    }

    /// Converts the dataset into a `Validation`, treating any issue as failure.
    pub fn into_validation(self) -> Validation<Option<Value>, Issues> {
        match self.issues {
            Some(issues) => Validation::Failure(issues),
            None => Validation::Success(self.value),
        }
    }
}
