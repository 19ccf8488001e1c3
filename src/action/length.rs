//! Length checks for strings and arrays.

use serde_json::{json, Value};

use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::{add_issue, IssueOverrides, Message};
use crate::schema::{ActionLike, IssueContext, Kind};

/// A bound on the length of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LengthBound {
    Min(usize),
    Max(usize),
    Exact(usize),
    NonEmpty,
}

/// Checks the length of a string (in characters) or an array.
///
/// Values without a length are left alone.
///
/// # Example
///
/// ```rust
/// use litmus::{Action, Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::string().pipe(Action::max_length(3));
/// let dataset = schema.run(Dataset::new(json!("héllo")), &Config::default());
///
/// let issue = dataset.issues.unwrap().first().clone();
/// assert_eq!(issue.message, "Invalid length: Expected <=3 but received 5");
/// ```
#[derive(Debug, Clone)]
pub struct LengthAction {
    bound: LengthBound,
    message: Option<Message>,
}

impl LengthAction {
    pub(crate) fn new(bound: LengthBound) -> Self {
        Self {
            bound,
            message: None,
        }
    }

    /// Sets the message used when the check fails.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn accepts(&self, length: usize) -> bool {
        match self.bound {
            LengthBound::Min(min) => length >= min,
            LengthBound::Max(max) => length <= max,
            LengthBound::Exact(exact) => length == exact,
            LengthBound::NonEmpty => length > 0,
        }
    }
}

/// Returns the length of a string in characters or of an array in items.
pub(crate) fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

impl IssueContext for LengthAction {
    fn kind(&self) -> Kind {
        Kind::Validation
    }

    fn type_name(&self) -> &'static str {
        match self.bound {
            LengthBound::Min(_) => "min_length",
            LengthBound::Max(_) => "max_length",
            LengthBound::Exact(_) => "length",
            LengthBound::NonEmpty => "non_empty",
        }
    }

    fn expects(&self) -> Option<String> {
        Some(match self.bound {
            LengthBound::Min(min) => format!(">={}", min),
            LengthBound::Max(max) => format!("<={}", max),
            LengthBound::Exact(exact) => exact.to_string(),
            LengthBound::NonEmpty => "!0".to_string(),
        })
    }

    fn requirement(&self) -> Option<Value> {
        match self.bound {
            LengthBound::Min(n) | LengthBound::Max(n) | LengthBound::Exact(n) => Some(json!(n)),
            LengthBound::NonEmpty => None,
        }
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl ActionLike for LengthAction {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !dataset.typed {
            return dataset;
        }
        let Some(length) = dataset.value.as_ref().and_then(length_of) else {
            return dataset;
        };
        if !self.accepts(length) {
            add_issue(
                self,
                "length",
                &mut dataset,
                config,
                IssueOverrides::new().received(length.to_string()),
            );
        }
        dataset
    }
}
