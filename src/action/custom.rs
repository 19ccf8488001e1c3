//! User supplied checks and transformations.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::{add_issue, IssueOverrides, Message};
use crate::schema::{ActionLike, IssueContext, Kind};

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
type Mapper = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Validates a typed value with a predicate.
///
/// An absent value is presented to the predicate as `null`.
///
/// # Example
///
/// ```rust
/// use litmus::{Action, Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let even = Schema::number()
///     .pipe(Action::check(|v| v.as_i64().is_some_and(|n| n % 2 == 0)).message("must be even"));
///
/// let dataset = even.run(Dataset::new(json!(3)), &Config::default());
/// assert_eq!(dataset.issues.unwrap().first().message, "must be even");
/// ```
#[derive(Clone)]
pub struct CheckAction {
    predicate: Predicate,
    message: Option<Message>,
}

impl CheckAction {
    pub(crate) fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            message: None,
        }
    }

    /// Sets the message used when the predicate fails.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Debug for CheckAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckAction")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl IssueContext for CheckAction {
    fn kind(&self) -> Kind {
        Kind::Validation
    }

    fn type_name(&self) -> &'static str {
        "check"
    }

    fn expects(&self) -> Option<String> {
        None
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl ActionLike for CheckAction {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !dataset.typed {
            return dataset;
        }
        let passed = (self.predicate)(dataset.value.as_ref().unwrap_or(&Value::Null));
        if !passed {
            add_issue(self, "input", &mut dataset, config, IssueOverrides::new());
        }
        dataset
    }
}

/// Replaces a present value with the result of a function.
#[derive(Clone)]
pub struct TransformAction {
    mapper: Mapper,
}

impl TransformAction {
    pub(crate) fn new(mapper: Mapper) -> Self {
        Self { mapper }
    }
}

impl fmt::Debug for TransformAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformAction").finish_non_exhaustive()
    }
}

impl IssueContext for TransformAction {
    fn kind(&self) -> Kind {
        Kind::Transformation
    }

    fn type_name(&self) -> &'static str {
        "transform"
    }

    fn expects(&self) -> Option<String> {
        None
    }
}

impl ActionLike for TransformAction {
    fn run(&self, mut dataset: Dataset, _config: &Config) -> Dataset {
        dataset.value = dataset.value.take().map(|value| (self.mapper)(value));
        dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_only_runs_on_typed_datasets() {
        let action = CheckAction::new(Arc::new(|_: &Value| false));
        let dataset = action.run(Dataset::new(json!(1)), &Config::default());
        assert!(dataset.issues.is_none());

        let mut typed = Dataset::new(json!(1));
        typed.typed = true;
        let dataset = action.run(typed, &Config::default());
        let issue = dataset.issues.unwrap().first().clone();
        assert_eq!(issue.kind, Kind::Validation);
        assert_eq!(issue.message, "Invalid input: Received 1");
    }

    #[test]
    fn test_transform_maps_present_values() {
        let action = TransformAction::new(Arc::new(|v: Value| json!(v.to_string().len())));
        let mut dataset = Dataset::new(json!("abc"));
        dataset.typed = true;
        assert_eq!(action.run(dataset, &Config::default()).value, Some(json!(5)));

        let dataset = action.run(Dataset::undefined(), &Config::default());
        assert_eq!(dataset.value, None);
    }
}
