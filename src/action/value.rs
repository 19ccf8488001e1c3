//! Numeric checks: value bounds and integrality.

use std::cmp::Ordering;

use serde_json::Value;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::{add_issue, stringify, IssueOverrides, Message};
use crate::schema::{ActionLike, IssueContext, Kind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueBound {
    Min,
    Max,
}

/// Checks a value against an inclusive bound.
///
/// Numbers compare numerically and strings lexicographically. A value that
/// cannot be compared with the requirement fails the check.
#[derive(Debug, Clone)]
pub struct ValueAction {
    bound: ValueBound,
    requirement: Value,
    message: Option<Message>,
}

impl ValueAction {
    pub(crate) fn new(bound: ValueBound, requirement: Value) -> Self {
        Self {
            bound,
            requirement,
            message: None,
        }
    }

    /// Sets the message used when the check fails.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn accepts(&self, value: &Value) -> bool {
        match (compare(value, &self.requirement), self.bound) {
            (Some(ordering), ValueBound::Min) => ordering != Ordering::Less,
            (Some(ordering), ValueBound::Max) => ordering != Ordering::Greater,
            (None, _) => false,
        }
    }
}

fn compare(value: &Value, requirement: &Value) -> Option<Ordering> {
    match (value, requirement) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

impl IssueContext for ValueAction {
    fn kind(&self) -> Kind {
        Kind::Validation
    }

    fn type_name(&self) -> &'static str {
        match self.bound {
            ValueBound::Min => "min_value",
            ValueBound::Max => "max_value",
        }
    }

    fn expects(&self) -> Option<String> {
        let operator = match self.bound {
            ValueBound::Min => ">=",
            ValueBound::Max => "<=",
        };
        Some(format!("{}{}", operator, stringify(Some(&self.requirement))))
    }

    fn requirement(&self) -> Option<Value> {
        Some(self.requirement.clone())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl ActionLike for ValueAction {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !dataset.typed {
            return dataset;
        }
        let accepted = dataset
            .value
            .as_ref()
            .is_some_and(|value| self.accepts(value));
        if !accepted {
            add_issue(self, "value", &mut dataset, config, IssueOverrides::new());
        }
        dataset
    }
}

/// Checks that a number has no fractional part.
#[derive(Debug, Clone, Default)]
pub struct IntegerAction {
    message: Option<Message>,
}

impl IntegerAction {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sets the message used when the check fails.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0),
        _ => false,
    }
}

impl IssueContext for IntegerAction {
    fn kind(&self) -> Kind {
        Kind::Validation
    }

    fn type_name(&self) -> &'static str {
        "integer"
    }

    fn expects(&self) -> Option<String> {
        None
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl ActionLike for IntegerAction {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if dataset.typed && !dataset.value.as_ref().is_some_and(is_integer) {
            add_issue(self, "integer", &mut dataset, config, IssueOverrides::new());
        }
        dataset
    }
}
