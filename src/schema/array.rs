//! Array and tuple schema validation.
//!
//! This module provides [`ArraySchema`], which validates every item against
//! one schema, and [`TupleSchema`], which validates items positionally. Tuples
//! share the object flavours for items beyond the declared ones, see
//! [`Extras`].
//!
//! Output arrays keep one slot per validated item. An item whose output is
//! absent is written as `null`.

use std::ops::ControlFlow;
use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::{add_issue, IssueOverrides, Message};
use crate::path::{JsonPath, PathSegment};

use super::object::Extras;
use super::traits::{IssueContext, Kind, SchemaLike};

/// A schema for arrays whose items all share one schema.
///
/// # Example
///
/// ```rust
/// use litmus::{Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::array(Schema::string());
///
/// let dataset = schema.run(Dataset::new(json!(["a", 1, "c"])), &Config::default());
/// let issues = dataset.issues.unwrap();
/// assert_eq!(issues.len(), 1);
/// assert_eq!(issues.first().path.to_string(), "[1]");
/// ```
pub struct ArraySchema<S: ?Sized = dyn SchemaLike> {
    item: Arc<S>,
    message: Option<Message>,
}

impl<S: ?Sized> ArraySchema<S> {
    pub(crate) fn from_item(item: Arc<S>) -> Self {
        Self {
            item,
            message: None,
        }
    }

    /// Sets the message used when the input is not an array.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the item schema.
    pub fn item(&self) -> &Arc<S> {
        &self.item
    }
}

impl<S: IssueContext + ?Sized> IssueContext for ArraySchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_name(&self) -> &'static str {
        "array"
    }

    fn expects(&self) -> Option<String> {
        Some("Array".to_string())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl SchemaLike for ArraySchema<dyn SchemaLike> {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let Some(input) = take_array(self, &mut dataset, config) else {
            return dataset;
        };

        let mut run = ArrayRun::new(dataset);
        for (index, item) in input.into_iter().enumerate() {
            let child = self.item.run(Dataset::new(item), config);
            if run.merge(index, child, config).is_break() {
                break;
            }
        }
        run.finish()
    }
}

/// A schema for fixed-position arrays.
///
/// Declared positions missing from the input are validated as absent values.
///
/// # Example
///
/// ```rust
/// use litmus::{Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let point = Schema::strict_tuple()
///     .item(Schema::number())
///     .item(Schema::number());
///
/// let dataset = point.run(Dataset::new(json!([1, 2, 3])), &Config::default());
/// let issue = dataset.issues.unwrap().first().clone();
/// assert_eq!(issue.expected.as_deref(), Some("never"));
/// assert_eq!(issue.path.to_string(), "[2]");
/// ```
pub struct TupleSchema<S: ?Sized = dyn SchemaLike> {
    items: Vec<Arc<S>>,
    extras: Extras<S>,
    message: Option<Message>,
}

impl<S: ?Sized> TupleSchema<S> {
    pub(crate) fn with_extras(extras: Extras<S>) -> Self {
        Self {
            items: Vec::new(),
            extras,
            message: None,
        }
    }

    pub(crate) fn push(&mut self, item: Arc<S>) {
        self.items.push(item);
    }

    /// Sets the message used when the input is not an array.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the number of declared positions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no position is declared.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn items(&self) -> &[Arc<S>] {
        &self.items
    }

    pub(crate) fn extras(&self) -> &Extras<S> {
        &self.extras
    }
}

impl TupleSchema<dyn SchemaLike> {
    /// Declares the next position.
    pub fn item<T: SchemaLike + 'static>(mut self, schema: T) -> Self {
        self.push(Arc::new(schema));
        self
    }
}

impl<S: IssueContext + ?Sized> TupleSchema<S> {
    /// Copies or rejects items past the declared positions for the `Allow`
    /// and `Deny` policies.
    pub(crate) fn apply_static_extras(&self, run: &mut ArrayRun, input: &[Value], config: &Config) {
        let declared = self.items.len();
        match &self.extras {
            Extras::Allow => {
                for value in input.iter().skip(declared) {
                    run.push(value.clone());
                }
            }
            Extras::Deny => {
                if let Some(first) = input.get(declared) {
                    tracing::trace!(index = declared, "rejecting extra tuple item");
                    add_issue(
                        self,
                        "type",
                        run.dataset_mut(),
                        config,
                        IssueOverrides::new()
                            .input(Some(first.clone()))
                            .expected("never")
                            .path(JsonPath::from_index(declared)),
                    );
                }
            }
            Extras::Strip | Extras::Validate(_) => {}
        }
    }
}

impl<S: IssueContext + ?Sized> IssueContext for TupleSchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_name(&self) -> &'static str {
        match self.extras {
            Extras::Strip => "tuple",
            Extras::Allow => "loose_tuple",
            Extras::Deny => "strict_tuple",
            Extras::Validate(_) => "tuple_with_rest",
        }
    }

    fn expects(&self) -> Option<String> {
        Some("Array".to_string())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl SchemaLike for TupleSchema<dyn SchemaLike> {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let Some(input) = take_array(self, &mut dataset, config) else {
            return dataset;
        };

        let mut run = ArrayRun::new(dataset);
        for (index, schema) in self.items.iter().enumerate() {
            let child = schema.run(Dataset::new(input.get(index).cloned()), config);
            if run.merge(index, child, config).is_break() {
                break;
            }
        }

        if run.may_continue(config) {
            if let Extras::Validate(rest) = &self.extras {
                for (index, value) in input.iter().enumerate().skip(self.items.len()) {
                    let child = rest.run(Dataset::new(value.clone()), config);
                    if run.merge(index, child, config).is_break() {
                        break;
                    }
                }
            } else {
                self.apply_static_extras(&mut run, &input, config);
            }
        }

        run.finish()
    }
}

/// Takes the input items out of `dataset`, or records a type issue.
pub(crate) fn take_array<C: IssueContext + ?Sized>(
    context: &C,
    dataset: &mut Dataset,
    config: &Config,
) -> Option<Vec<Value>> {
    match dataset.value.take() {
        Some(Value::Array(items)) => Some(items),
        value => {
            dataset.value = value;
            add_issue(context, "type", dataset, config, IssueOverrides::new());
            None
        }
    }
}

/// Accumulates an array's output while its children are merged in.
pub(crate) struct ArrayRun {
    dataset: Dataset,
    output: Vec<Value>,
}

impl ArrayRun {
    pub(crate) fn new(mut dataset: Dataset) -> Self {
        dataset.typed = true;
        Self {
            dataset,
            output: Vec::new(),
        }
    }

    /// Merges the child dataset produced for position `index`.
    ///
    /// Returns `Break` when `abort_early` requires the caller to stop.
    pub(crate) fn merge(&mut self, index: usize, child: Dataset, config: &Config) -> ControlFlow<()> {
        if let Some(issues) = child.issues {
            self.dataset.absorb(issues, &PathSegment::index(index));
            if config.abort_early {
                self.dataset.typed = false;
                return ControlFlow::Break(());
            }
        }
        if !child.typed {
            self.dataset.typed = false;
        }
        self.output.push(child.value.unwrap_or(Value::Null));
        ControlFlow::Continue(())
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.output.push(value);
    }

    pub(crate) fn may_continue(&self, config: &Config) -> bool {
        self.dataset.issues.is_none() || !config.abort_early
    }

    pub(crate) fn dataset_mut(&mut self) -> &mut Dataset {
        &mut self.dataset
    }

    pub(crate) fn finish(mut self) -> Dataset {
        self.dataset.value = Some(Value::Array(self.output));
        self.dataset
    }
}
