//! Object schema validation.
//!
//! This module provides [`ObjectSchema`] for validating JSON objects entry by
//! entry. The four object flavours differ only in what happens to keys that
//! have no declared entry, see [`Extras`].
//!
//! Entries run in declaration order. Child issues are lifted into the parent
//! with the entry key prepended to their path, and an untyped child makes the
//! whole object untyped. With `abort_early` the first child issue stops the
//! loop and unknown keys are not examined.

use std::ops::ControlFlow;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::{add_issue, IssueOverrides, Message};
use crate::path::{JsonPath, PathSegment};

use super::traits::{IssueContext, Kind, SchemaLike};

/// How keys or items beyond the declared ones are handled.
pub enum Extras<S: ?Sized> {
    /// Dropped from the output.
    Strip,
    /// Copied to the output unvalidated.
    Allow,
    /// The first one raises a single `never` issue.
    Deny,
    /// Each one is validated against the shared schema.
    Validate(Arc<S>),
}

/// A schema for JSON objects with declared entries.
///
/// Build one through [`Schema::object`](crate::Schema::object),
/// [`Schema::loose_object`](crate::Schema::loose_object),
/// [`Schema::strict_object`](crate::Schema::strict_object), or
/// [`Schema::object_with_rest`](crate::Schema::object_with_rest).
///
/// # Example
///
/// ```rust
/// use litmus::{Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string())
///     .field("nickname", Schema::optional(Schema::string()));
///
/// let dataset = schema.run(
///     Dataset::new(json!({"name": "Ada", "extra": true})),
///     &Config::default(),
/// );
///
/// assert!(dataset.is_valid());
/// assert_eq!(dataset.value, Some(json!({"name": "Ada"})));
/// ```
pub struct ObjectSchema<S: ?Sized = dyn SchemaLike> {
    entries: IndexMap<String, Arc<S>>,
    extras: Extras<S>,
    message: Option<Message>,
}

impl<S: ?Sized> ObjectSchema<S> {
    pub(crate) fn with_extras(extras: Extras<S>) -> Self {
        Self {
            entries: IndexMap::new(),
            extras,
            message: None,
        }
    }

    pub(crate) fn insert(&mut self, name: String, schema: Arc<S>) {
        self.entries.insert(name, schema);
    }

    /// Sets the message used when the input is not an object.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the schema declared for `key`.
    pub fn entry(&self, key: &str) -> Option<&Arc<S>> {
        self.entries.get(key)
    }

    /// Returns the declared entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &Arc<S>)> {
        self.entries.iter()
    }

    pub(crate) fn extras(&self) -> &Extras<S> {
        &self.extras
    }

    /// Returns input entries that have no declared schema, in input order.
    pub(crate) fn unknown_entries<'a>(
        &'a self,
        input: &'a Map<String, Value>,
    ) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        input
            .iter()
            .filter(move |(key, _)| !self.entries.contains_key(key.as_str()))
    }
}

impl ObjectSchema<dyn SchemaLike> {
    /// Declares an entry validated by `schema`.
    ///
    /// An absent key is handed to `schema` as an absent value, so wrap the
    /// schema in [`Schema::optional`](crate::Schema::optional) to allow it.
    pub fn field<T>(mut self, name: impl Into<String>, schema: T) -> Self
    where
        T: SchemaLike + 'static,
    {
        self.insert(name.into(), Arc::new(schema));
        self
    }
}

impl<S: IssueContext + ?Sized> ObjectSchema<S> {
    /// Takes the input map out of `dataset`, or records a type issue.
    pub(crate) fn take_input(
        &self,
        dataset: &mut Dataset,
        config: &Config,
    ) -> Option<Map<String, Value>> {
        match dataset.value.take() {
            Some(Value::Object(input)) => Some(input),
            value => {
                dataset.value = value;
                add_issue(self, "type", dataset, config, IssueOverrides::new());
                None
            }
        }
    }

    /// Copies or rejects unknown keys for the `Allow` and `Deny` policies.
    pub(crate) fn apply_static_extras(
        &self,
        run: &mut ObjectRun,
        input: &Map<String, Value>,
        config: &Config,
    ) {
        match &self.extras {
            Extras::Allow => {
                for (key, value) in self.unknown_entries(input) {
                    run.insert(key, value.clone());
                }
            }
            Extras::Deny => {
                if let Some((key, _)) = self.unknown_entries(input).next() {
                    tracing::trace!(key = %key, "rejecting unknown object key");
                    add_issue(
                        self,
                        "key",
                        run.dataset_mut(),
                        config,
                        IssueOverrides::new()
                            .input(Some(Value::String(key.clone())))
                            .expected("never")
                            .path(JsonPath::from_field(key.as_str())),
                    );
                }
            }
            Extras::Strip | Extras::Validate(_) => {}
        }
    }
}

impl<S: IssueContext + ?Sized> IssueContext for ObjectSchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_name(&self) -> &'static str {
        match self.extras {
            Extras::Strip => "object",
            Extras::Allow => "loose_object",
            Extras::Deny => "strict_object",
            Extras::Validate(_) => "object_with_rest",
        }
    }

    fn expects(&self) -> Option<String> {
        Some("Object".to_string())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl SchemaLike for ObjectSchema<dyn SchemaLike> {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let Some(input) = self.take_input(&mut dataset, config) else {
            return dataset;
        };

        let mut run = ObjectRun::new(dataset);
        for (key, schema) in &self.entries {
            let child = schema.run(Dataset::new(input.get(key).cloned()), config);
            if run.merge(key, child, config).is_break() {
                break;
            }
        }

        if run.may_continue(config) {
            if let Extras::Validate(rest) = &self.extras {
                for (key, value) in self.unknown_entries(&input) {
                    let child = rest.run(Dataset::new(value.clone()), config);
                    if run.merge(key, child, config).is_break() {
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

/// Accumulates an object's output while its children are merged in.
pub(crate) struct ObjectRun {
    dataset: Dataset,
    output: Map<String, Value>,
}

impl ObjectRun {
    /// Starts an output for a value already known to be an object.
    pub(crate) fn new(mut dataset: Dataset) -> Self {
        dataset.typed = true;
        Self {
            dataset,
            output: Map::new(),
        }
    }

    /// Merges a child dataset produced for `key`.
    ///
    /// Returns `Break` when `abort_early` requires the caller to stop; the
    /// child's value is not written in that case. An absent child value is
    /// not written either, since a JSON object has no slot for it.
    pub(crate) fn merge(&mut self, key: &str, child: Dataset, config: &Config) -> ControlFlow<()> {
        if let Some(issues) = child.issues {
            self.dataset.absorb(issues, &PathSegment::field(key));
            if config.abort_early {
                self.dataset.typed = false;
                return ControlFlow::Break(());
            }
        }
        if !child.typed {
            self.dataset.typed = false;
        }
        if let Some(value) = child.value {
            self.output.insert(key.to_string(), value);
        }
        ControlFlow::Continue(())
    }

    /// Writes an unvalidated entry.
    pub(crate) fn insert(&mut self, key: &str, value: Value) {
        self.output.insert(key.to_string(), value);
    }

    /// True unless an issue was recorded under `abort_early`.
    pub(crate) fn may_continue(&self, config: &Config) -> bool {
        self.dataset.issues.is_none() || !config.abort_early
    }

    pub(crate) fn dataset_mut(&mut self) -> &mut Dataset {
        &mut self.dataset
    }

    pub(crate) fn finish(mut self) -> Dataset {
        self.dataset.value = Some(Value::Object(self.output));
        self.dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    fn run<S: SchemaLike>(schema: &S, value: Value) -> Dataset {
        schema.run(Dataset::new(value), &Config::default())
    }

    fn person() -> ObjectSchema {
        Schema::object()
            .field("name", Schema::string())
            .field("age", Schema::number())
    }

    #[test]
    fn test_rejects_non_objects() {
        for value in [json!("x"), json!(1), json!(null), json!([1, 2])] {
            let dataset = run(&person(), value.clone());
            assert!(!dataset.typed);
            let issues = dataset.issues.unwrap();
            assert_eq!(issues.len(), 1);
            assert_eq!(issues.first().expected.as_deref(), Some("Object"));
            assert_eq!(dataset.value, Some(value));
        }
    }

    #[test]
    fn test_object_strips_unknown_keys() {
        let dataset = run(&person(), json!({"name": "Ada", "age": 36, "x": 1}));
        assert!(dataset.is_valid());
        assert_eq!(dataset.value, Some(json!({"name": "Ada", "age": 36})));
    }

    #[test]
    fn test_missing_key_is_absent_value() {
        let dataset = run(&person(), json!({"name": "Ada"}));
        assert!(!dataset.typed);
        let issues = dataset.issues.unwrap();
        assert_eq!(issues.first().path.to_string(), "age");
        assert_eq!(issues.first().received, "undefined");
        assert_eq!(dataset.value, Some(json!({"name": "Ada"})));
    }

    #[test]
    fn test_collects_every_entry_issue() {
        let dataset = run(&person(), json!({"name": 1, "age": "old"}));
        let issues = dataset.issues.unwrap();
        let paths: Vec<_> = issues.iter().map(|i| i.path.to_string()).collect();
        assert_eq!(paths, vec!["name", "age"]);
    }

    #[test]
    fn test_abort_early_stops_at_first_entry() {
        let config = Config::new().abort_early(true);
        let dataset = person().run(Dataset::new(json!({"name": 1, "age": "old"})), &config);
        assert!(!dataset.typed);
        assert_eq!(dataset.issues.unwrap().len(), 1);
        assert_eq!(dataset.value, Some(json!({})));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Schema::object().type_name(), "object");
        assert_eq!(Schema::loose_object().type_name(), "loose_object");
        assert_eq!(Schema::strict_object().type_name(), "strict_object");
        assert_eq!(
            Schema::object_with_rest(Schema::string()).type_name(),
            "object_with_rest"
        );
    }

    #[test]
    fn test_entry_lookup() {
        let schema = person();
        assert_eq!(schema.entry("name").unwrap().type_name(), "string");
        assert!(schema.entry("email").is_none());
        assert_eq!(schema.entries().count(), 2);
    }
}
