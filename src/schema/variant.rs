//! Discriminated unions of object schemas.
//!
//! A [`VariantSchema`] picks an option by its discriminator keys before
//! validating the rest of the object. Options may themselves be variants with
//! a further key, forming a tree; the tree is walked depth first in
//! declaration order.
//!
//! When no option's discriminators accept the input, the reported key is the
//! one that got furthest: a later key in an option's key list outranks an
//! earlier one, and at equal rank a key present in the input outranks an
//! absent one. The issue lists every expectation recorded for that key.

use serde_json::{Map, Value};

use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::{add_issue, join_expects, IssueOverrides, Message};
use crate::path::JsonPath;

use super::object::ObjectSchema;
use super::traits::{IssueContext, Kind, SchemaLike};

/// An option of a variant: an object schema or a nested variant.
pub enum VariantOption<S: ?Sized = dyn SchemaLike> {
    Object(ObjectSchema<S>),
    Variant(VariantSchema<S>),
}

impl<S: ?Sized> From<ObjectSchema<S>> for VariantOption<S> {
    fn from(schema: ObjectSchema<S>) -> Self {
        VariantOption::Object(schema)
    }
}

impl<S: ?Sized> From<VariantSchema<S>> for VariantOption<S> {
    fn from(schema: VariantSchema<S>) -> Self {
        VariantOption::Variant(schema)
    }
}

/// A discriminated union keyed on one or more object entries.
///
/// # Example
///
/// ```rust
/// use litmus::{Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let shape = Schema::variant("type")
///     .option(
///         Schema::object()
///             .field("type", Schema::literal(json!("circle")))
///             .field("radius", Schema::number()),
///     )
///     .option(
///         Schema::object()
///             .field("type", Schema::literal(json!("square")))
///             .field("side", Schema::number()),
///     );
///
/// let dataset = shape.run(Dataset::new(json!({"type": "square", "side": 2})), &Config::default());
/// assert!(dataset.is_valid());
///
/// let dataset = shape.run(Dataset::new(json!({"type": "hexagon"})), &Config::default());
/// let issue = dataset.issues.unwrap().first().clone();
/// assert_eq!(issue.expected.as_deref(), Some("(\"circle\" | \"square\")"));
/// assert_eq!(issue.path.to_string(), "type");
/// ```
pub struct VariantSchema<S: ?Sized = dyn SchemaLike> {
    key: String,
    options: Vec<VariantOption<S>>,
    message: Option<Message>,
}

impl<S: ?Sized> VariantSchema<S> {
    pub(crate) fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            options: Vec::new(),
            message: None,
        }
    }

    /// Appends an object schema or a nested variant.
    pub fn option(mut self, option: impl Into<VariantOption<S>>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Sets the message used for type and discriminator issues.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the discriminator key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Lists every object option with the discriminator keys it must satisfy,
    /// in walk order.
    pub(crate) fn candidates(&self) -> Vec<Candidate<'_, S>> {
        let mut candidates = Vec::new();
        self.collect_candidates(vec![self.key.as_str()], &mut candidates);
        candidates
    }

    fn collect_candidates<'a>(&'a self, keys: Vec<&'a str>, out: &mut Vec<Candidate<'a, S>>) {
        for option in &self.options {
            match option {
                VariantOption::Object(object) => out.push(Candidate {
                    object,
                    keys: keys.clone(),
                }),
                VariantOption::Variant(nested) => {
                    let mut nested_keys = keys.clone();
                    if !nested_keys.contains(&nested.key.as_str()) {
                        nested_keys.push(nested.key.as_str());
                    }
                    nested.collect_candidates(nested_keys, out);
                }
            }
        }
    }
}

impl<S: IssueContext + ?Sized> VariantSchema<S> {
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
}

impl<S: IssueContext + ?Sized> IssueContext for VariantSchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_name(&self) -> &'static str {
        "variant"
    }

    fn expects(&self) -> Option<String> {
        Some("Object".to_string())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl SchemaLike for VariantSchema<dyn SchemaLike> {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let Some(input) = self.take_input(&mut dataset, config) else {
            return dataset;
        };

        let probe = Config::probe();
        let outcome = {
            let mut search = DiscriminatorSearch::new(&self.key, &input);
            'candidates: for candidate in self.candidates() {
                for (priority, key) in candidate.keys.iter().enumerate() {
                    let entry = candidate.object.entry(key);
                    let rejected = match (entry, input.get(*key)) {
                        (Some(schema), Some(value)) => {
                            schema.run(Dataset::new(value.clone()), &probe).has_issues()
                        }
                        (Some(schema), None) => !accepts_absent(schema.as_ref()),
                        (None, _) => true,
                    };
                    if rejected {
                        search.reject(key, priority, entry.and_then(|schema| schema.expects()));
                        continue 'candidates;
                    }
                }
                let result = candidate
                    .object
                    .run(Dataset::new(Value::Object(input.clone())), config);
                search.accept(result);
                if search.is_settled() {
                    break;
                }
            }
            search.finish()
        };

        dataset.value = Some(Value::Object(input));
        outcome.into_dataset(self, dataset, config)
    }
}

/// An object option together with the discriminator keys leading to it.
pub(crate) struct Candidate<'a, S: ?Sized> {
    pub(crate) object: &'a ObjectSchema<S>,
    pub(crate) keys: Vec<&'a str>,
}

/// True if an entry schema accepts a missing key.
pub(crate) fn accepts_absent<C: IssueContext + ?Sized>(schema: &C) -> bool {
    matches!(schema.type_name(), "optional" | "nullish")
}

/// Tracks the best option and the most relevant discriminator failure.
pub(crate) struct DiscriminatorSearch<'a> {
    input: &'a Map<String, Value>,
    output: Option<Dataset>,
    max_priority: usize,
    invalid_key: String,
    expected: Vec<String>,
}

impl<'a> DiscriminatorSearch<'a> {
    pub(crate) fn new(key: &str, input: &'a Map<String, Value>) -> Self {
        Self {
            input,
            output: None,
            max_priority: 0,
            invalid_key: key.to_string(),
            expected: Vec::new(),
        }
    }

    /// Records that the discriminator `key`, at `priority` in its option's
    /// key list, rejected the input.
    pub(crate) fn reject(&mut self, key: &str, priority: usize, expects: Option<String>) {
        let outranks = self.max_priority < priority
            || (self.max_priority == priority
                && self.input.contains_key(key)
                && !self.input.contains_key(&self.invalid_key));
        if self.invalid_key != key && outranks {
            self.max_priority = priority;
            self.invalid_key = key.to_string();
            self.expected.clear();
        }
        if self.invalid_key == key {
            self.expected
                .push(expects.unwrap_or_else(|| "never".to_string()));
        }
    }

    /// Offers the full result of an option whose discriminators matched.
    ///
    /// The first result is kept unless a later one is typed where it is not.
    pub(crate) fn accept(&mut self, candidate: Dataset) {
        let replace = match &self.output {
            None => true,
            Some(current) => !current.typed && candidate.typed,
        };
        if replace {
            self.output = Some(candidate);
        }
    }

    /// True once an option matched without issues.
    pub(crate) fn is_settled(&self) -> bool {
        self.output
            .as_ref()
            .is_some_and(|output| output.issues.is_none())
    }

    pub(crate) fn finish(self) -> VariantOutcome {
        match self.output {
            Some(output) => VariantOutcome::Matched(output),
            None => {
                tracing::trace!(key = %self.invalid_key, "no variant option matched");
                VariantOutcome::Rejected {
                    received: self.input.get(&self.invalid_key).cloned(),
                    expected: join_expects(self.expected, '|'),
                    key: self.invalid_key,
                }
            }
        }
    }
}

/// Result of a discriminator search.
pub(crate) enum VariantOutcome {
    Matched(Dataset),
    Rejected {
        key: String,
        received: Option<Value>,
        expected: String,
    },
}

impl VariantOutcome {
    /// Returns the matched option's dataset, or records the discriminator
    /// issue on `dataset`.
    pub(crate) fn into_dataset<C: IssueContext + ?Sized>(
        self,
        context: &C,
        mut dataset: Dataset,
        config: &Config,
    ) -> Dataset {
        match self {
            VariantOutcome::Matched(output) => output,
            VariantOutcome::Rejected {
                key,
                received,
                expected,
            } => {
                add_issue(
                    context,
                    "type",
                    &mut dataset,
                    config,
                    IssueOverrides::new()
                        .input(received)
                        .expected(expected)
                        .path(JsonPath::from_field(key)),
                );
                dataset
            }
        }
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

    fn literal_option(key: &str, tag: &str) -> ObjectSchema {
        Schema::object().field(key, Schema::literal(json!(tag)))
    }

    #[test]
    fn test_rejects_non_objects() {
        let schema = Schema::variant("type").option(literal_option("type", "a"));
        let dataset = run(&schema, json!([1]));
        let issue = dataset.issues.unwrap().first().clone();
        assert_eq!(issue.expected.as_deref(), Some("Object"));
        assert!(issue.path.is_root());
    }

    #[test]
    fn test_selects_option_by_discriminator() {
        let schema = Schema::variant("type")
            .option(literal_option("type", "a").field("n", Schema::number()))
            .option(literal_option("type", "b").field("s", Schema::string()));

        let dataset = run(&schema, json!({"type": "b", "s": 1}));
        let issue = dataset.issues.unwrap().first().clone();
        assert_eq!(issue.path.to_string(), "s");
        assert_eq!(issue.expected.as_deref(), Some("string"));
    }

    #[test]
    fn test_collects_expectations_of_same_key() {
        let schema = Schema::variant("type")
            .option(literal_option("type", "foo"))
            .option(literal_option("type", "bar"));
        let dataset = run(&schema, json!({"type": "baz"}));
        let issue = dataset.issues.unwrap().first().clone();
        assert_eq!(issue.expected.as_deref(), Some("(\"foo\" | \"bar\")"));
        assert_eq!(issue.received, "\"baz\"");
        assert_eq!(issue.path.to_string(), "type");
        assert_eq!(issue.type_name, "variant");
    }

    #[test]
    fn test_missing_discriminator_reports_undefined() {
        let schema = Schema::variant("type").option(literal_option("type", "foo"));
        let dataset = run(&schema, json!({}));
        let issue = dataset.issues.unwrap().first().clone();
        assert_eq!(issue.received, "undefined");
        assert_eq!(dataset.value, Some(json!({})));
    }

    #[test]
    fn test_nested_variant_reports_deeper_key() {
        let schema = Schema::variant("kind")
            .option(
                Schema::variant("subtype")
                    .option(
                        literal_option("kind", "shape").field("subtype", Schema::literal(json!("circle"))),
                    )
                    .option(
                        literal_option("kind", "shape").field("subtype", Schema::literal(json!("square"))),
                    ),
            )
            .option(literal_option("kind", "color"));

        let dataset = run(&schema, json!({"kind": "shape", "subtype": "hexagon"}));
        let issue = dataset.issues.unwrap().first().clone();
        assert_eq!(issue.path.to_string(), "subtype");
        assert_eq!(issue.expected.as_deref(), Some("(\"circle\" | \"square\")"));
    }

    #[test]
    fn test_variant_without_options_expects_never() {
        let schema = Schema::variant("type");
        let dataset = run(&schema, json!({"type": "x"}));
        assert!(!dataset.typed);
        let issue = dataset.issues.unwrap().first().clone();
        assert_eq!(issue.expected.as_deref(), Some("never"));
        assert_eq!(issue.received, "\"x\"");
        assert_eq!(issue.path.to_string(), "type");
    }

    #[test]
    fn test_optional_discriminator_accepts_absent_key() {
        let schema = Schema::variant("type")
            .option(Schema::object().field("type", Schema::optional(Schema::literal(json!("a")))));
        assert!(run(&schema, json!({})).is_valid());
    }

    #[test]
    fn test_typed_result_preferred_over_untyped() {
        let schema = Schema::variant("type")
            .option(literal_option("type", "a").field("n", Schema::number()))
            .option(literal_option("type", "a").field("n", Schema::any()));
        let dataset = run(&schema, json!({"type": "a", "n": "x"}));
        assert!(dataset.is_valid());
    }

    #[test]
    fn test_reject_prefers_present_key_at_equal_priority() {
        let input = json!({"b": 1});
        let input = input.as_object().unwrap();
        let mut search = DiscriminatorSearch::new("a", input);
        search.reject("a", 0, Some("\"x\"".to_string()));
        search.reject("b", 0, Some("\"y\"".to_string()));
        match search.finish() {
            VariantOutcome::Rejected { key, expected, .. } => {
                assert_eq!(key, "b");
                assert_eq!(expected, "\"y\"");
            }
            VariantOutcome::Matched(_) => panic!("expected a rejection"),
        }
    }
}
