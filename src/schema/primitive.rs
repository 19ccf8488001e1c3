//! Leaf schemas for scalar types, literals, and the top and bottom types.

use serde_json::Value;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::{add_issue, join_expects, stringify, IssueOverrides, Message};

use super::traits::{IssueContext, Kind, SchemaLike};

/// Defines a schema that accepts values matching a type predicate.
macro_rules! type_schema {
    ($(#[$doc:meta])* $name:ident, $type_name:literal, $expects:literal, |$value:ident| $check:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            message: Option<Message>,
        }

        impl $name {
            /// Creates the schema.
            pub fn new() -> Self {
                Self::default()
            }

            /// Sets the message used when a value is rejected.
            pub fn message(mut self, message: impl Into<Message>) -> Self {
                self.message = Some(message.into());
                self
            }
        }

        impl IssueContext for $name {
            fn kind(&self) -> Kind {
                Kind::Schema
            }

            fn type_name(&self) -> &'static str {
                $type_name
            }

            fn expects(&self) -> Option<String> {
                Some($expects.to_string())
            }

            fn message(&self) -> Option<&Message> {
                self.message.as_ref()
            }
        }

        impl SchemaLike for $name {
            fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
                let matches = {
                    let $value: Option<&Value> = dataset.value.as_ref();
                    $check
                };
                if matches {
                    dataset.typed = true;
                } else {
                    add_issue(self, "type", &mut dataset, config, IssueOverrides::new());
                }
                dataset
            }
        }
    };
}

type_schema!(
    /// Accepts strings.
    StringSchema, "string", "string", |value| matches!(value, Some(Value::String(_)))
);

type_schema!(
    /// Accepts numbers, integral or not.
    NumberSchema, "number", "number", |value| matches!(value, Some(Value::Number(_)))
);

type_schema!(
    /// Accepts `true` and `false`.
    BooleanSchema, "boolean", "boolean", |value| matches!(value, Some(Value::Bool(_)))
);

type_schema!(
    /// Accepts only `null`.
    NullSchema, "null", "null", |value| matches!(value, Some(Value::Null))
);

type_schema!(
    /// Accepts only an absent value.
    UndefinedSchema, "undefined", "undefined", |value| value.is_none()
);

type_schema!(
    /// Accepts anything without inspecting it.
    AnySchema, "any", "any", |_value| true
);

type_schema!(
    /// Accepts anything, including an absent value.
    UnknownSchema, "unknown", "unknown", |_value| true
);

type_schema!(
    /// Rejects everything.
    NeverSchema, "never", "never", |_value| false
);

/// Accepts exactly one value.
///
/// # Example
///
/// ```rust
/// use litmus::{Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::literal(json!("circle"));
/// let dataset = schema.run(Dataset::new(json!("square")), &Config::default());
///
/// let issue = dataset.issues.unwrap().first().clone();
/// assert_eq!(issue.expected.as_deref(), Some("\"circle\""));
/// assert_eq!(issue.received, "\"square\"");
/// ```
#[derive(Debug, Clone)]
pub struct LiteralSchema {
    literal: Value,
    message: Option<Message>,
}

impl LiteralSchema {
    /// Creates a schema accepting only `literal`.
    pub fn new(literal: Value) -> Self {
        Self {
            literal,
            message: None,
        }
    }

    /// Sets the message used when a value is rejected.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the accepted value.
    pub fn literal(&self) -> &Value {
        &self.literal
    }
}

impl IssueContext for LiteralSchema {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_name(&self) -> &'static str {
        "literal"
    }

    fn expects(&self) -> Option<String> {
        Some(stringify(Some(&self.literal)))
    }

    fn requirement(&self) -> Option<Value> {
        Some(self.literal.clone())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl SchemaLike for LiteralSchema {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if dataset.value.as_ref() == Some(&self.literal) {
            dataset.typed = true;
        } else {
            add_issue(self, "type", &mut dataset, config, IssueOverrides::new());
        }
        dataset
    }
}

/// Accepts any one of a fixed list of values.
#[derive(Debug, Clone)]
pub struct PicklistSchema {
    options: Vec<Value>,
    message: Option<Message>,
}

impl PicklistSchema {
    /// Creates a schema accepting any of `options`.
    pub fn new(options: Vec<Value>) -> Self {
        Self {
            options,
            message: None,
        }
    }

    /// Sets the message used when a value is rejected.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl IssueContext for PicklistSchema {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_name(&self) -> &'static str {
        "picklist"
    }

    fn expects(&self) -> Option<String> {
        Some(join_expects(
            self.options.iter().map(|option| stringify(Some(option))),
            '|',
        ))
    }

    fn requirement(&self) -> Option<Value> {
        Some(Value::Array(self.options.clone()))
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl SchemaLike for PicklistSchema {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let found = dataset
            .value
            .as_ref()
            .is_some_and(|value| self.options.contains(value));
        if found {
            dataset.typed = true;
        } else {
            add_issue(self, "type", &mut dataset, config, IssueOverrides::new());
        }
        dataset
    }
}
