//! Issue construction and message resolution.
//!
//! Every schema and action records a failure through [`add_issue`]. It builds
//! the [`Issue`], resolves its message from the tightest scope that defines
//! one, flips the dataset to untyped for schema-kind contexts, and appends the
//! issue.
//!
//! Message priority, first defined wins:
//!
//! 1. [`IssueOverrides::message`]
//! 2. the context's instance-level message
//! 3. the registry's specific message for the context's [`Reference`](crate::Reference)
//! 4. the registry's schema message (schema-kind contexts only)
//! 5. [`Config::message`]
//! 6. the registry's global message
//! 7. the default `Invalid {label}: ...` template

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use serde_json::Value;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::{Issue, Issues};
use crate::path::JsonPath;
use crate::schema::{IssueContext, Kind};

/// A message source: literal text or a function of the partially built issue.
///
/// # Example
///
/// ```rust
/// use litmus::{Config, Dataset, Message, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::number().message(Message::dynamic(|issue| {
///     format!("{} is not a number", issue.received)
/// }));
///
/// let dataset = schema.run(Dataset::new(json!("ten")), &Config::default());
/// assert_eq!(dataset.issues.unwrap().first().message, "\"ten\" is not a number");
/// ```
#[derive(Clone)]
pub enum Message {
    /// A fixed message.
    Text(String),
    /// A message computed from the issue it describes.
    Dynamic(Arc<dyn Fn(&Issue) -> String + Send + Sync>),
}

impl Message {
    /// Creates a fixed message.
    pub fn text(message: impl Into<String>) -> Self {
        Message::Text(message.into())
    }

    /// Creates a message computed from the issue.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&Issue) -> String + Send + Sync + 'static,
    {
        Message::Dynamic(Arc::new(f))
    }

    /// Produces the message text for `issue`.
    pub fn render(&self, issue: &Issue) -> String {
        match self {
            Message::Text(text) => text.clone(),
            Message::Dynamic(f) => f(issue),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Message::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for Message {
    fn from(message: &str) -> Self {
        Message::Text(message.to_string())
    }
}

impl From<String> for Message {
    fn from(message: String) -> Self {
        Message::Text(message)
    }
}

/// Per-call replacements for the fields [`add_issue`] would otherwise derive.
#[derive(Debug, Default)]
pub struct IssueOverrides {
    input: Option<Option<Value>>,
    expected: Option<String>,
    received: Option<String>,
    message: Option<Message>,
    issues: Option<Issues>,
    path: Option<JsonPath>,
}

impl IssueOverrides {
    /// Creates an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `input` instead of the dataset's value.
    pub fn input(mut self, input: Option<Value>) -> Self {
        self.input = Some(input);
        self
    }

    /// Reports `expected` instead of the context's `expects`.
    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Reports `received` instead of the stringified input.
    pub fn received(mut self, received: impl Into<String>) -> Self {
        self.received = Some(received.into());
        self
    }

    /// Uses `message` ahead of every other message source.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches sub-issues.
    pub fn issues(mut self, issues: Option<Issues>) -> Self {
        self.issues = issues;
        self
    }

    /// Locates the issue relative to the raising context.
    pub fn path(mut self, path: JsonPath) -> Self {
        self.path = Some(path);
        self
    }
}

/// Builds an issue for `context` and appends it to `dataset`.
///
/// `label` names what was invalid in the default message, e.g. `"type"` or
/// `"length"`. Schema-kind contexts also mark the dataset untyped.
///
/// # Example
///
/// ```rust
/// use litmus::message::{add_issue, IssueOverrides};
/// use litmus::{Config, Dataset, Schema};
/// use serde_json::json;
///
/// let schema = Schema::string();
/// let mut dataset = Dataset::new(json!(true));
/// add_issue(&schema, "type", &mut dataset, &Config::default(), IssueOverrides::new());
///
/// let issues = dataset.issues.unwrap();
/// assert_eq!(issues.first().message, "Invalid type: Expected string but received true");
/// assert!(!dataset.typed);
/// ```
pub fn add_issue<C>(
    context: &C,
    label: &str,
    dataset: &mut Dataset,
    config: &Config,
    overrides: IssueOverrides,
) where
    C: IssueContext + ?Sized,
{
    let input = match overrides.input {
        Some(input) => input,
        None => dataset.value.clone(),
    };
    let expected = overrides.expected.or_else(|| context.expects());
    let received = overrides
        .received
        .unwrap_or_else(|| stringify(input.as_ref()));
    let default_message = match &expected {
        Some(expected) => format!(
            "Invalid {}: Expected {} but received {}",
            label, expected, received
        ),
        None => format!("Invalid {}: Received {}", label, received),
    };

    let mut issue = Issue {
        kind: context.kind(),
        type_name: context.type_name(),
        input,
        expected,
        received,
        message: default_message,
        requirement: context.requirement(),
        path: overrides.path.unwrap_or_default(),
        issues: overrides.issues.map(Box::new),
        lang: config.lang.clone(),
        abort_early: config.abort_early,
        abort_pipe_early: config.abort_pipe_early,
    };

    let is_schema = context.kind() == Kind::Schema;
    let lang = config.lang.as_deref();
    let registry = config.messages();
    let message = overrides
        .message
        .or_else(|| context.message().cloned())
        .or_else(|| registry.and_then(|r| r.specific_message(context.reference(), lang)))
        .or_else(|| {
            if is_schema {
                registry.and_then(|r| r.schema_message(lang))
            } else {
                None
            }
        })
        .or_else(|| config.message.clone())
        .or_else(|| registry.and_then(|r| r.global_message(lang)));

    if let Some(message) = message {
        let rendered = message.render(&issue);
        if !rendered.is_empty() {
            issue.message = rendered;
        }
    }
    if is_schema {
        dataset.typed = false;
    }
    dataset.push_issue(issue);
}

/// Renders a value the way issue messages display it.
///
/// Strings are quoted, scalars use their natural form, arrays and objects
/// collapse to `Array` and `Object`, and an absent value is `undefined`.
pub fn stringify(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64()
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| n.to_string())
            }
        }
        Some(Value::String(s)) => format!("\"{}\"", s),
        Some(Value::Array(_)) => "Array".to_string(),
        Some(Value::Object(_)) => "Object".to_string(),
    }
}

/// Joins expectation strings with `separator`, dropping duplicates.
///
/// A single distinct value is returned as is, several are parenthesised, and
/// none yields `never`.
pub fn join_expects<I>(values: I, separator: char) -> String
where
    I: IntoIterator<Item = String>,
{
    let list: IndexSet<String> = values.into_iter().collect();
    match list.len() {
        0 => "never".to_string(),
        1 => list.into_iter().next().unwrap_or_default(),
        _ => format!(
            "({})",
            list.into_iter()
                .collect::<Vec<_>>()
                .join(&format!(" {} ", separator))
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MessageRegistry;
    use crate::schema::{Reference, Schema, StringSchema};
    use serde_json::json;

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(None), "undefined");
        assert_eq!(stringify(Some(&json!(null))), "null");
        assert_eq!(stringify(Some(&json!("baz"))), "\"baz\"");
        assert_eq!(stringify(Some(&json!(12))), "12");
        assert_eq!(stringify(Some(&json!(-3))), "-3");
        assert_eq!(stringify(Some(&json!(1.5))), "1.5");
        assert_eq!(stringify(Some(&json!(2.0))), "2");
        assert_eq!(stringify(Some(&json!(false))), "false");
        assert_eq!(stringify(Some(&json!([1]))), "Array");
        assert_eq!(stringify(Some(&json!({"a": 1}))), "Object");
    }

    #[test]
    fn test_join_expects() {
        assert_eq!(join_expects(Vec::<String>::new(), '|'), "never");
        assert_eq!(join_expects(vec!["string".to_string()], '|'), "string");
        assert_eq!(
            join_expects(
                vec!["\"foo\"".to_string(), "\"bar\"".to_string(), "\"foo\"".to_string()],
                '|'
            ),
            "(\"foo\" | \"bar\")"
        );
        assert_eq!(
            join_expects(vec!["Object".to_string(), "Array".to_string()], '&'),
            "(Object & Array)"
        );
    }

    #[test]
    fn test_default_message_without_expected() {
        let check = crate::action::Action::check(|_| false);
        let mut dataset = Dataset::new(json!(3));
        dataset.typed = true;
        add_issue(&check, "input", &mut dataset, &Config::default(), IssueOverrides::new());

        let issues = dataset.issues.unwrap();
        assert_eq!(issues.first().message, "Invalid input: Received 3");
        assert!(issues.first().expected.is_none());
        assert!(dataset.typed);
    }

    #[test]
    fn test_overrides_replace_derived_fields() {
        let schema = Schema::string();
        let mut dataset = Dataset::new(json!({"k": 1}));
        add_issue(
            &schema,
            "type",
            &mut dataset,
            &Config::default(),
            IssueOverrides::new()
                .input(Some(json!(1)))
                .expected("never")
                .received("unknown")
                .path(JsonPath::from_field("k")),
        );

        let issue = dataset.issues.unwrap().first().clone();
        assert_eq!(issue.input, Some(json!(1)));
        assert_eq!(issue.message, "Invalid type: Expected never but received unknown");
        assert_eq!(issue.path.to_string(), "k");
    }

    #[test]
    fn test_message_priority_chain() {
        let registry = Arc::new(MessageRegistry::new());
        registry.set_global_message("global", None);
        let run = |schema: &StringSchema, config: &Config| {
            let mut dataset = Dataset::new(json!(1));
            add_issue(schema, "type", &mut dataset, config, IssueOverrides::new());
            dataset.issues.unwrap().first().message.clone()
        };

        let config = Config::new().with_messages(Arc::clone(&registry));
        assert_eq!(run(&Schema::string(), &config), "global");

        let config = config.with_message("config");
        assert_eq!(run(&Schema::string(), &config), "config");

        registry.set_schema_message("schema", None);
        assert_eq!(run(&Schema::string(), &config), "schema");

        registry.set_specific_message(Reference::new("string"), "specific", None);
        assert_eq!(run(&Schema::string(), &config), "specific");

        assert_eq!(run(&Schema::string().message("context"), &config), "context");
    }

    #[test]
    fn test_schema_message_skipped_for_actions() {
        let registry = Arc::new(MessageRegistry::new());
        registry.set_schema_message("schema", None);
        let config = Config::new().with_messages(registry).with_message("config");

        let check = crate::action::Action::check(|_| false);
        let mut dataset = Dataset::new(json!(3));
        dataset.typed = true;
        add_issue(&check, "input", &mut dataset, &config, IssueOverrides::new());

        assert_eq!(dataset.issues.unwrap().first().message, "config");
    }

    #[test]
    fn test_dynamic_message_sees_partial_issue() {
        let schema = Schema::string();
        let mut dataset = Dataset::new(json!(7));
        add_issue(
            &schema,
            "type",
            &mut dataset,
            &Config::default(),
            IssueOverrides::new().message(Message::dynamic(|issue| {
                format!("{} / {}", issue.type_name, issue.message)
            })),
        );
        assert_eq!(
            dataset.issues.unwrap().first().message,
            "string / Invalid type: Expected string but received 7"
        );
    }

    #[test]
    fn test_empty_message_falls_back_to_default() {
        let schema = Schema::string();
        let mut dataset = Dataset::new(json!(false));
        add_issue(
            &schema,
            "type",
            &mut dataset,
            &Config::new().with_message(""),
            IssueOverrides::new(),
        );
        assert_eq!(
            dataset.issues.unwrap().first().message,
            "Invalid type: Expected string but received false"
        );
    }
}
