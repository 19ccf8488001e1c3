//! String rewrites and pattern checks.

use regex::Regex;
use serde_json::Value;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::{add_issue, IssueOverrides, Message};
use crate::schema::{ActionLike, IssueContext, Kind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rewrite {
    Trim,
    Lower,
    Upper,
}

/// Rewrites a string value; other values pass through untouched.
#[derive(Debug, Clone)]
pub struct StringTransform {
    rewrite: Rewrite,
}

impl StringTransform {
    pub(crate) fn new(rewrite: Rewrite) -> Self {
        Self { rewrite }
    }
}

impl IssueContext for StringTransform {
    fn kind(&self) -> Kind {
        Kind::Transformation
    }

    fn type_name(&self) -> &'static str {
        match self.rewrite {
            Rewrite::Trim => "trim",
            Rewrite::Lower => "to_lower_case",
            Rewrite::Upper => "to_upper_case",
        }
    }

    fn expects(&self) -> Option<String> {
        None
    }
}

impl ActionLike for StringTransform {
    fn run(&self, mut dataset: Dataset, _config: &Config) -> Dataset {
        if let Some(Value::String(s)) = &mut dataset.value {
            *s = match self.rewrite {
                Rewrite::Trim => s.trim().to_string(),
                Rewrite::Lower => s.to_lowercase(),
                Rewrite::Upper => s.to_uppercase(),
            };
        }
        dataset
    }
}

/// Checks a string against a regular expression.
///
/// # Example
///
/// ```rust
/// use litmus::{Action, Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::string().pipe(Action::regex(r"^\d{3}$").unwrap());
/// let dataset = schema.run(Dataset::new(json!("12a")), &Config::default());
///
/// let issue = dataset.issues.unwrap().first().clone();
/// assert_eq!(issue.expected.as_deref(), Some(r"/^\d{3}$/"));
/// ```
#[derive(Debug, Clone)]
pub struct RegexAction {
    regex: Regex,
    message: Option<Message>,
}

impl RegexAction {
    pub(crate) fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            message: None,
        })
    }

    /// Sets the message used when the string does not match.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl IssueContext for RegexAction {
    fn kind(&self) -> Kind {
        Kind::Validation
    }

    fn type_name(&self) -> &'static str {
        "regex"
    }

    fn expects(&self) -> Option<String> {
        Some(format!("/{}/", self.regex.as_str()))
    }

    fn requirement(&self) -> Option<Value> {
        Some(Value::String(self.regex.as_str().to_string()))
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl ActionLike for RegexAction {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !dataset.typed {
            return dataset;
        }
        if let Some(Value::String(s)) = &dataset.value {
            if !self.regex.is_match(s) {
                add_issue(self, "format", &mut dataset, config, IssueOverrides::new());
            }
        }
        dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply<A: ActionLike>(action: &A, value: Value) -> Dataset {
        let mut dataset = Dataset::new(value);
        dataset.typed = true;
        action.run(dataset, &Config::default())
    }

    #[test]
    fn test_rewrites() {
        let trim = StringTransform::new(Rewrite::Trim);
        assert_eq!(apply(&trim, json!("  a b ")).value, Some(json!("a b")));

        let lower = StringTransform::new(Rewrite::Lower);
        assert_eq!(apply(&lower, json!("ÄB")).value, Some(json!("äb")));

        let upper = StringTransform::new(Rewrite::Upper);
        assert_eq!(apply(&upper, json!(1)).value, Some(json!(1)));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(RegexAction::new("(").is_err());
    }

    #[test]
    fn test_regex_mismatch() {
        let action = RegexAction::new("^[a-z]+$").unwrap();
        assert!(apply(&action, json!("abc")).is_valid());

        let issue = apply(&action, json!("ABC")).issues.unwrap().first().clone();
        assert_eq!(issue.message, "Invalid format: Expected /^[a-z]+$/ but received \"ABC\"");
        assert_eq!(issue.requirement, Some(json!("^[a-z]+$")));
    }
}
