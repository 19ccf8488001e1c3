//! Top-level entry points: parse, safe_parse, and is.
//!
//! These wrap a schema's `run` for callers that want a plain result instead of
//! a [`Dataset`].

use serde_json::Value;
use stillwater::Validation;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::{Issues, ValiError};
use crate::schema::SchemaLike;

#[cfg(feature = "async")]
use crate::asynchronous::AsyncSchemaLike;

/// The outcome of [`safe_parse`].
#[derive(Debug, Clone, PartialEq)]
pub struct SafeParseResult {
    /// Whether the output conforms to the schema's type.
    pub typed: bool,
    /// Whether no issue was recorded.
    pub success: bool,
    /// The output value, possibly transformed.
    pub output: Option<Value>,
    /// Recorded issues, if any.
    pub issues: Option<Issues>,
}

impl SafeParseResult {
    /// Converts the result into a `Validation`, treating any issue as failure.
    pub fn into_validation(self) -> Validation<Option<Value>, Issues> {
        match self.issues {
            Some(issues) => Validation::Failure(issues),
            None => Validation::Success(self.output),
        }
    }
}

impl From<Dataset> for SafeParseResult {
    fn from(dataset: Dataset) -> Self {
        Self {
            typed: dataset.typed,
            success: dataset.issues.is_none(),
            output: dataset.value,
            issues: dataset.issues,
        }
    }
}

fn into_result(dataset: Dataset, type_name: &str) -> Result<Option<Value>, ValiError> {
    match dataset.issues {
        Some(issues) => {
            tracing::debug!(schema = type_name, issues = issues.len(), "parse failed");
            Err(ValiError::new(issues))
        }
        None => Ok(dataset.value),
    }
}

/// Validates `input` and returns the output, or every issue as an error.
///
/// # Errors
///
/// Returns a [`ValiError`] carrying the issues if any was recorded.
///
/// # Example
///
/// ```rust
/// use litmus::{parse, Action, Config, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::string().pipe(Action::trim());
/// assert_eq!(parse(&schema, json!(" hi "), &Config::default()).unwrap(), Some(json!("hi")));
///
/// let err = parse(&schema, json!(1), &Config::default()).unwrap_err();
/// assert_eq!(err.to_string(), "Invalid type: Expected string but received 1");
/// ```
pub fn parse<S>(schema: &S, input: Value, config: &Config) -> Result<Option<Value>, ValiError>
where
    S: SchemaLike + ?Sized,
{
    into_result(schema.run(Dataset::new(input), config), schema.type_name())
}

/// Validates `input` and reports the outcome without failing.
///
/// # Example
///
/// ```rust
/// use litmus::{safe_parse, Config, Schema};
/// use serde_json::json;
///
/// let result = safe_parse(&Schema::number(), json!("1"), &Config::default());
/// assert!(!result.success);
/// assert_eq!(result.issues.unwrap().len(), 1);
/// ```
pub fn safe_parse<S>(schema: &S, input: Value, config: &Config) -> SafeParseResult
where
    S: SchemaLike + ?Sized,
{
    schema.run(Dataset::new(input), config).into()
}

/// Returns true if `input` satisfies `schema`, stopping at the first issue.
pub fn is<S>(schema: &S, input: Value) -> bool
where
    S: SchemaLike + ?Sized,
{
    !schema.run(Dataset::new(input), &Config::probe()).has_issues()
}

/// Async [`parse`].
///
/// # Errors
///
/// Returns a [`ValiError`] carrying the issues if any was recorded.
#[cfg(feature = "async")]
pub async fn parse_async<S>(
    schema: &S,
    input: Value,
    config: &Config,
) -> Result<Option<Value>, ValiError>
where
    S: AsyncSchemaLike + ?Sized,
{
    let dataset = schema.run_async(Dataset::new(input), config).await;
    into_result(dataset, schema.type_name())
}

/// Async [`safe_parse`].
#[cfg(feature = "async")]
pub async fn safe_parse_async<S>(schema: &S, input: Value, config: &Config) -> SafeParseResult
where
    S: AsyncSchemaLike + ?Sized,
{
    schema.run_async(Dataset::new(input), config).await.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    #[test]
    fn test_parse_returns_output() {
        let schema = Schema::object().field("a", Schema::number());
        let output = parse(&schema, json!({"a": 1, "b": 2}), &Config::default()).unwrap();
        assert_eq!(output, Some(json!({"a": 1})));
    }

    #[test]
    fn test_parse_error_carries_all_issues() {
        let schema = Schema::object()
            .field("a", Schema::number())
            .field("b", Schema::number());
        let err = parse(&schema, json!({}), &Config::default()).unwrap_err();
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn test_safe_parse_into_validation() {
        let result = safe_parse(&Schema::string(), json!("ok"), &Config::default());
        assert!(result.success && result.typed);
        assert!(matches!(
            result.into_validation(),
            Validation::Success(Some(output)) if output == json!("ok")
        ));
    }

    #[test]
    fn test_is_uses_abort_early() {
        assert!(is(&Schema::string(), json!("x")));
        assert!(!is(&Schema::array(Schema::string()), json!([1, 2])));
    }
}
