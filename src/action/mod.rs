//! Pipe actions: validations, transformations, and metadata.
//!
//! Actions are appended to a schema with [`SchemaLike::pipe`](crate::SchemaLike::pipe)
//! and only see values the schema already accepted.
//!
//! # Example
//!
//! ```rust
//! use litmus::{Action, Config, Dataset, Schema, SchemaLike};
//! use serde_json::json;
//!
//! let username = Schema::string()
//!     .pipe(Action::trim())
//!     .pipe(Action::to_lower_case())
//!     .pipe(Action::min_length(3))
//!     .pipe(Action::regex("^[a-z0-9_]+$").unwrap());
//!
//! let dataset = username.run(Dataset::new(json!("  Ada_L ")), &Config::default());
//! assert_eq!(dataset.value, Some(json!("ada_l")));
//! ```

mod custom;
mod length;
mod metadata;
mod string;
mod value;

use std::sync::Arc;

use serde_json::Value;

pub use custom::{CheckAction, TransformAction};
pub use length::LengthAction;
pub use metadata::MetadataAction;
pub use string::{RegexAction, StringTransform};
pub use value::{IntegerAction, ValueAction};

use length::LengthBound;
use string::Rewrite;
use value::ValueBound;

/// Entry point for creating pipe actions.
pub struct Action;

impl Action {
    /// Requires at least `min` characters or items.
    pub fn min_length(min: usize) -> LengthAction {
        LengthAction::new(LengthBound::Min(min))
    }

    /// Allows at most `max` characters or items.
    pub fn max_length(max: usize) -> LengthAction {
        LengthAction::new(LengthBound::Max(max))
    }

    /// Requires exactly `length` characters or items.
    pub fn length(length: usize) -> LengthAction {
        LengthAction::new(LengthBound::Exact(length))
    }

    /// Requires at least one character or item.
    pub fn non_empty() -> LengthAction {
        LengthAction::new(LengthBound::NonEmpty)
    }

    /// Requires a value of at least `min`.
    pub fn min_value(min: impl Into<Value>) -> ValueAction {
        ValueAction::new(ValueBound::Min, min.into())
    }

    /// Requires a value of at most `max`.
    pub fn max_value(max: impl Into<Value>) -> ValueAction {
        ValueAction::new(ValueBound::Max, max.into())
    }

    /// Requires a number without a fractional part.
    pub fn integer() -> IntegerAction {
        IntegerAction::new()
    }

    /// Requires a string matching `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regular expression.
    pub fn regex(pattern: &str) -> Result<RegexAction, regex::Error> {
        RegexAction::new(pattern)
    }

    /// Requires `predicate` to hold for the value.
    pub fn check<F>(predicate: F) -> CheckAction
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        CheckAction::new(Arc::new(predicate))
    }

    /// Removes leading and trailing whitespace.
    pub fn trim() -> StringTransform {
        StringTransform::new(Rewrite::Trim)
    }

    /// Lowercases a string.
    pub fn to_lower_case() -> StringTransform {
        StringTransform::new(Rewrite::Lower)
    }

    /// Uppercases a string.
    pub fn to_upper_case() -> StringTransform {
        StringTransform::new(Rewrite::Upper)
    }

    /// Replaces the value with `mapper(value)`.
    pub fn transform<F>(mapper: F) -> TransformAction
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        TransformAction::new(Arc::new(mapper))
    }

    /// Attaches a description.
    pub fn description(text: impl Into<String>) -> MetadataAction {
        MetadataAction::new("description", text)
    }

    /// Attaches a title.
    pub fn title(text: impl Into<String>) -> MetadataAction {
        MetadataAction::new("title", text)
    }
}
