//! Schemas that wrap another schema: optional, nullable, nullish, and lazy.

use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::dataset::Dataset;

use super::traits::{IssueContext, Kind, SchemaLike};

/// Which values a wrapper accepts without consulting the wrapped schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bypass {
    Undefined,
    Null,
    Both,
}

impl Bypass {
    fn matches(self, value: Option<&Value>) -> bool {
        match (self, value) {
            (Bypass::Undefined | Bypass::Both, None) => true,
            (Bypass::Null | Bypass::Both, Some(Value::Null)) => true,
            _ => false,
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            Bypass::Undefined => "optional",
            Bypass::Null => "nullable",
            Bypass::Both => "nullish",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Bypass::Undefined => "undefined",
            Bypass::Null => "null",
            Bypass::Both => "null | undefined",
        }
    }
}

/// Accepts a missing value (`optional`), `null` (`nullable`), or both
/// (`nullish`), and otherwise delegates to the wrapped schema.
///
/// A default replaces the bypassed value before the wrapped schema sees it.
///
/// # Example
///
/// ```rust
/// use litmus::{Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("role", Schema::optional(Schema::string()).with_default(json!("guest")));
///
/// let dataset = schema.run(Dataset::new(json!({})), &Config::default());
/// assert_eq!(dataset.value, Some(json!({"role": "guest"})));
/// ```
pub struct WrappedSchema<S: ?Sized = dyn SchemaLike> {
    wrapped: Arc<S>,
    bypass: Bypass,
    default: Option<Value>,
}

impl<S: ?Sized> WrappedSchema<S> {
    pub(crate) fn optional(wrapped: Arc<S>) -> Self {
        Self::with_bypass(wrapped, Bypass::Undefined)
    }

    pub(crate) fn nullable(wrapped: Arc<S>) -> Self {
        Self::with_bypass(wrapped, Bypass::Null)
    }

    pub(crate) fn nullish(wrapped: Arc<S>) -> Self {
        Self::with_bypass(wrapped, Bypass::Both)
    }

    fn with_bypass(wrapped: Arc<S>, bypass: Bypass) -> Self {
        Self {
            wrapped,
            bypass,
            default: None,
        }
    }

    /// Substitutes `default` for a bypassed value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns the wrapped schema.
    pub fn wrapped(&self) -> &Arc<S> {
        &self.wrapped
    }

    /// Applies the default and reports whether the wrapped schema can be
    /// skipped. A skipped dataset is already marked typed.
    pub(crate) fn settle(&self, dataset: &mut Dataset) -> bool {
        if !self.bypass.matches(dataset.value.as_ref()) {
            return false;
        }
        if let Some(default) = &self.default {
            dataset.value = Some(default.clone());
        }
        if self.bypass.matches(dataset.value.as_ref()) {
            dataset.typed = true;
            return true;
        }
        false
    }
}

impl<S: IssueContext + ?Sized> IssueContext for WrappedSchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_name(&self) -> &'static str {
        self.bypass.type_name()
    }

    fn expects(&self) -> Option<String> {
        let inner = self.wrapped.expects().unwrap_or_else(|| "unknown".to_string());
        Some(format!("({} | {})", inner, self.bypass.suffix()))
    }
}

impl SchemaLike for WrappedSchema<dyn SchemaLike> {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if self.settle(&mut dataset) {
            return dataset;
        }
        self.wrapped.run(dataset, config)
    }
}

/// Produces the schema for a value on demand.
pub type Getter<S> = Arc<dyn Fn(Option<&Value>) -> Arc<S> + Send + Sync>;

/// Defers schema construction to run time, which allows recursive schemas.
///
/// # Example
///
/// ```rust
/// use litmus::{Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// fn tree() -> Arc<dyn SchemaLike> {
///     Arc::new(
///         Schema::object()
///             .field("value", Schema::number())
///             .field("children", Schema::array(Schema::lazy(|_| tree()))),
///     )
/// }
///
/// let input = json!({"value": 1, "children": [{"value": 2, "children": []}]});
/// assert!(tree().run(Dataset::new(input), &Config::default()).is_valid());
/// ```
pub struct LazySchema<S: ?Sized = dyn SchemaLike> {
    getter: Getter<S>,
}

impl<S: ?Sized> LazySchema<S> {
    pub(crate) fn from_getter(getter: Getter<S>) -> Self {
        Self { getter }
    }

    /// Resolves the schema for `value`.
    pub fn resolve(&self, value: Option<&Value>) -> Arc<S> {
        (self.getter)(value)
    }
}

impl<S: ?Sized> IssueContext for LazySchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_name(&self) -> &'static str {
        "lazy"
    }

    fn expects(&self) -> Option<String> {
        Some("unknown".to_string())
    }
}

impl SchemaLike for LazySchema<dyn SchemaLike> {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        let schema = self.resolve(dataset.value.as_ref());
        schema.run(dataset, config)
    }
}
