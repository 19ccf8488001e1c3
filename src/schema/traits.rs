//! Traits shared by schemas and actions.
//!
//! Every step of a validation, whether a schema, a validation, a
//! transformation, or a metadata annotation, describes itself through
//! [`IssueContext`] and processes a [`Dataset`] through `run`. Keeping the
//! protocol this small is what lets heterogeneous steps nest and compose.

use std::fmt::{self, Display};

use serde_json::Value;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::Message;

use super::pipe::PipeSchema;

/// What kind of step raised an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A type check. Its issues always make the dataset untyped.
    Schema,
    /// A check on an already typed value.
    Validation,
    /// A rewrite of an already typed value.
    Transformation,
    /// Documentation only; never touches the dataset.
    Metadata,
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Schema => "schema",
            Kind::Validation => "validation",
            Kind::Transformation => "transformation",
            Kind::Metadata => "metadata",
        };
        f.write_str(name)
    }
}

/// Identity of the factory that built a schema or action.
///
/// Specific messages in a [`MessageRegistry`](crate::MessageRegistry) are
/// keyed by it, so one registration covers every instance of a factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reference(&'static str);

impl Reference {
    /// Creates a reference from a factory name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the factory name.
    pub fn name(&self) -> &'static str {
        self.0
    }
}

/// Describes a schema or action to the issue builder.
pub trait IssueContext: Send + Sync {
    /// The step kind.
    fn kind(&self) -> Kind;

    /// The discriminator copied into issues (e.g. `"min_length"`).
    fn type_name(&self) -> &'static str;

    /// The factory identity used for specific-message lookups.
    fn reference(&self) -> Reference {
        Reference::new(self.type_name())
    }

    /// Human readable description of what is required.
    fn expects(&self) -> Option<String>;

    /// The raw constraint, if it can be expressed as a value.
    fn requirement(&self) -> Option<Value> {
        None
    }

    /// The instance-level message, if one was set.
    fn message(&self) -> Option<&Message> {
        None
    }
}

/// A schema: checks the shape of a value and produces a typed dataset.
///
/// `run` never panics and never returns an error; every failure is recorded
/// as an issue on the returned dataset.
///
/// # Example
///
/// ```rust
/// use litmus::{Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string())
///     .field("age", Schema::number());
///
/// let dataset = schema.run(Dataset::new(json!({"name": "Ada", "age": 36})), &Config::default());
/// assert!(dataset.is_valid());
/// ```
pub trait SchemaLike: IssueContext {
    /// Validates `dataset.value` and returns the resulting dataset.
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset;

    /// Wraps this schema in a pipe whose first action is `action`.
    fn pipe<A>(self, action: A) -> PipeSchema
    where
        Self: Sized + 'static,
        A: ActionLike + 'static,
    {
        PipeSchema::new(self).pipe(action)
    }
}

/// A pipe step: a validation, a transformation, or metadata.
///
/// Validations only append issues. Transformations rewrite the value and
/// rely on the pipe to hand them a typed dataset.
pub trait ActionLike: IssueContext {
    /// Applies the action to `dataset`.
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset;
}
