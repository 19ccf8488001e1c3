//! Schema definitions for validation.
//!
//! This module provides the schema types and the [`Schema`] factory. Every
//! schema processes a [`Dataset`](crate::Dataset) and records problems as
//! issues instead of failing fast, unless `abort_early` asks otherwise.
//!
//! # Example
//!
//! ```rust
//! use litmus::{Action, Config, Dataset, Schema, SchemaLike};
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .field("email", Schema::string().pipe(Action::trim()).pipe(Action::min_length(3)))
//!     .field("tags", Schema::array(Schema::string()));
//!
//! let dataset = schema.run(
//!     Dataset::new(json!({"email": " a@b.c ", "tags": ["x"]})),
//!     &Config::default(),
//! );
//! assert!(dataset.is_valid());
//! assert_eq!(dataset.value, Some(json!({"email": "a@b.c", "tags": ["x"]})));
//! ```

mod array;
mod combinators;
mod object;
mod pipe;
mod primitive;
mod traits;
mod variant;
mod wrapper;

use std::sync::Arc;

use serde_json::Value;

pub use array::{ArraySchema, TupleSchema};
pub use combinators::{IntersectSchema, UnionSchema};
pub use object::{Extras, ObjectSchema};
pub use pipe::PipeSchema;
pub use primitive::{
    AnySchema, BooleanSchema, LiteralSchema, NeverSchema, NullSchema, NumberSchema,
    PicklistSchema, StringSchema, UndefinedSchema, UnknownSchema,
};
pub use traits::{ActionLike, IssueContext, Kind, Reference, SchemaLike};
pub use variant::{VariantOption, VariantSchema};
pub use wrapper::{Getter, LazySchema, WrappedSchema};

pub(crate) use array::{take_array, ArrayRun};
pub(crate) use combinators::{IntersectRun, UnionCandidates};
pub(crate) use object::ObjectRun;
pub(crate) use pipe::{halt, should_run};
pub(crate) use variant::{accepts_absent, DiscriminatorSearch};

/// Entry point for creating validation schemas.
///
/// Composite schemas are built up with builder methods (`field`, `item`,
/// `option`). Leaf schemas take an instance message through `message`.
///
/// # Example
///
/// ```rust
/// use litmus::Schema;
/// use serde_json::json;
///
/// let user = Schema::object()
///     .field("name", Schema::string())
///     .field("role", Schema::picklist(vec![json!("admin"), json!("member")]))
///     .field("age", Schema::optional(Schema::number()));
/// ```
pub struct Schema;

impl Schema {
    /// Creates a schema accepting strings.
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a schema accepting numbers.
    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    /// Creates a schema accepting booleans.
    pub fn boolean() -> BooleanSchema {
        BooleanSchema::new()
    }

    /// Creates a schema accepting only `null`.
    pub fn null() -> NullSchema {
        NullSchema::new()
    }

    /// Creates a schema accepting only an absent value.
    pub fn undefined() -> UndefinedSchema {
        UndefinedSchema::new()
    }

    /// Creates a schema accepting any value.
    pub fn any() -> AnySchema {
        AnySchema::new()
    }

    /// Creates a schema accepting any value, including an absent one.
    pub fn unknown() -> UnknownSchema {
        UnknownSchema::new()
    }

    /// Creates a schema rejecting every value.
    pub fn never() -> NeverSchema {
        NeverSchema::new()
    }

    /// Creates a schema accepting exactly `literal`.
    pub fn literal(literal: Value) -> LiteralSchema {
        LiteralSchema::new(literal)
    }

    /// Creates a schema accepting any of `options`.
    pub fn picklist(options: Vec<Value>) -> PicklistSchema {
        PicklistSchema::new(options)
    }

    /// Creates an object schema that drops unknown keys.
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
    /// let dataset = schema.run(Dataset::new(json!({"name": "Bob"})), &Config::default());
    /// let issue = dataset.issues.unwrap().first().clone();
    /// assert_eq!(issue.path.to_string(), "age");
    /// assert_eq!(issue.message, "Invalid type: Expected number but received undefined");
    /// ```
    pub fn object() -> ObjectSchema {
        ObjectSchema::with_extras(Extras::Strip)
    }

    /// Creates an object schema that copies unknown keys unvalidated.
    pub fn loose_object() -> ObjectSchema {
        ObjectSchema::with_extras(Extras::Allow)
    }

    /// Creates an object schema that rejects the first unknown key.
    pub fn strict_object() -> ObjectSchema {
        ObjectSchema::with_extras(Extras::Deny)
    }

    /// Creates an object schema that validates unknown keys against `rest`.
    pub fn object_with_rest<T: SchemaLike + 'static>(rest: T) -> ObjectSchema {
        ObjectSchema::with_extras(Extras::Validate(Arc::new(rest)))
    }

    /// Creates a schema for arrays whose items all match `item`.
    pub fn array<T: SchemaLike + 'static>(item: T) -> ArraySchema {
        ArraySchema::from_item(Arc::new(item))
    }

    /// Creates a tuple schema that drops items past the declared positions.
    pub fn tuple() -> TupleSchema {
        TupleSchema::with_extras(Extras::Strip)
    }

    /// Creates a tuple schema that copies extra items unvalidated.
    pub fn loose_tuple() -> TupleSchema {
        TupleSchema::with_extras(Extras::Allow)
    }

    /// Creates a tuple schema that rejects the first extra item.
    pub fn strict_tuple() -> TupleSchema {
        TupleSchema::with_extras(Extras::Deny)
    }

    /// Creates a tuple schema that validates extra items against `rest`.
    pub fn tuple_with_rest<T: SchemaLike + 'static>(rest: T) -> TupleSchema {
        TupleSchema::with_extras(Extras::Validate(Arc::new(rest)))
    }

    /// Creates an empty union; add options with
    /// [`UnionSchema::option`].
    pub fn union() -> UnionSchema {
        UnionSchema::empty()
    }

    /// Creates a discriminated union on `key`; add options with
    /// [`VariantSchema::option`].
    pub fn variant(key: impl Into<String>) -> VariantSchema {
        VariantSchema::with_key(key)
    }

    /// Creates an empty intersection; add options with
    /// [`IntersectSchema::option`].
    pub fn intersect() -> IntersectSchema {
        IntersectSchema::empty()
    }

    /// Accepts an absent value, otherwise defers to `wrapped`.
    pub fn optional<T: SchemaLike + 'static>(wrapped: T) -> WrappedSchema {
        WrappedSchema::optional(Arc::new(wrapped))
    }

    /// Accepts `null`, otherwise defers to `wrapped`.
    pub fn nullable<T: SchemaLike + 'static>(wrapped: T) -> WrappedSchema {
        WrappedSchema::nullable(Arc::new(wrapped))
    }

    /// Accepts `null` or an absent value, otherwise defers to `wrapped`.
    pub fn nullish<T: SchemaLike + 'static>(wrapped: T) -> WrappedSchema {
        WrappedSchema::nullish(Arc::new(wrapped))
    }

    /// Resolves the schema from the value at run time.
    pub fn lazy<F>(getter: F) -> LazySchema
    where
        F: Fn(Option<&Value>) -> Arc<dyn SchemaLike> + Send + Sync + 'static,
    {
        LazySchema::from_getter(Arc::new(getter))
    }
}
