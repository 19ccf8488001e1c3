//! Asynchronous schemas and actions.
//!
//! The async family mirrors every composite schema. Each composite dispatches
//! its independent children (object entries, array and tuple items, union and
//! intersect options) together and aggregates the results in declaration
//! order, so issue order never depends on completion order. Synchronous
//! schemas and actions implement the async traits too, so they plug into any
//! async composite unchanged.
//!
//! This module is only available with the `async` feature, which is enabled
//! by default.
//!
//! # Example
//!
//! ```rust
//! use litmus::asynchronous::AsyncSchemaLike;
//! use litmus::{Action, Config, Dataset, Schema};
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let schema = Schema::object_async()
//!     .field("name", Schema::string())
//!     .field(
//!         "handle",
//!         Schema::pipe_async(Schema::string())
//!             .pipe(Action::check_async(|v| async move { v != "taken" })),
//!     );
//!
//! let dataset = schema
//!     .run_async(Dataset::new(json!({"name": "Ada", "handle": "taken"})), &Config::default())
//!     .await;
//! assert_eq!(dataset.issues.unwrap().first().path.to_string(), "handle");
//! # });
//! ```

mod action;
mod array;
mod combinators;
mod object;
mod pipe;
mod variant;
mod wrapper;

use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use serde_json::Value;

use crate::action::Action;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::schema::{
    ActionLike, ArraySchema, Extras, IntersectSchema, IssueContext, LazySchema, ObjectSchema,
    PipeSchema, Schema, SchemaLike, TupleSchema, UnionSchema, VariantSchema, WrappedSchema,
};

pub use action::{CheckAsyncAction, TransformAsyncAction};

/// A schema that may suspend while validating.
pub trait AsyncSchemaLike: IssueContext {
    /// Validates `dataset.value` and resolves to the resulting dataset.
    fn run_async<'a>(&'a self, dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset>;
}

/// A pipe step that may suspend.
pub trait AsyncActionLike: IssueContext {
    /// Applies the action to `dataset`.
    fn run_async<'a>(&'a self, dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset>;
}

impl<T: SchemaLike + ?Sized> AsyncSchemaLike for T {
    fn run_async<'a>(&'a self, dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        Box::pin(future::ready(self.run(dataset, config)))
    }
}

impl<T: ActionLike + ?Sized> AsyncActionLike for T {
    fn run_async<'a>(&'a self, dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        Box::pin(future::ready(self.run(dataset, config)))
    }
}

/// Object schema with async entries.
pub type ObjectSchemaAsync = ObjectSchema<dyn AsyncSchemaLike>;
/// Array schema with an async item schema.
pub type ArraySchemaAsync = ArraySchema<dyn AsyncSchemaLike>;
/// Tuple schema with async item schemas.
pub type TupleSchemaAsync = TupleSchema<dyn AsyncSchemaLike>;
/// Union of async options.
pub type UnionSchemaAsync = UnionSchema<dyn AsyncSchemaLike>;
/// Intersection of async options.
pub type IntersectSchemaAsync = IntersectSchema<dyn AsyncSchemaLike>;
/// Discriminated union of async object schemas.
pub type VariantSchemaAsync = VariantSchema<dyn AsyncSchemaLike>;
/// Optional, nullable, or nullish wrapper around an async schema.
pub type WrappedSchemaAsync = WrappedSchema<dyn AsyncSchemaLike>;
/// Lazily resolved async schema.
pub type LazySchemaAsync = LazySchema<dyn AsyncSchemaLike>;
/// Async schema followed by async actions.
pub type PipeSchemaAsync = PipeSchema<dyn AsyncSchemaLike, dyn AsyncActionLike>;

impl Schema {
    /// Async [`Schema::object`].
    pub fn object_async() -> ObjectSchemaAsync {
        ObjectSchema::with_extras(Extras::Strip)
    }

    /// Async [`Schema::loose_object`].
    pub fn loose_object_async() -> ObjectSchemaAsync {
        ObjectSchema::with_extras(Extras::Allow)
    }

    /// Async [`Schema::strict_object`].
    pub fn strict_object_async() -> ObjectSchemaAsync {
        ObjectSchema::with_extras(Extras::Deny)
    }

    /// Async [`Schema::object_with_rest`].
    pub fn object_with_rest_async<T: AsyncSchemaLike + 'static>(rest: T) -> ObjectSchemaAsync {
        ObjectSchema::with_extras(Extras::Validate(Arc::new(rest)))
    }

    /// Async [`Schema::array`].
    pub fn array_async<T: AsyncSchemaLike + 'static>(item: T) -> ArraySchemaAsync {
        ArraySchema::from_item(Arc::new(item))
    }

    /// Async [`Schema::tuple`].
    pub fn tuple_async() -> TupleSchemaAsync {
        TupleSchema::with_extras(Extras::Strip)
    }

    /// Async [`Schema::loose_tuple`].
    pub fn loose_tuple_async() -> TupleSchemaAsync {
        TupleSchema::with_extras(Extras::Allow)
    }

    /// Async [`Schema::strict_tuple`].
    pub fn strict_tuple_async() -> TupleSchemaAsync {
        TupleSchema::with_extras(Extras::Deny)
    }

    /// Async [`Schema::tuple_with_rest`].
    pub fn tuple_with_rest_async<T: AsyncSchemaLike + 'static>(rest: T) -> TupleSchemaAsync {
        TupleSchema::with_extras(Extras::Validate(Arc::new(rest)))
    }

    /// Async [`Schema::union`].
    pub fn union_async() -> UnionSchemaAsync {
        UnionSchema::empty()
    }

    /// Async [`Schema::variant`].
    pub fn variant_async(key: impl Into<String>) -> VariantSchemaAsync {
        VariantSchema::with_key(key)
    }

    /// Async [`Schema::intersect`].
    pub fn intersect_async() -> IntersectSchemaAsync {
        IntersectSchema::empty()
    }

    /// Async [`Schema::optional`].
    pub fn optional_async<T: AsyncSchemaLike + 'static>(wrapped: T) -> WrappedSchemaAsync {
        WrappedSchema::optional(Arc::new(wrapped))
    }

    /// Async [`Schema::nullable`].
    pub fn nullable_async<T: AsyncSchemaLike + 'static>(wrapped: T) -> WrappedSchemaAsync {
        WrappedSchema::nullable(Arc::new(wrapped))
    }

    /// Async [`Schema::nullish`].
    pub fn nullish_async<T: AsyncSchemaLike + 'static>(wrapped: T) -> WrappedSchemaAsync {
        WrappedSchema::nullish(Arc::new(wrapped))
    }

    /// Async [`Schema::lazy`].
    pub fn lazy_async<F>(getter: F) -> LazySchemaAsync
    where
        F: Fn(Option<&Value>) -> Arc<dyn AsyncSchemaLike> + Send + Sync + 'static,
    {
        LazySchema::from_getter(Arc::new(getter))
    }

    /// Starts an async pipe with `schema` as its base; append actions with
    /// [`PipeSchema::pipe`].
    pub fn pipe_async<T: AsyncSchemaLike + 'static>(schema: T) -> PipeSchemaAsync {
        PipeSchema::from_parts(Arc::new(schema))
    }
}

impl Action {
    /// Requires the future returned by `predicate` to resolve to `true`.
    pub fn check_async<F, Fut>(predicate: F) -> CheckAsyncAction
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        CheckAsyncAction::new(Arc::new(move |value: Value| -> BoxFuture<'static, bool> {
            Box::pin(predicate(value))
        }))
    }

    /// Replaces the value with the output of the future returned by `mapper`.
    pub fn transform_async<F, Fut>(mapper: F) -> TransformAsyncAction
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        TransformAsyncAction::new(Arc::new(move |value: Value| -> BoxFuture<'static, Value> {
            Box::pin(mapper(value))
        }))
    }
}
