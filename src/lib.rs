//! # Litmus
//!
//! A composable validation and transformation engine for JSON values that
//! records every issue it finds instead of stopping at the first one.
//!
//! ## Overview
//!
//! Schemas check the shape of a value, actions validate or rewrite values the
//! schema already accepted, and composite schemas (objects, arrays, tuples,
//! unions, variants, intersections) nest both arbitrarily. Every step shares
//! one protocol: it receives a [`Dataset`] and returns it, possibly with a new
//! value, a changed typed-ness, or more issues. Nothing panics and nothing
//! returns an error mid-run; failure is data.
//!
//! ## Core Types
//!
//! - [`Dataset`]: the value under validation, whether it is typed, and its issues
//! - [`Issue`] / [`Issues`]: a single problem and a non-empty list of them
//! - [`JsonPath`]: where an issue sits in the input (e.g. `users[0].email`)
//! - [`Schema`] / [`Action`]: factories for schemas and pipe actions
//! - [`Config`]: language, message overrides, and abort behaviour for one run
//! - [`MessageRegistry`]: shared message stores consulted when issues are built
//!
//! ## Example
//!
//! ```rust
//! use litmus::{safe_parse, Action, Config, Schema, SchemaLike};
//! use serde_json::json;
//!
//! let user = Schema::object()
//!     .field("name", Schema::string().pipe(Action::trim()).pipe(Action::non_empty()))
//!     .field("age", Schema::number().pipe(Action::integer()).pipe(Action::min_value(0)))
//!     .field("tags", Schema::array(Schema::string()));
//!
//! let result = safe_parse(
//!     &user,
//!     json!({"name": "  ", "age": 1.5, "tags": ["a", 2]}),
//!     &Config::default(),
//! );
//!
//! assert!(!result.success);
//! let flat = result.issues.unwrap().flatten();
//! assert_eq!(flat.nested.keys().collect::<Vec<_>>(), vec!["name", "age", "tags.1"]);
//! ```

pub mod action;
pub mod config;
pub mod dataset;
pub mod error;
pub mod message;
pub mod parse;
pub mod path;
pub mod registry;
pub mod schema;

#[cfg(feature = "async")]
pub mod asynchronous;

pub use action::Action;
pub use config::Config;
pub use dataset::Dataset;
pub use error::{FlatErrors, Issue, Issues, ValiError};
pub use message::{add_issue, IssueOverrides, Message};
pub use parse::{is, parse, safe_parse, SafeParseResult};
pub use path::{JsonPath, PathSegment};
pub use registry::MessageRegistry;
pub use schema::{
    ActionLike, ArraySchema, IntersectSchema, IssueContext, Kind, LazySchema, ObjectSchema,
    PipeSchema, Reference, Schema, SchemaLike, StringSchema, TupleSchema, UnionSchema,
    VariantSchema, WrappedSchema,
};

#[cfg(feature = "async")]
pub use asynchronous::{AsyncActionLike, AsyncSchemaLike};
#[cfg(feature = "async")]
pub use parse::{parse_async, safe_parse_async};

/// Type alias for validation results carrying issues.
pub type ValidationResult<T> = stillwater::Validation<T, Issues>;
