//! Issue records and the error type for the `parse` entry points.
//!
//! Failures inside a schema never surface as Rust errors: they are recorded
//! as [`Issue`]s on the [`Dataset`](crate::Dataset). Only [`parse`](crate::parse)
//! turns a non-empty issue list into a [`ValiError`].

mod issue;
mod vali_error;

pub use issue::{FlatErrors, Issue, Issues};
pub use vali_error::ValiError;
