//! Issue records and the non-empty issue list.
//!
//! This module provides [`Issue`] for a single validation or transformation
//! failure and [`Issues`] for the accumulated, never-empty list that a
//! [`Dataset`](crate::Dataset) carries.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde_json::Value;
use stillwater::prelude::*;

use crate::path::{JsonPath, PathSegment};
use crate::schema::Kind;

/// A single failure with everything needed to explain it.
///
/// Issues are built once by [`add_issue`](crate::message::add_issue) and are
/// not modified afterwards, except that composite schemas prepend path
/// segments while lifting a child's issues into their own list.
///
/// # Example
///
/// ```rust
/// use litmus::{Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let dataset = Schema::string().run(Dataset::new(json!(42)), &Config::default());
/// let issue = dataset.issues.unwrap().first().clone();
///
/// assert_eq!(issue.type_name, "string");
/// assert_eq!(issue.expected.as_deref(), Some("string"));
/// assert_eq!(issue.received, "42");
/// assert_eq!(issue.message, "Invalid type: Expected string but received 42");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Whether a schema, validation, or transformation raised the issue.
    pub kind: Kind,
    /// Discriminator of the raising schema or action (e.g. `min_length`).
    pub type_name: &'static str,
    /// The offending input. `None` stands for an absent value.
    pub input: Option<Value>,
    /// What was required, if the raising context can describe it.
    pub expected: Option<String>,
    /// What was actually found.
    pub received: String,
    /// The resolved human readable message.
    pub message: String,
    /// The raw constraint, for tooling.
    pub requirement: Option<Value>,
    /// Location within the validated structure. Root means "no path".
    pub path: JsonPath,
    /// Sub-issues reported by `union`-like schemas for each failed candidate.
    pub issues: Option<Box<Issues>>,
    /// Language the message was resolved for.
    pub lang: Option<String>,
    /// Echo of [`Config::abort_early`](crate::Config).
    pub abort_early: bool,
    /// Echo of [`Config::abort_pipe_early`](crate::Config).
    pub abort_pipe_early: bool,
}

impl Issue {
    /// Returns the issue with `segment` prepended to its path.
    pub fn with_parent(mut self, segment: PathSegment) -> Self {
        self.path = self.path.with_parent(segment);
        self
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(root)".to_string()
        } else {
            self.path.to_string()
        };

        write!(f, "{}: {}", path_str, self.message)
    }
}

impl std::error::Error for Issue {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Issue>();
    assert_sync::<Issue>();
};

/// A non-empty, append-only list of issues.
///
/// `Issues` wraps a `NonEmptyVec<Issue>`, so a dataset either has no issue
/// list at all or has one with at least one entry. Lists combine through
/// [`Semigroup`], keeping their order.
///
/// ```rust
/// use litmus::{Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string())
///     .field("age", Schema::number());
///
/// let dataset = schema.run(Dataset::new(json!({"name": 1, "age": "x"})), &Config::default());
/// let issues = dataset.issues.unwrap();
///
/// assert_eq!(issues.len(), 2);
/// assert_eq!(issues.first().path.to_string(), "name");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Issues(NonEmptyVec<Issue>);

impl Issues {
    /// Creates a list holding a single issue.
    pub fn single(issue: Issue) -> Self {
        Self(NonEmptyVec::singleton(issue))
    }

    /// Creates a list from a `NonEmptyVec` of issues.
    pub fn from_non_empty(issues: NonEmptyVec<Issue>) -> Self {
        Self(issues)
    }

    /// Creates a list from a `Vec`, or `None` if the vec is empty.
    pub fn from_vec(issues: Vec<Issue>) -> Option<Self> {
        NonEmptyVec::from_vec(issues).map(Self)
    }

    /// Returns the number of issues.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the issues in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter()
    }

    /// Returns the first recorded issue.
    pub fn first(&self) -> &Issue {
        self.0.head()
    }

    /// Returns the most recently recorded issue.
    pub fn last(&self) -> &Issue {
        self.0.iter().last().unwrap_or_else(|| self.0.head())
    }

    /// Returns all issues located at `path`.
    pub fn at_path(&self, path: &JsonPath) -> Vec<&Issue> {
        self.0.iter().filter(|i| &i.path == path).collect()
    }

    /// Returns all issues raised by a context of the given type.
    pub fn of_type(&self, type_name: &str) -> Vec<&Issue> {
        self.0.iter().filter(|i| i.type_name == type_name).collect()
    }

    /// Converts the list into a `Vec<Issue>`.
    pub fn into_vec(self) -> Vec<Issue> {
        self.0.into_vec()
    }

    /// Returns a reference to the underlying `NonEmptyVec`.
    pub fn as_non_empty_vec(&self) -> &NonEmptyVec<Issue> {
        &self.0
    }

    /// Appends one issue.
    pub fn push(self, issue: Issue) -> Self {
        self.combine(Issues::single(issue))
    }

    /// Groups issue messages by location.
    ///
    /// Issues without a path land in `root`; every other issue is keyed by
    /// its [dotted path](JsonPath::dot_path).
    ///
    /// ```rust
    /// use litmus::{Config, Dataset, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::object().field("tags", Schema::array(Schema::string()));
    /// let dataset = schema.run(Dataset::new(json!({"tags": ["a", 1]})), &Config::default());
    /// let flat = dataset.issues.unwrap().flatten();
    ///
    /// assert!(flat.root.is_empty());
    /// assert_eq!(flat.nested["tags.1"], vec!["Invalid type: Expected string but received 1"]);
    /// ```
    pub fn flatten(&self) -> FlatErrors {
        let mut flat = FlatErrors::default();
        for issue in self.iter() {
            if issue.path.is_root() {
                flat.root.push(issue.message.clone());
            } else {
                flat.nested
                    .entry(issue.path.dot_path())
                    .or_default()
                    .push(issue.message.clone());
            }
        }
        flat
    }
}

impl Semigroup for Issues {
    fn combine(self, other: Self) -> Self {
        Issues(self.0.combine(other.0))
    }
}

impl Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} issue(s):", self.len())?;
        for (i, issue) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for Issues {}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = Box<dyn Iterator<Item = &'a Issue> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

/// Issue messages grouped by location, see [`Issues::flatten`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatErrors {
    /// Messages of issues raised against the root value.
    pub root: Vec<String>,
    /// Messages keyed by dotted path, in first-seen order.
    pub nested: IndexMap<String, Vec<String>>,
}
