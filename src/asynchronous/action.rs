//! Actions whose work is itself asynchronous.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::{add_issue, IssueOverrides, Message};
use crate::schema::{IssueContext, Kind, Reference};

use super::AsyncActionLike;

type AsyncPredicate = Arc<dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync>;
type AsyncMapper = Arc<dyn Fn(Value) -> BoxFuture<'static, Value> + Send + Sync>;

/// Validates a typed value with an async predicate.
///
/// The predicate receives a copy of the value; an absent value is presented
/// as `null`.
#[derive(Clone)]
pub struct CheckAsyncAction {
    predicate: AsyncPredicate,
    message: Option<Message>,
}

impl CheckAsyncAction {
    pub(crate) fn new(predicate: AsyncPredicate) -> Self {
        Self {
            predicate,
            message: None,
        }
    }

    /// Sets the message used when the predicate resolves to `false`.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Debug for CheckAsyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckAsyncAction")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl IssueContext for CheckAsyncAction {
    fn kind(&self) -> Kind {
        Kind::Validation
    }

    fn type_name(&self) -> &'static str {
        "check"
    }

    fn reference(&self) -> Reference {
        Reference::new("check_async")
    }

    fn expects(&self) -> Option<String> {
        None
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl AsyncActionLike for CheckAsyncAction {
    fn run_async<'a>(&'a self, mut dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        Box::pin(async move {
            if !dataset.typed {
                return dataset;
            }
            let value = dataset.value.clone().unwrap_or(Value::Null);
            if !(self.predicate)(value).await {
                add_issue(self, "input", &mut dataset, config, IssueOverrides::new());
            }
            dataset
        })
    }
}

/// Replaces a present value with the output of an async function.
#[derive(Clone)]
pub struct TransformAsyncAction {
    mapper: AsyncMapper,
}

impl TransformAsyncAction {
    pub(crate) fn new(mapper: AsyncMapper) -> Self {
        Self { mapper }
    }
}

impl fmt::Debug for TransformAsyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformAsyncAction").finish_non_exhaustive()
    }
}

impl IssueContext for TransformAsyncAction {
    fn kind(&self) -> Kind {
        Kind::Transformation
    }

    fn type_name(&self) -> &'static str {
        "transform"
    }

    fn reference(&self) -> Reference {
        Reference::new("transform_async")
    }

    fn expects(&self) -> Option<String> {
        None
    }
}

impl AsyncActionLike for TransformAsyncAction {
    fn run_async<'a>(&'a self, mut dataset: Dataset, _config: &'a Config) -> BoxFuture<'a, Dataset> {
        Box::pin(async move {
            if let Some(value) = dataset.value.take() {
                dataset.value = Some((self.mapper)(value).await);
            }
            dataset
        })
    }
}
