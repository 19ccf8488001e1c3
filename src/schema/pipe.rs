//! Pipes: a schema followed by an ordered list of actions.

use std::sync::Arc;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::Message;

use super::traits::{ActionLike, IssueContext, Kind, SchemaLike};

/// A schema whose output is handed through a sequence of actions.
///
/// The pipe behaves like its base schema everywhere a schema is expected:
/// it reports the base schema's kind, type name, and expectation.
///
/// Actions run in order and stop when
///
/// - an issue was recorded and `abort_early` is set, or
/// - an issue was recorded under `abort_pipe_early`.
///
/// Metadata actions never run, and nothing runs on an untyped dataset.
///
/// # Example
///
/// ```rust
/// use litmus::{Action, Config, Dataset, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::string()
///     .pipe(Action::trim())
///     .pipe(Action::to_upper_case());
///
/// let dataset = schema.run(Dataset::new(json!("  ok ")), &Config::default());
/// assert_eq!(dataset.value, Some(json!("OK")));
/// ```
pub struct PipeSchema<S: ?Sized = dyn SchemaLike, A: ?Sized = dyn ActionLike> {
    pub(crate) schema: Arc<S>,
    pub(crate) actions: Vec<Arc<A>>,
}

impl<S: ?Sized, A: ?Sized> PipeSchema<S, A> {
    pub(crate) fn from_parts(schema: Arc<S>) -> Self {
        Self {
            schema,
            actions: Vec::new(),
        }
    }

    /// Returns the number of actions after the base schema.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if no action follows the base schema.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl PipeSchema {
    /// Starts a pipe with `schema` as its base.
    pub fn new<T: SchemaLike + 'static>(schema: T) -> Self {
        Self::from_parts(Arc::new(schema))
    }

    /// Appends `action` to the pipe.
    pub fn pipe<T: ActionLike + 'static>(mut self, action: T) -> Self {
        self.actions.push(Arc::new(action));
        self
    }
}

impl<S: IssueContext + ?Sized, A: IssueContext + ?Sized> IssueContext for PipeSchema<S, A> {
    fn kind(&self) -> Kind {
        self.schema.kind()
    }

    fn type_name(&self) -> &'static str {
        self.schema.type_name()
    }

    fn reference(&self) -> super::traits::Reference {
        self.schema.reference()
    }

    fn expects(&self) -> Option<String> {
        self.schema.expects()
    }

    fn message(&self) -> Option<&Message> {
        self.schema.message()
    }
}

impl SchemaLike for PipeSchema {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        let mut dataset = self.schema.run(dataset, config);
        for action in &self.actions {
            if halt(&mut dataset, config) {
                break;
            }
            if !should_run(action.kind(), &dataset) {
                continue;
            }
            dataset = action.run(dataset, config);
        }
        dataset
    }
}

/// Returns true if the pipe must stop before its next action.
///
/// When it stops because of a schema-kind issue the dataset is left untyped.
pub(crate) fn halt(dataset: &mut Dataset, config: &Config) -> bool {
    let Some(issues) = &dataset.issues else {
        return false;
    };
    if !config.abort_early && !dataset.requests_pipe_abort() {
        return false;
    }
    let trigger = issues.last();
    tracing::trace!(
        type_name = trigger.type_name,
        kind = %trigger.kind,
        "pipe halted"
    );
    if trigger.kind == Kind::Schema {
        dataset.typed = false;
    }
    true
}

/// Returns true if an action of `kind` may run on `dataset`.
pub(crate) fn should_run(kind: Kind, dataset: &Dataset) -> bool {
    kind != Kind::Metadata && dataset.typed
}
