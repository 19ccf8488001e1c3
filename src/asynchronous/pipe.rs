//! Async pipes.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::schema::{halt, should_run, PipeSchema};

use super::{AsyncActionLike, AsyncSchemaLike};

impl PipeSchema<dyn AsyncSchemaLike, dyn AsyncActionLike> {
    /// Appends `action` to the pipe.
    pub fn pipe<T: AsyncActionLike + 'static>(mut self, action: T) -> Self {
        self.actions.push(Arc::new(action));
        self
    }
}

impl AsyncSchemaLike for PipeSchema<dyn AsyncSchemaLike, dyn AsyncActionLike> {
    fn run_async<'a>(&'a self, dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        Box::pin(async move {
            let mut dataset = self.schema.run_async(dataset, config).await;
            for action in &self.actions {
                if halt(&mut dataset, config) {
                    break;
                }
                if !should_run(action.kind(), &dataset) {
                    continue;
                }
                dataset = action.run_async(dataset, config).await;
            }
            dataset
        })
    }
}
