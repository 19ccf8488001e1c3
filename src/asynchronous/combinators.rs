//! Async union and intersect schemas.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture};

use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::{add_issue, IssueOverrides};
use crate::schema::{IntersectRun, IntersectSchema, UnionCandidates, UnionSchema};

use super::AsyncSchemaLike;

impl UnionSchema<dyn AsyncSchemaLike> {
    /// Appends an option.
    pub fn option<T: AsyncSchemaLike + 'static>(mut self, schema: T) -> Self {
        self.push(Arc::new(schema));
        self
    }
}

impl AsyncSchemaLike for UnionSchema<dyn AsyncSchemaLike> {
    fn run_async<'a>(&'a self, dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        Box::pin(async move {
            let results = join_all(
                self.options()
                    .iter()
                    .map(|option| option.run_async(Dataset::new(dataset.value.clone()), config)),
            )
            .await;

            let mut candidates = UnionCandidates::default();
            for candidate in results {
                if let Some(matched) = candidates.offer(candidate) {
                    return matched;
                }
            }
            candidates.resolve(self, dataset, config)
        })
    }
}

impl IntersectSchema<dyn AsyncSchemaLike> {
    /// Appends an option.
    pub fn option<T: AsyncSchemaLike + 'static>(mut self, schema: T) -> Self {
        self.push(Arc::new(schema));
        self
    }
}

impl AsyncSchemaLike for IntersectSchema<dyn AsyncSchemaLike> {
    fn run_async<'a>(&'a self, mut dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        Box::pin(async move {
            if self.options().is_empty() {
                add_issue(self, "type", &mut dataset, config, IssueOverrides::new());
                return dataset;
            }

            let results = join_all(
                self.options()
                    .iter()
                    .map(|option| option.run_async(Dataset::new(dataset.value.clone()), config)),
            )
            .await;

            let mut run = IntersectRun::new(dataset);
            for child in results {
                if run.merge(child, config).is_break() {
                    break;
                }
            }
            run.finish(self, config)
        })
    }
}
