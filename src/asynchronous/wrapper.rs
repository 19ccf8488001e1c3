//! Async optional, nullable, nullish, and lazy schemas.

use futures::future::BoxFuture;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::schema::{LazySchema, WrappedSchema};

use super::AsyncSchemaLike;

impl AsyncSchemaLike for WrappedSchema<dyn AsyncSchemaLike> {
    fn run_async<'a>(&'a self, mut dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        Box::pin(async move {
            if self.settle(&mut dataset) {
                return dataset;
            }
            self.wrapped().run_async(dataset, config).await
        })
    }
}

impl AsyncSchemaLike for LazySchema<dyn AsyncSchemaLike> {
    fn run_async<'a>(&'a self, dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        Box::pin(async move {
            let schema = self.resolve(dataset.value.as_ref());
            schema.run_async(dataset, config).await
        })
    }
}
