//! Async array and tuple schemas.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture};

use crate::config::Config;
use crate::dataset::Dataset;
use crate::schema::{take_array, ArrayRun, ArraySchema, Extras, TupleSchema};

use super::AsyncSchemaLike;

impl AsyncSchemaLike for ArraySchema<dyn AsyncSchemaLike> {
    fn run_async<'a>(&'a self, mut dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        Box::pin(async move {
            let Some(input) = take_array(self, &mut dataset, config) else {
                return dataset;
            };

            let children = join_all(
                input
                    .iter()
                    .map(|item| self.item().run_async(Dataset::new(item.clone()), config)),
            )
            .await;

            let mut run = ArrayRun::new(dataset);
            for (index, child) in children.into_iter().enumerate() {
                if run.merge(index, child, config).is_break() {
                    break;
                }
            }
            run.finish()
        })
    }
}

impl TupleSchema<dyn AsyncSchemaLike> {
    /// Declares the next position.
    pub fn item<T: AsyncSchemaLike + 'static>(mut self, schema: T) -> Self {
        self.push(Arc::new(schema));
        self
    }
}

impl AsyncSchemaLike for TupleSchema<dyn AsyncSchemaLike> {
    fn run_async<'a>(&'a self, mut dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        Box::pin(async move {
            let Some(input) = take_array(self, &mut dataset, config) else {
                return dataset;
            };
            let declared = self.items().len();

            let items = join_all(self.items().iter().enumerate().map(|(index, schema)| {
                schema.run_async(Dataset::new(input.get(index).cloned()), config)
            }));
            let rest = async {
                match self.extras() {
                    Extras::Validate(rest) => {
                        join_all(input.iter().skip(declared).map(|value| {
                            rest.run_async(Dataset::new(value.clone()), config)
                        }))
                        .await
                    }
                    _ => Vec::new(),
                }
            };
            let (item_results, rest_results) = futures::join!(items, rest);

            let mut run = ArrayRun::new(dataset);
            for (index, child) in item_results.into_iter().enumerate() {
                if run.merge(index, child, config).is_break() {
                    break;
                }
            }

            if run.may_continue(config) {
                if let Extras::Validate(_) = self.extras() {
                    for (offset, child) in rest_results.into_iter().enumerate() {
                        if run.merge(declared + offset, child, config).is_break() {
                            break;
                        }
                    }
                } else {
                    self.apply_static_extras(&mut run, &input, config);
                }
            }

            run.finish()
        })
    }
}
