//! Async object schemas.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture};

use crate::config::Config;
use crate::dataset::Dataset;
use crate::schema::{Extras, ObjectRun, ObjectSchema};

use super::AsyncSchemaLike;

impl ObjectSchema<dyn AsyncSchemaLike> {
    /// Declares an entry validated by `schema`.
    pub fn field<T>(mut self, name: impl Into<String>, schema: T) -> Self
    where
        T: AsyncSchemaLike + 'static,
    {
        self.insert(name.into(), Arc::new(schema));
        self
    }
}

impl AsyncSchemaLike for ObjectSchema<dyn AsyncSchemaLike> {
    fn run_async<'a>(&'a self, mut dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        Box::pin(async move {
            let Some(input) = self.take_input(&mut dataset, config) else {
                return dataset;
            };

            let entries = join_all(self.entries().map(|(key, schema)| {
                schema.run_async(Dataset::new(input.get(key).cloned()), config)
            }));
            let rest = async {
                match self.extras() {
                    Extras::Validate(rest) => {
                        join_all(self.unknown_entries(&input).map(|(key, value)| async move {
                            (key, rest.run_async(Dataset::new(value.clone()), config).await)
                        }))
                        .await
                    }
                    _ => Vec::new(),
                }
            };
            let (entry_results, rest_results) = futures::join!(entries, rest);

            let mut run = ObjectRun::new(dataset);
            for ((key, _), child) in self.entries().zip(entry_results) {
                if run.merge(key, child, config).is_break() {
                    break;
                }
            }

            if run.may_continue(config) {
                if let Extras::Validate(_) = self.extras() {
                    for (key, child) in rest_results {
                        if run.merge(key, child, config).is_break() {
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
