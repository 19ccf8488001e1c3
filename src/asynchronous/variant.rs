//! Async discriminated unions.
//!
//! Discriminator probes and option runs are awaited one at a time, since each
//! step decides whether the walk continues.

use futures::future::BoxFuture;
use serde_json::Value;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::schema::{accepts_absent, DiscriminatorSearch, VariantSchema};

use super::AsyncSchemaLike;

impl AsyncSchemaLike for VariantSchema<dyn AsyncSchemaLike> {
    fn run_async<'a>(&'a self, mut dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        Box::pin(async move {
            let Some(input) = self.take_input(&mut dataset, config) else {
                return dataset;
            };

            let probe = Config::probe();
            let outcome = {
                let mut search = DiscriminatorSearch::new(self.key(), &input);
                'candidates: for candidate in self.candidates() {
                    for (priority, key) in candidate.keys.iter().enumerate() {
                        let entry = candidate.object.entry(key);
                        let rejected = match (entry, input.get(*key)) {
                            (Some(schema), Some(value)) => schema
                                .run_async(Dataset::new(value.clone()), &probe)
                                .await
                                .has_issues(),
                            (Some(schema), None) => !accepts_absent(schema.as_ref()),
                            (None, _) => true,
                        };
                        if rejected {
                            search.reject(key, priority, entry.and_then(|schema| schema.expects()));
                            continue 'candidates;
                        }
                    }
                    let result = candidate
                        .object
                        .run_async(Dataset::new(Value::Object(input.clone())), config)
                        .await;
                    search.accept(result);
                    if search.is_settled() {
                        break;
                    }
                }
                search.finish()
            };

            dataset.value = Some(Value::Object(input));
            outcome.into_dataset(self, dataset, config)
        })
    }
}
