//! Annotations carried by a pipe without affecting validation.

use serde_json::Value;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::schema::{ActionLike, IssueContext, Kind};

/// A descriptive annotation such as a title or a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataAction {
    type_name: &'static str,
    text: String,
}

impl MetadataAction {
    pub(crate) fn new(type_name: &'static str, text: impl Into<String>) -> Self {
        Self {
            type_name,
            text: text.into(),
        }
    }

    /// Returns the annotation text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl IssueContext for MetadataAction {
    fn kind(&self) -> Kind {
        Kind::Metadata
    }

    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn expects(&self) -> Option<String> {
        None
    }

    fn requirement(&self) -> Option<Value> {
        Some(Value::String(self.text.clone()))
    }
}

impl ActionLike for MetadataAction {
    fn run(&self, dataset: Dataset, _config: &Config) -> Dataset {
        dataset
    }
}
