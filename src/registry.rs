//! Message stores consulted while building issues.
//!
//! This module provides [`MessageRegistry`], which holds three stores:
//!
//! - **specific** messages keyed by the raising context's [`Reference`] and a language
//! - **schema** messages used for any schema-kind issue, keyed by language
//! - **global** messages used for any issue, keyed by language
//!
//! A registry is shared through `Arc` and attached to a run with
//! [`Config::with_messages`](crate::Config::with_messages).

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::message::Message;
use crate::schema::Reference;

/// Language key; `None` is the language-agnostic entry.
type Lang = Option<String>;

/// A thread-safe set of message stores.
///
/// Lookups for a language fall back to the language-agnostic entry when no
/// message was registered for that exact language.
///
/// # Thread Safety
///
/// Each store sits behind its own `RwLock`:
/// - Any number of concurrent runs can read messages
/// - Setters are serialized
///
/// # Example
///
/// ```rust
/// use litmus::{Config, Dataset, MessageRegistry, Reference, Schema, SchemaLike};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let registry = Arc::new(MessageRegistry::new());
/// registry.set_specific_message(Reference::new("string"), "Bitte Text eingeben", Some("de"));
///
/// let config = Config::new().with_lang("de").with_messages(registry);
/// let dataset = Schema::string().run(Dataset::new(json!(1)), &config);
///
/// assert_eq!(dataset.issues.unwrap().first().message, "Bitte Text eingeben");
/// ```
#[derive(Debug, Default)]
pub struct MessageRegistry {
    specific: RwLock<HashMap<Reference, HashMap<Lang, Message>>>,
    schema: RwLock<HashMap<Lang, Message>>,
    global: RwLock<HashMap<Lang, Message>>,
}

impl MessageRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a message for issues raised by contexts with `reference`.
    pub fn set_specific_message(
        &self,
        reference: Reference,
        message: impl Into<Message>,
        lang: Option<&str>,
    ) {
        self.specific
            .write()
            .entry(reference)
            .or_default()
            .insert(lang.map(str::to_string), message.into());
    }

    /// Registers a message for every schema-kind issue.
    pub fn set_schema_message(&self, message: impl Into<Message>, lang: Option<&str>) {
        self.schema
            .write()
            .insert(lang.map(str::to_string), message.into());
    }

    /// Registers a message for every issue.
    pub fn set_global_message(&self, message: impl Into<Message>, lang: Option<&str>) {
        self.global
            .write()
            .insert(lang.map(str::to_string), message.into());
    }

    /// Looks up the message registered for `reference`.
    pub fn specific_message(&self, reference: Reference, lang: Option<&str>) -> Option<Message> {
        let store = self.specific.read();
        let by_lang = store.get(&reference)?;
        lookup(by_lang, lang)
    }

    /// Looks up the schema-level message.
    pub fn schema_message(&self, lang: Option<&str>) -> Option<Message> {
        lookup(&self.schema.read(), lang)
    }

    /// Looks up the global message.
    pub fn global_message(&self, lang: Option<&str>) -> Option<Message> {
        lookup(&self.global.read(), lang)
    }

    /// Removes the message registered for `reference` in `lang`.
    pub fn delete_specific_message(&self, reference: Reference, lang: Option<&str>) {
        let mut store = self.specific.write();
        if let Some(by_lang) = store.get_mut(&reference) {
            by_lang.remove(&lang.map(str::to_string));
            if by_lang.is_empty() {
                store.remove(&reference);
            }
        }
    }

    /// Removes the schema-level message for `lang`.
    pub fn delete_schema_message(&self, lang: Option<&str>) {
        self.schema.write().remove(&lang.map(str::to_string));
    }

    /// Removes the global message for `lang`.
    pub fn delete_global_message(&self, lang: Option<&str>) {
        self.global.write().remove(&lang.map(str::to_string));
    }

    /// Removes every registered message.
    pub fn clear(&self) {
        self.specific.write().clear();
        self.schema.write().clear();
        self.global.write().clear();
    }
}

fn lookup(by_lang: &HashMap<Lang, Message>, lang: Option<&str>) -> Option<Message> {
    lang.and_then(|l| by_lang.get(&Some(l.to_string())))
        .or_else(|| by_lang.get(&None))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(message: Option<Message>) -> Option<String> {
        message.map(|m| match m {
            Message::Text(s) => s,
            Message::Dynamic(_) => "<dynamic>".to_string(),
        })
    }

    #[test]
    fn test_empty_registry_has_no_messages() {
        let registry = MessageRegistry::new();
        assert!(registry.global_message(None).is_none());
        assert!(registry.schema_message(Some("de")).is_none());
        assert!(registry
            .specific_message(Reference::new("string"), None)
            .is_none());
    }

    #[test]
    fn test_language_specific_wins_over_agnostic() {
        let registry = MessageRegistry::new();
        registry.set_global_message("any", None);
        registry.set_global_message("deutsch", Some("de"));

        assert_eq!(text(registry.global_message(Some("de"))), Some("deutsch".into()));
        assert_eq!(text(registry.global_message(Some("fr"))), Some("any".into()));
        assert_eq!(text(registry.global_message(None)), Some("any".into()));
    }

    #[test]
    fn test_specific_messages_are_keyed_by_reference() {
        let registry = MessageRegistry::new();
        registry.set_specific_message(Reference::new("min_length"), "too short", None);

        assert_eq!(
            text(registry.specific_message(Reference::new("min_length"), None)),
            Some("too short".into())
        );
        assert!(registry
            .specific_message(Reference::new("max_length"), None)
            .is_none());
    }

    #[test]
    fn test_delete_and_clear() {
        let registry = MessageRegistry::new();
        registry.set_specific_message(Reference::new("string"), "s", Some("en"));
        registry.set_schema_message("schema", None);
        registry.set_global_message("global", None);

        registry.delete_specific_message(Reference::new("string"), Some("en"));
        assert!(registry
            .specific_message(Reference::new("string"), Some("en"))
            .is_none());

        registry.delete_schema_message(None);
        assert!(registry.schema_message(None).is_none());

        registry.clear();
        assert!(registry.global_message(None).is_none());
    }
}
