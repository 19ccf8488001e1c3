//! Run configuration threaded through every nested `run` call.
//!
//! [`Config`] is created by the caller, passed by reference into the outermost
//! schema, and handed unchanged to every child. Nothing retains it past the
//! call.

use std::sync::Arc;

use crate::message::Message;
use crate::registry::MessageRegistry;

/// Options controlling message resolution and early aborts.
///
/// # Example
///
/// ```rust
/// use litmus::{Config, MessageRegistry};
/// use std::sync::Arc;
///
/// let registry = Arc::new(MessageRegistry::new());
/// registry.set_global_message("Something is off", None);
///
/// let config = Config::new()
///     .with_lang("en")
///     .abort_pipe_early(true)
///     .with_messages(registry);
///
/// assert_eq!(config.lang.as_deref(), Some("en"));
/// assert!(config.abort_pipe_early);
/// assert!(!config.abort_early);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Language used to look messages up in the registry.
    pub lang: Option<String>,
    /// Message used when no tighter-scoped message exists.
    pub message: Option<Message>,
    /// Stop the whole validation at the first issue.
    pub abort_early: bool,
    /// Stop the current pipe at the first issue, letting siblings continue.
    pub abort_pipe_early: bool,
    messages: Option<Arc<MessageRegistry>>,
}

impl Config {
    /// Creates a configuration with every option unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Sets the configuration-level message.
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Enables or disables aborting the whole validation at the first issue.
    pub fn abort_early(mut self, enabled: bool) -> Self {
        self.abort_early = enabled;
        self
    }

    /// Enables or disables aborting the current pipe at the first issue.
    pub fn abort_pipe_early(mut self, enabled: bool) -> Self {
        self.abort_pipe_early = enabled;
        self
    }

    /// Attaches a message registry consulted while building issues.
    pub fn with_messages(mut self, registry: Arc<MessageRegistry>) -> Self {
        self.messages = Some(registry);
        self
    }

    /// Returns the attached message registry, if any.
    pub fn messages(&self) -> Option<&MessageRegistry> {
        self.messages.as_deref()
    }

    /// Configuration used for discriminator probes: abort early, nothing else.
    pub(crate) fn probe() -> Self {
        Self::new().abort_early(true)
    }
}
