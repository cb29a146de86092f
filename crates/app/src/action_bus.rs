//! In-process action bus.
//!
//! Handlers are registered under a pattern. A dispatched pattern is served
//! by the most specific registered pattern it contains; among equally
//! specific candidates the most recently added one wins, so a later
//! registration overrides an earlier one.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use actweb_domain::pattern::Pattern;
use actweb_domain::payload::DispatchPayload;
use serde_json::Value;

use crate::error::DispatchError;
use crate::ports::ActionDispatcher;

/// Boxed future returned by an [`ActionHandler`].
pub type ActionFuture = Pin<Box<dyn Future<Output = Result<Value, DispatchError>> + Send>>;

/// Something that answers dispatched messages.
pub trait ActionHandler: Send + Sync + 'static {
    fn call(&self, payload: DispatchPayload) -> ActionFuture;
}

impl<F, Fut> ActionHandler for F
where
    F: Fn(DispatchPayload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, DispatchError>> + Send + 'static,
{
    fn call(&self, payload: DispatchPayload) -> ActionFuture {
        Box::pin(self(payload))
    }
}

/// Action bus living in the current process.
#[derive(Default, Clone)]
pub struct LocalActionBus {
    handlers: Vec<(Pattern, Arc<dyn ActionHandler>)>,
}

impl LocalActionBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for messages containing `pattern`.
    pub fn add<F, Fut>(&mut self, pattern: Pattern, handler: F) -> &mut Self
    where
        F: Fn(DispatchPayload) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, DispatchError>> + Send + 'static,
    {
        tracing::debug!(%pattern, "action handler added");
        self.handlers.push((pattern, Arc::new(handler)));
        self
    }

    /// Registered patterns, in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.handlers.iter().map(|(pattern, _)| pattern)
    }

    fn lookup(&self, pattern: &Pattern) -> Option<&Arc<dyn ActionHandler>> {
        self.handlers
            .iter()
            .filter(|(candidate, _)| pattern.contains(candidate))
            .max_by_key(|(candidate, _)| candidate.specificity())
            .map(|(_, handler)| handler)
    }
}

impl ActionDispatcher for LocalActionBus {
    fn dispatch(
        &self,
        pattern: &Pattern,
        payload: DispatchPayload,
    ) -> impl Future<Output = Result<Value, DispatchError>> + Send {
        let handler = self.lookup(pattern).cloned();
        let pattern = pattern.to_string();

        async move {
            let Some(handler) = handler else {
                tracing::warn!(%pattern, "no action handler matches");
                return Err(DispatchError::NoHandler { pattern });
            };
            tracing::debug!(%pattern, id = %payload.id, "dispatching action");
            handler.call(payload).await
        }
    }
}
