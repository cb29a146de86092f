//! Action dispatcher port: send one message into the action bus.

use std::future::Future;

use actweb_domain::pattern::Pattern;
use actweb_domain::payload::DispatchPayload;
use serde_json::Value;

use crate::error::DispatchError;

/// Routes a message to whichever action handler owns `pattern`.
///
/// The returned future settles exactly once: with the handler's reply or
/// with the error it reported. Timeouts and retries, if any, belong to the
/// implementation.
pub trait ActionDispatcher {
    /// Dispatch `payload` under `pattern` and wait for the reply.
    fn dispatch(
        &self,
        pattern: &Pattern,
        payload: DispatchPayload,
    ) -> impl Future<Output = Result<Value, DispatchError>> + Send;
}

impl<T: ActionDispatcher + Send + Sync> ActionDispatcher for std::sync::Arc<T> {
    fn dispatch(
        &self,
        pattern: &Pattern,
        payload: DispatchPayload,
    ) -> impl Future<Output = Result<Value, DispatchError>> + Send {
        (**self).dispatch(pattern, payload)
    }
}
