//! Dispatch failures reported by an action bus.

/// Boxed error produced by an action handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single dispatch.
///
/// Whatever the handler reported is kept verbatim; nothing in this crate
/// retries or rewrites it.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No registered handler matches the dispatched pattern.
    #[error("no action handler matches {pattern}")]
    NoHandler { pattern: String },

    /// The matched handler replied with an error.
    #[error(transparent)]
    Handler(HandlerError),
}

impl DispatchError {
    /// Wrap a handler failure described by a plain message.
    #[must_use]
    pub fn handler(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Handler(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_handler_message_verbatim() {
        let err = DispatchError::handler("aw snap!");
        assert_eq!(err.to_string(), "aw snap!");
    }

    #[test]
    fn should_display_unmatched_pattern() {
        let err = DispatchError::NoHandler {
            pattern: "cmd:ping,role:test".to_string(),
        };
        assert_eq!(err.to_string(), "no action handler matches cmd:ping,role:test");
    }

    #[test]
    fn should_keep_source_error_of_handler() {
        let io = std::io::Error::other("disk gone");
        let err = DispatchError::Handler(Box::new(io));
        assert_eq!(err.to_string(), "disk gone");
    }
}
