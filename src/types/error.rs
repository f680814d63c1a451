//! Error types for content processing.

use thiserror::Error;

/// Errors raised inside a handler.
///
/// None of these escape [`ContentProcessor::process`](crate::ContentProcessor::process):
/// they are logged and the original content is escaped instead.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Structured content that does not parse.
    #[error("invalid JSON content: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A handler reported a failure.
    #[error("handler for `{language}` failed: {message}")]
    Handler { language: String, message: String },

    /// A handler panicked while transforming content.
    #[error("handler for `{language}` panicked")]
    HandlerPanicked { language: String },
}

impl ProcessError {
    /// Create a handler failure for the given language tag.
    pub fn handler(language: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Handler {
            language: language.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ProcessError::handler("mermaid", "unbalanced block");
        assert_eq!(err.to_string(), "handler for `mermaid` failed: unbalanced block");

        let err = ProcessError::HandlerPanicked {
            language: "css".to_string(),
        };
        assert_eq!(err.to_string(), "handler for `css` panicked");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{\"a\":").unwrap_err();
        let err: ProcessError = json_err.into();
        assert!(matches!(err, ProcessError::InvalidJson(_)));
        assert!(err.to_string().starts_with("invalid JSON content"));
    }
}
