//! Base trait for all content handlers.

use crate::processing::escape::{escape_html, HtmlSanitizer};
use crate::types::ProcessError;

/// Per-call settings handed to every handler.
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    /// Whether sanitization is enabled for this processor.
    pub sanitize: bool,
    /// The sanitizer collaborator, if one was configured.
    pub sanitizer: Option<&'a dyn HtmlSanitizer>,
}

impl<'a> HandlerContext<'a> {
    /// Context without a sanitizer.
    pub fn new(sanitize: bool) -> Self {
        Self {
            sanitize,
            sanitizer: None,
        }
    }

    /// Attach a sanitizer collaborator.
    pub fn with_sanitizer(mut self, sanitizer: &'a dyn HtmlSanitizer) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }
}

impl std::fmt::Debug for HandlerContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerContext")
            .field("sanitize", &self.sanitize)
            .field("sanitizer", &self.sanitizer.is_some())
            .finish()
    }
}

/// The core trait that all handlers must implement.
///
/// A handler turns raw snippet text into display-ready text: it reverses
/// legacy escape artifacts for its language and makes the result safe to
/// interpolate into markup.
pub trait Handler: Send + Sync {
    /// Get the name of this handler.
    fn name(&self) -> &str;

    /// Transform raw content into display-ready text.
    fn handle(&self, content: &str, ctx: &HandlerContext<'_>) -> Result<String, ProcessError>;

    /// Get the description of this handler.
    fn description(&self) -> &str {
        "A content handler"
    }
}

type TransformFn = dyn Fn(&str) -> Result<String, ProcessError> + Send + Sync;

/// Handler wrapping a caller-supplied transform.
///
/// The transform replaces the recovery step only; its output is always
/// HTML-escaped afterwards.
pub struct FnHandler {
    name: String,
    transform: Box<TransformFn>,
}

impl FnHandler {
    /// Wrap a fallible transform.
    pub fn new<F>(name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&str) -> Result<String, ProcessError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            transform: Box::new(transform),
        }
    }

    /// Wrap an infallible transform.
    pub fn infallible<F>(name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::new(name, move |content| Ok(transform(content)))
    }
}

impl Handler for FnHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, content: &str, _ctx: &HandlerContext<'_>) -> Result<String, ProcessError> {
        let transformed = (self.transform)(content)?;
        Ok(escape_html(&transformed))
    }

    fn description(&self) -> &str {
        "Custom handler"
    }
}

impl std::fmt::Debug for FnHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_handler_escapes_output() {
        let handler = FnHandler::infallible("upper", |s| s.to_uppercase());
        let out = handler.handle("<b>x</b>", &HandlerContext::new(true)).unwrap();
        assert_eq!(out, "&lt;B&gt;X&lt;/B&gt;");
        assert_eq!(handler.name(), "upper");
    }

    #[test]
    fn test_fn_handler_propagates_error() {
        let handler = FnHandler::new("broken", |_| Err(ProcessError::handler("broken", "nope")));
        let err = handler.handle("x", &HandlerContext::new(true)).unwrap_err();
        assert!(matches!(err, ProcessError::Handler { .. }));
    }

    #[test]
    fn test_context_debug_hides_sanitizer() {
        let sanitizer = |html: &str| html.to_string();
        let ctx = HandlerContext::new(true).with_sanitizer(&sanitizer);
        assert_eq!(
            format!("{:?}", ctx),
            "HandlerContext { sanitize: true, sanitizer: true }"
        );
    }
}
