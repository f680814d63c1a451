//! Plain text handler.

use super::base::{Handler, HandlerContext};
use crate::processing::escape::escape_html;
use crate::types::ProcessError;

/// Escapes content without any recovery.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextHandler;

impl TextHandler {
    /// Create a new text handler.
    pub fn new() -> Self {
        Self
    }
}

impl Handler for TextHandler {
    fn name(&self) -> &str {
        "text"
    }

    fn handle(&self, content: &str, _ctx: &HandlerContext<'_>) -> Result<String, ProcessError> {
        Ok(escape_html(content))
    }

    fn description(&self) -> &str {
        "Escapes plain text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_keeps_escaped_markers() {
        let out = TextHandler::new()
            .handle(r"a<b \${x}", &HandlerContext::new(true))
            .unwrap();
        assert_eq!(out, r"a&lt;b \${x}");
    }
}
