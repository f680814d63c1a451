//! Handlers for HTML and CSS content.

use lazy_static::lazy_static;
use regex::Regex;

use super::base::{Handler, HandlerContext};
use crate::processing::escape::escape_html;
use crate::types::ProcessError;

lazy_static! {
    static ref SCRIPT_OPENER: Regex = Regex::new(r"(?i)<script").unwrap();
    static ref JAVASCRIPT_URI: Regex = Regex::new(r"(?i)javascript:").unwrap();
}

/// HTML handler.
///
/// With sanitization on and a sanitizer available, the markup is handed to
/// the sanitizer and returned as-is. Otherwise it is escaped as literal text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlHandler;

impl HtmlHandler {
    /// Create a new HTML handler.
    pub fn new() -> Self {
        Self
    }
}

impl Handler for HtmlHandler {
    fn name(&self) -> &str {
        "html"
    }

    fn handle(&self, content: &str, ctx: &HandlerContext<'_>) -> Result<String, ProcessError> {
        match ctx.sanitizer {
            Some(sanitizer) if ctx.sanitize => Ok(sanitizer.sanitize(content)),
            _ => Ok(escape_html(content)),
        }
    }

    fn description(&self) -> &str {
        "Sanitizes markup when a sanitizer is available, escapes it otherwise"
    }
}

/// CSS handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssHandler;

impl CssHandler {
    /// Create a new CSS handler.
    pub fn new() -> Self {
        Self
    }

    /// Neutralise script openers and drop `javascript:` URIs.
    pub fn strip_scripts(&self, content: &str) -> String {
        let content = SCRIPT_OPENER.replace_all(content, "&lt;script");
        JAVASCRIPT_URI.replace_all(&content, "").into_owned()
    }
}

impl Handler for CssHandler {
    fn name(&self) -> &str {
        "css"
    }

    fn handle(&self, content: &str, ctx: &HandlerContext<'_>) -> Result<String, ProcessError> {
        if ctx.sanitize {
            Ok(escape_html(&self.strip_scripts(content)))
        } else {
            Ok(escape_html(content))
        }
    }

    fn description(&self) -> &str {
        "Strips script openers and javascript: URIs when sanitizing, then escapes"
    }
}
