//! Language handler router.

use std::collections::HashMap;
use std::sync::Arc;

use crate::handlers::{
    CssHandler, Handler, HtmlHandler, JsonHandler, RecoveryHandler, TextHandler,
};
use crate::processing::Language;

/// The language a snippet ends up being processed as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedLanguage {
    /// One of the built-in languages.
    Builtin(Language),
    /// A tag registered as a custom handler.
    Custom(String),
}

impl ResolvedLanguage {
    /// Get the tag for this language.
    pub fn as_str(&self) -> &str {
        match self {
            ResolvedLanguage::Builtin(language) => language.as_str(),
            ResolvedLanguage::Custom(tag) => tag,
        }
    }
}

impl std::fmt::Display for ResolvedLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Router that selects the handler for a language tag.
///
/// Built-in languages map to one shared handler each, aliases included.
/// Custom handlers live in a separate table that is consulted first, so a
/// custom entry can replace a built-in one or add a new tag.
pub struct HandlerRouter {
    /// Template-literal recovery (javascript, js)
    javascript_handler: Arc<RecoveryHandler>,
    /// Shell recovery (bash, shell, sh)
    bash_handler: Arc<RecoveryHandler>,
    /// CI/template recovery (yaml, yml)
    yaml_handler: Arc<RecoveryHandler>,
    /// Pretty-printing (json)
    json_handler: Arc<JsonHandler>,
    /// Sanitize-or-escape (html)
    html_handler: Arc<HtmlHandler>,
    /// Script stripping (css)
    css_handler: Arc<CssHandler>,
    /// Escape only (text)
    text_handler: Arc<TextHandler>,
    /// Universal recovery for untyped content (default)
    default_handler: Arc<RecoveryHandler>,
    /// Caller-supplied handlers keyed by tag
    custom_handlers: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerRouter {
    /// Create a router with the built-in handlers only.
    pub fn new() -> Self {
        Self {
            javascript_handler: Arc::new(RecoveryHandler::javascript()),
            bash_handler: Arc::new(RecoveryHandler::bash()),
            yaml_handler: Arc::new(RecoveryHandler::yaml()),
            json_handler: Arc::new(JsonHandler::new()),
            html_handler: Arc::new(HtmlHandler::new()),
            css_handler: Arc::new(CssHandler::new()),
            text_handler: Arc::new(TextHandler::new()),
            default_handler: Arc::new(RecoveryHandler::universal()),
            custom_handlers: HashMap::new(),
        }
    }

    /// Register a custom handler for a tag.
    ///
    /// Built-in tags and their aliases are stored under the canonical tag, so
    /// registering on `js` overrides `javascript` as well.
    pub fn with_custom(mut self, tag: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        let tag = tag.into();
        let key = match Language::from_tag(&tag) {
            Some(language) => language.as_str().to_string(),
            None => tag,
        };
        self.custom_handlers.insert(key, handler);
        self
    }

    /// Get the built-in handler for a language.
    pub fn get_handler(&self, language: Language) -> Arc<dyn Handler> {
        match language {
            Language::JavaScript => Arc::clone(&self.javascript_handler) as Arc<dyn Handler>,
            Language::Bash => Arc::clone(&self.bash_handler) as Arc<dyn Handler>,
            Language::Yaml => Arc::clone(&self.yaml_handler) as Arc<dyn Handler>,
            Language::Json => Arc::clone(&self.json_handler) as Arc<dyn Handler>,
            Language::Html => Arc::clone(&self.html_handler) as Arc<dyn Handler>,
            Language::Css => Arc::clone(&self.css_handler) as Arc<dyn Handler>,
            Language::Text => Arc::clone(&self.text_handler) as Arc<dyn Handler>,
            Language::Default => Arc::clone(&self.default_handler) as Arc<dyn Handler>,
        }
    }

    /// Get a custom handler by its exact tag.
    pub fn get_custom(&self, tag: &str) -> Option<Arc<dyn Handler>> {
        self.custom_handlers.get(tag).map(Arc::clone)
    }

    /// Check whether a custom handler is registered for a tag.
    pub fn has_custom(&self, tag: &str) -> bool {
        self.custom_handlers.contains_key(tag)
    }

    /// Resolve a tag against the handler table.
    ///
    /// Custom tags win over built-in ones, and a custom handler for a
    /// built-in tag also serves its aliases. Returns `None` for tags nobody
    /// handles.
    pub fn resolve_tag(&self, tag: &str) -> Option<ResolvedLanguage> {
        if self.has_custom(tag) {
            return Some(ResolvedLanguage::Custom(tag.to_string()));
        }
        Language::from_tag(tag).map(|language| self.resolve_language(language))
    }

    /// Resolve a built-in language, honouring custom overrides of its tag.
    pub fn resolve_language(&self, language: Language) -> ResolvedLanguage {
        if self.has_custom(language.as_str()) {
            ResolvedLanguage::Custom(language.as_str().to_string())
        } else {
            ResolvedLanguage::Builtin(language)
        }
    }

    /// Get the handler for a resolved language.
    pub fn handler_for(&self, resolved: &ResolvedLanguage) -> Arc<dyn Handler> {
        match resolved {
            ResolvedLanguage::Builtin(language) => self.get_handler(*language),
            ResolvedLanguage::Custom(tag) => self
                .get_custom(tag)
                .unwrap_or_else(|| self.get_handler(Language::Default)),
        }
    }

    /// List all handlers as `(tag, description)` pairs, built-ins first.
    pub fn list_handlers(&self) -> Vec<(String, String)> {
        let mut handlers: Vec<(String, String)> = Language::ALL
            .iter()
            .map(|language| {
                let handler = self.get_handler(*language);
                (language.as_str().to_string(), handler.description().to_string())
            })
            .collect();

        let mut custom: Vec<_> = self.custom_handlers.iter().collect();
        custom.sort_by(|a, b| a.0.cmp(b.0));
        handlers.extend(
            custom
                .into_iter()
                .map(|(tag, handler)| (tag.clone(), handler.description().to_string())),
        );

        handlers
    }
}

impl Default for HandlerRouter {
    fn default() -> Self {
        Self::new()
    }
}
