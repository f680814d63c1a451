//! Language tags and content-based language detection.
//!
//! Snippets in lesson data usually carry no language, so the detector runs an
//! ordered list of patterns over the content and picks the first match.

use lazy_static::lazy_static;
use regex::Regex;

/// Built-in language tags understood by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    // Scripts
    JavaScript,
    Bash,

    // Data/config
    Yaml,
    Json,

    // Markup/style
    Html,
    Css,

    // Plain text, escaped only
    Text,

    // Untyped content, universal recovery rules
    Default,
}

impl Language {
    /// Every built-in language, in table order.
    pub const ALL: [Language; 8] = [
        Language::JavaScript,
        Language::Bash,
        Language::Yaml,
        Language::Json,
        Language::Html,
        Language::Css,
        Language::Text,
        Language::Default,
    ];

    /// Get the language from a tag or one of its aliases.
    ///
    /// Returns `None` for tags without a built-in handler.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "javascript" | "js" => Some(Language::JavaScript),
            "bash" | "shell" | "sh" => Some(Language::Bash),
            "yaml" | "yml" => Some(Language::Yaml),
            "json" => Some(Language::Json),
            "html" => Some(Language::Html),
            "css" => Some(Language::Css),
            "text" => Some(Language::Text),
            "default" => Some(Language::Default),
            _ => None,
        }
    }

    /// Get the canonical tag for this language.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Bash => "bash",
            Language::Yaml => "yaml",
            Language::Json => "json",
            Language::Html => "html",
            Language::Css => "css",
            Language::Text => "text",
            Language::Default => "default",
        }
    }

    /// Alternative tags that resolve to this language.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Language::JavaScript => &["js"],
            Language::Bash => &["shell", "sh"],
            Language::Yaml => &["yml"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detection pattern.
#[derive(Debug, Clone)]
pub struct DetectionRule {
    /// Language reported when the pattern matches.
    pub language: Language,
    /// Pattern tested against the whole content.
    pub pattern: Regex,
}

impl DetectionRule {
    /// Compile a detection rule.
    pub fn new(language: Language, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            language,
            pattern: Regex::new(pattern)?,
        })
    }

    /// Check whether the rule matches the content.
    pub fn matches(&self, content: &str) -> bool {
        self.pattern.is_match(content)
    }
}

lazy_static! {
    // The patterns overlap, so the more specific signals come first.
    static ref DEFAULT_RULES: Vec<DetectionRule> = vec![
        DetectionRule::new(
            Language::Bash,
            r"(?m)^(#!/bin/(ba)?sh|npm |pnpm |yarn |apt-get |sudo |echo )",
        )
        .unwrap(),
        DetectionRule::new(
            Language::JavaScript,
            r"(function |const |let |var |=>|console\.log|import |export )",
        )
        .unwrap(),
        DetectionRule::new(Language::Yaml, r"(?m)^[a-z_-]+:\s*$").unwrap(),
        DetectionRule::new(Language::Json, r"^\s*[{\[]").unwrap(),
        DetectionRule::new(Language::Html, r"(?i)<[a-z][\s\S]*>").unwrap(),
        DetectionRule::new(Language::Css, r"\{[\s\S]*:[^}]+\}").unwrap(),
    ];
}

/// Language detector using an ordered list of content patterns.
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    rules: Vec<DetectionRule>,
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector {
    /// Create a detector with the default rule order.
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
        }
    }

    /// Create a detector with a caller-supplied rule order.
    pub fn with_rules(rules: Vec<DetectionRule>) -> Self {
        Self { rules }
    }

    /// Detect the language of a snippet.
    ///
    /// The first matching rule wins. Content no rule recognises is reported
    /// as [`Language::Default`].
    pub fn detect(&self, content: &str) -> Language {
        self.rules
            .iter()
            .find(|rule| rule.matches(content))
            .map(|rule| rule.language)
            .unwrap_or(Language::Default)
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[DetectionRule] {
        &self.rules
    }
}
