//! Handler for languages with an escape-recovery chain.

use tracing::trace;

use super::base::{Handler, HandlerContext};
use crate::processing::escape::escape_html;
use crate::processing::language::Language;
use crate::processing::recovery;
use crate::types::ProcessError;

/// Recovers legacy escape artifacts, then HTML-escapes the result.
///
/// Covers javascript, bash, yaml and untyped content; they differ only in
/// the recovery chain they run.
#[derive(Debug, Clone, Copy)]
pub struct RecoveryHandler {
    language: Language,
}

impl RecoveryHandler {
    /// Template-literal markers (`\${x}`).
    pub fn javascript() -> Self {
        Self {
            language: Language::JavaScript,
        }
    }

    /// Shell variables and CI expressions.
    pub fn bash() -> Self {
        Self {
            language: Language::Bash,
        }
    }

    /// CI expressions and template markers.
    pub fn yaml() -> Self {
        Self {
            language: Language::Yaml,
        }
    }

    /// Every rule, for untyped content from older data files.
    ///
    /// This also rewrites `\$NAME` in prose that never meant a shell
    /// variable. Existing lesson data relies on it, so it stays.
    pub fn universal() -> Self {
        Self {
            language: Language::Default,
        }
    }

    /// The language whose chain this handler runs.
    pub fn language(&self) -> Language {
        self.language
    }
}

impl Handler for RecoveryHandler {
    fn name(&self) -> &str {
        self.language.as_str()
    }

    fn handle(&self, content: &str, _ctx: &HandlerContext<'_>) -> Result<String, ProcessError> {
        trace!(language = %self.language, "Running recovery chain");
        let recovered = recovery::recover(self.language, content);
        Ok(escape_html(&recovered))
    }

    fn description(&self) -> &str {
        match self.language {
            Language::JavaScript => "Restores template-literal markers, then escapes",
            Language::Bash => "Restores shell variables and CI expressions, then escapes",
            Language::Yaml => "Restores CI expressions and template markers, then escapes",
            _ => "Applies every recovery rule to untyped content, then escapes",
        }
    }
}
