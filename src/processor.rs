//! The content processor: language resolution, handler dispatch and object
//! traversal.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::handlers::{FnHandler, Handler, HandlerContext};
use crate::processing::escape::{escape_html, HtmlSanitizer};
use crate::processing::{Language, LanguageDetector};
use crate::router::{HandlerRouter, ResolvedLanguage};
use crate::types::{ProcessError, ProcessorConfig};

/// Field processed with its sibling `language`, or detected.
pub const CODE_FIELD: &str = "code";
/// Field processed as HTML.
pub const HTML_FIELD: &str = "html";
/// Sibling field declaring the language of `code`.
pub const LANGUAGE_FIELD: &str = "language";

/// Counts of fields rewritten by an object traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectStats {
    /// `code` fields processed
    pub code_fields: usize,
    /// `html` fields processed
    pub html_fields: usize,
}

/// Converts raw snippets into HTML-safe, display-ready text.
///
/// The processor is immutable after construction and can be shared across
/// threads; every call is an independent transformation.
///
/// ```
/// use content_processor::{ContentProcessor, ProcessorConfig};
///
/// let processor = ContentProcessor::new(ProcessorConfig::default());
/// assert_eq!(processor.process(r"echo \$HOME", Some("bash")), "echo $HOME");
/// assert_eq!(processor.process("a<b", Some("text")), "a&lt;b");
/// ```
pub struct ContentProcessor {
    config: ProcessorConfig,
    router: HandlerRouter,
    detector: LanguageDetector,
    sanitizer: Option<Arc<dyn HtmlSanitizer>>,
}

impl Default for ContentProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

impl ContentProcessor {
    /// Create a processor with the built-in handlers.
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            router: HandlerRouter::new(),
            detector: LanguageDetector::new(),
            sanitizer: None,
        }
    }

    /// Register a custom transform for a language tag.
    ///
    /// The transform replaces the built-in recovery for that tag (or adds a
    /// new tag); a built-in alias registers for its whole language. The
    /// output is always HTML-escaped, `html` included: custom transforms
    /// cannot emit markup, use [`with_sanitizer`](Self::with_sanitizer) for
    /// that.
    pub fn with_custom_handler<F>(self, tag: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&str) -> Result<String, ProcessError> + Send + Sync + 'static,
    {
        let tag = tag.into();
        let handler = FnHandler::new(tag.clone(), transform);
        self.with_handler(tag, Arc::new(handler))
    }

    /// Register a custom handler implementation for a language tag.
    pub fn with_handler(mut self, tag: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        self.router = self.router.with_custom(tag, handler);
        self
    }

    /// Attach an HTML sanitizer collaborator.
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn HtmlSanitizer>) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    /// Replace the detection rules.
    pub fn with_detector(mut self, detector: LanguageDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Get the handler router.
    pub fn router(&self) -> &HandlerRouter {
        &self.router
    }

    /// Detect the language of a snippet.
    pub fn detect_language(&self, content: &str) -> Language {
        self.detector.detect(content)
    }

    /// Resolve the language a snippet will be processed as.
    ///
    /// A declared tag the handler table knows is used as-is and detection is
    /// skipped. `default`, blank and unknown tags fall through to detection.
    pub fn resolve_language(&self, content: &str, declared: Option<&str>) -> ResolvedLanguage {
        if let Some(tag) = declared.map(str::trim).filter(|tag| !tag.is_empty()) {
            match self.router.resolve_tag(tag) {
                Some(ResolvedLanguage::Builtin(Language::Default)) | None => {
                    debug!(tag, "Declared language not handled, detecting");
                }
                Some(resolved) => return resolved,
            }
        }

        let detected = self.detector.detect(content);
        debug!(language = %detected, "Detected language");
        self.router.resolve_language(detected)
    }

    /// Process a snippet into display-ready text.
    ///
    /// Never fails: if the handler errors or panics, the original content is
    /// HTML-escaped instead.
    pub fn process(&self, content: &str, language: Option<&str>) -> String {
        self.process_resolved(content, language).0
    }

    /// Process a snippet and report the language used.
    pub fn process_resolved(
        &self,
        content: &str,
        language: Option<&str>,
    ) -> (String, ResolvedLanguage) {
        let resolved = self.resolve_language(content, language);
        if content.is_empty() {
            return (String::new(), resolved);
        }

        let output = match self.run_handler(content, &resolved) {
            Ok(output) => output,
            Err(e @ ProcessError::HandlerPanicked { .. }) => {
                error!(language = %resolved, error = %e, "Handler panicked, escaping content");
                escape_html(content)
            }
            Err(e) => {
                warn!(language = %resolved, error = %e, "Handler failed, escaping content");
                escape_html(content)
            }
        };

        (output, resolved)
    }

    fn run_handler(
        &self,
        content: &str,
        resolved: &ResolvedLanguage,
    ) -> Result<String, ProcessError> {
        let handler = self.router.handler_for(resolved);
        let ctx = HandlerContext {
            sanitize: self.config.sanitize_html,
            sanitizer: self.sanitizer.as_deref(),
        };

        panic::catch_unwind(AssertUnwindSafe(|| handler.handle(content, &ctx))).unwrap_or_else(|_| {
            Err(ProcessError::HandlerPanicked {
                language: resolved.to_string(),
            })
        })
    }

    /// Process every `code` and `html` field in a record tree.
    ///
    /// Returns a structurally identical value. `code` strings use their
    /// sibling `language` (or detection), `html` strings are processed as
    /// HTML, records and arrays are walked, everything else is copied.
    pub fn process_object(&self, value: &Value) -> Value {
        self.process_object_with_stats(value).0
    }

    /// Like [`process_object`](Self::process_object), also counting the
    /// fields that were rewritten.
    pub fn process_object_with_stats(&self, value: &Value) -> (Value, ObjectStats) {
        let mut stats = ObjectStats::default();
        let processed = self.walk(value, &mut stats);
        (processed, stats)
    }

    fn walk(&self, value: &Value, stats: &mut ObjectStats) -> Value {
        match value {
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.walk(item, stats)).collect())
            }
            Value::Object(record) => Value::Object(self.walk_record(record, stats)),
            other => other.clone(),
        }
    }

    fn walk_record(
        &self,
        record: &Map<String, Value>,
        stats: &mut ObjectStats,
    ) -> Map<String, Value> {
        let declared = record
            .get(LANGUAGE_FIELD)
            .and_then(Value::as_str)
            .filter(|tag| !tag.is_empty());

        record
            .iter()
            .map(|(key, value)| {
                let processed = match (key.as_str(), value) {
                    (CODE_FIELD, Value::String(code)) => {
                        stats.code_fields += 1;
                        Value::String(self.process(code, declared))
                    }
                    (HTML_FIELD, Value::String(html)) => {
                        stats.html_fields += 1;
                        Value::String(self.process(html, Some(Language::Html.as_str())))
                    }
                    _ => self.walk(value, stats),
                };
                (key.clone(), processed)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn processor() -> ContentProcessor {
        ContentProcessor::default()
    }

    const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&#39;"];

    fn assert_inert(output: &str) {
        assert!(!output.contains('<'), "raw '<' in {:?}", output);
        assert!(!output.contains('>'), "raw '>' in {:?}", output);
        for (at, _) in output.match_indices('&') {
            assert!(
                ENTITIES.iter().any(|entity| output[at..].starts_with(entity)),
                "bare '&' at {} in {:?}",
                at,
                output
            );
        }
    }

    #[test]
    fn test_javascript_template_marker() {
        let out = processor().process(r"const x = \${name};", Some("javascript"));
        assert_eq!(out, "const x = ${name};");
    }

    #[test]
    fn test_bash_variable() {
        assert_eq!(processor().process(r"echo \$HOME", Some("bash")), "echo $HOME");
        assert_eq!(processor().process(r"echo \$HOME", Some("sh")), "echo $HOME");
    }

    #[test]
    fn test_yaml_ci_expression() {
        assert_eq!(
            processor().process(r"run: \${{ matrix.os }}", Some("yaml")),
            "run: ${{ matrix.os }}"
        );
    }

    #[test]
    fn test_json_pretty_print() {
        assert_eq!(processor().process(r#"{"a":1}"#, Some("json")), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_json_parse_failure() {
        assert_eq!(processor().process(r#"{"a":"#, Some("json")), "{&quot;a&quot;:");
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(processor().process("", Some("json")), "");
        assert_eq!(processor().process("", None), "");
    }

    #[test]
    fn test_declared_language_skips_detection() {
        // Detection would pick bash here and recover the variable.
        let out = processor().process(r"echo \$HOME", Some("javascript"));
        assert_eq!(out, r"echo \$HOME");
    }

    #[test]
    fn test_detection_when_undeclared() {
        let processor = processor();
        assert_eq!(processor.process(r"echo \$HOME", None), "echo $HOME");
        assert_eq!(processor.process(r"echo \$HOME", Some("default")), "echo $HOME");
        assert_eq!(processor.process(r"echo \$HOME", Some("cobol")), "echo $HOME");
    }

    #[test]
    fn test_resolve_language() {
        let processor = processor();
        assert_eq!(
            processor.resolve_language("#!/bin/bash\necho hi", None),
            ResolvedLanguage::Builtin(Language::Bash)
        );
        assert_eq!(
            processor.resolve_language("jobs:\n  a: 1", Some("js")),
            ResolvedLanguage::Builtin(Language::JavaScript)
        );
        assert_eq!(
            processor.resolve_language("plain prose", Some("  ")),
            ResolvedLanguage::Builtin(Language::Default)
        );
    }

    #[test]
    fn test_untyped_content_uses_universal_rules() {
        assert_eq!(
            processor().process(r"Set \$TOKEN then \${{ secrets.X }}", None),
            "Set $TOKEN then ${{ secrets.X }}"
        );
    }

    #[test]
    fn test_html_without_sanitizer_is_escaped() {
        let out = processor().process("<img onerror=x>", Some("html"));
        assert_eq!(out, "&lt;img onerror=x&gt;");
    }

    #[test]
    fn test_html_with_sanitizer() {
        let processor = processor()
            .with_sanitizer(Arc::new(|html: &str| html.replace(" onerror=x", "")));
        assert_eq!(processor.process("<img onerror=x>", Some("html")), "<img>");
    }

    #[test]
    fn test_html_sanitizer_unused_when_disabled() {
        let processor = ContentProcessor::new(ProcessorConfig::default().with_sanitize(false))
            .with_sanitizer(Arc::new(|_: &str| String::from("sanitized")));
        assert_eq!(processor.process("<b>", Some("html")), "&lt;b&gt;");
    }

    #[test]
    fn test_custom_handler_extends() {
        let processor = processor().with_custom_handler("sql", |s| Ok(s.to_uppercase()));
        assert_eq!(processor.process("select 1 < 2", Some("sql")), "SELECT 1 &lt; 2");
    }

    #[test]
    fn test_custom_handler_overrides_builtin() {
        let processor = processor().with_custom_handler("bash", |s| Ok(s.replace("rm", "del")));
        assert_eq!(processor.process(r"rm \$X", Some("bash")), r"del \$X");
        // Detected bash content goes through the override too.
        assert_eq!(processor.process("echo rm", None), "echo del");
        // Aliases follow the override.
        assert_eq!(processor.process(r"rm \$X", Some("sh")), r"del \$X");
        // Other languages keep their built-in handler.
        assert_eq!(processor.process(r"rm \${X}", Some("yaml")), "rm ${X}");
    }

    #[test]
    fn test_custom_handler_on_alias_covers_language() {
        let processor = processor().with_custom_handler("js", |s| Ok(s.to_uppercase()));
        assert_eq!(processor.process("abc", Some("js")), "ABC");
        assert_eq!(processor.process("abc", Some("javascript")), "ABC");
        // Detected javascript goes through it too.
        assert_eq!(processor.process("const a", None), "CONST A");
    }

    #[test]
    fn test_custom_html_handler_output_is_escaped() {
        let processor = processor().with_custom_handler("html", |s| Ok(format!("<p>{}</p>", s)));
        assert_eq!(processor.process("hi", Some("html")), "&lt;p&gt;hi&lt;/p&gt;");
    }

    #[test]
    fn test_declared_tags_ignore_case() {
        assert_eq!(processor().process(r"echo \$HOME", Some("JS")), r"echo \$HOME");
        assert_eq!(processor().process(r"echo \$HOME", Some(" Bash ")), "echo $HOME");
    }

    #[test]
    fn test_handler_error_falls_back_to_escaping() {
        let processor = processor().with_custom_handler("broken", |_| {
            Err(ProcessError::handler("broken", "boom"))
        });
        assert_eq!(processor.process(r"<a> \${x}", Some("broken")), r"&lt;a&gt; \${x}");
    }

    #[test]
    fn test_handler_panic_falls_back_to_escaping() {
        let processor = processor()
            .with_custom_handler("panics", |_| -> Result<String, ProcessError> {
                panic!("handler bug")
            });
        assert_eq!(processor.process("<a>", Some("panics")), "&lt;a&gt;");
    }

    #[test]
    fn test_no_raw_markup_for_any_language() {
        let processor = processor();
        let inputs = [
            "<script>alert(1)</script>",
            r"const t = `<b>\${x}</b>`;",
            "echo '<tag>' > file",
            "key:\n  value: <x>",
            r#"{"html": "<i>"}"#,
            "<div onclick=\"x\">",
            "a { b: c } <style>",
            "plain < text > here",
            "fish & chips",
            r#"{"q": "a & b"}"#,
        ];
        for language in [
            None,
            Some("javascript"),
            Some("bash"),
            Some("yaml"),
            Some("json"),
            Some("html"),
            Some("css"),
            Some("text"),
            Some("unknown"),
        ] {
            for input in inputs {
                assert_inert(&processor.process(input, language));
            }
        }
    }

    #[test]
    fn test_process_object_code_with_language() {
        let out = processor().process_object(&json!({ "code": "a<b", "language": "text" }));
        assert_eq!(out, json!({ "code": "a&lt;b", "language": "text" }));
    }

    #[test]
    fn test_process_object_nested() {
        let input = json!({
            "id": 7,
            "title": "Variables <intro>",
            "examples": [
                { "code": r"echo \$HOME", "language": "bash" },
                { "code": r"const a = \${b};" },
                { "html": "<b>bold</b>" },
                "loose string"
            ],
            "meta": { "code": 42, "flags": [true, null] }
        });
        let (out, stats) = processor().process_object_with_stats(&input);

        assert_eq!(
            out,
            json!({
                "id": 7,
                "title": "Variables <intro>",
                "examples": [
                    { "code": "echo $HOME", "language": "bash" },
                    { "code": "const a = ${b};" },
                    { "html": "&lt;b&gt;bold&lt;/b&gt;" },
                    "loose string"
                ],
                "meta": { "code": 42, "flags": [true, null] }
            })
        );
        assert_eq!(stats, ObjectStats { code_fields: 2, html_fields: 1 });
    }

    #[test]
    fn test_process_object_html_not_executable() {
        let out = processor().process_object(&json!({ "html": "<img onerror=x>" }));
        assert_eq!(out, json!({ "html": "&lt;img onerror=x&gt;" }));
    }

    #[test]
    fn test_process_object_scalars_unchanged() {
        let processor = processor();
        assert_eq!(processor.process_object(&json!(3)), json!(3));
        assert_eq!(processor.process_object(&json!("<b>")), json!("<b>"));
        assert_eq!(processor.process_object(&Value::Null), Value::Null);
    }

    #[test]
    fn test_process_object_preserves_key_order() {
        let out = processor().process_object(&json!({ "z": 1, "code": "x", "a": 2 }));
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "code", "a"]);
    }

    #[test]
    fn test_shared_across_threads() {
        let processor = Arc::new(processor());
        let calls = Arc::new(AtomicUsize::new(0));

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let processor = Arc::clone(&processor);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    let out = processor.process(&format!(r"echo \$VAR_{i}"), Some("bash"));
                    calls.fetch_add(1, Ordering::SeqCst);
                    out
                })
            })
            .collect();

        for (i, worker) in workers.into_iter().enumerate() {
            assert_eq!(worker.join().unwrap(), format!("echo $VAR_{i}"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
