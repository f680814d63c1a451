//! JSON handler.

use serde_json::Value;
use tracing::debug;

use super::base::{Handler, HandlerContext};
use crate::processing::escape::{escape_html, escape_text};
use crate::types::ProcessError;

/// Validates and pretty-prints JSON.
///
/// Only content that parses is reformatted (2-space indentation, key order
/// kept). Anything else is escaped as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonHandler;

impl JsonHandler {
    /// Create a new JSON handler.
    pub fn new() -> Self {
        Self
    }

    /// Parse and re-serialize JSON content.
    ///
    /// Whole-valued floats print as integers (`1e2` becomes `100`, `1.0`
    /// becomes `1`), matching what browsers produce for the same data.
    pub fn pretty_print(&self, content: &str) -> Result<String, ProcessError> {
        let mut value: Value = serde_json::from_str(content)?;
        collapse_integral_floats(&mut value);
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

/// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn collapse_integral_floats(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            if let Some(f) = n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER)
            {
                *value = Value::from(f as i64);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(collapse_integral_floats),
        Value::Object(record) => record.values_mut().for_each(collapse_integral_floats),
        _ => {}
    }
}

impl Handler for JsonHandler {
    fn name(&self) -> &str {
        "json"
    }

    fn handle(&self, content: &str, _ctx: &HandlerContext<'_>) -> Result<String, ProcessError> {
        match self.pretty_print(content) {
            Ok(pretty) => Ok(escape_text(&pretty)),
            Err(e) => {
                debug!(error = %e, "Content is not valid JSON, escaping as text");
                Ok(escape_html(content))
            }
        }
    }

    fn description(&self) -> &str {
        "Validates and pretty-prints JSON, escaping invalid input verbatim"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(content: &str) -> String {
        JsonHandler::new()
            .handle(content, &HandlerContext::new(true))
            .unwrap()
    }

    #[test]
    fn test_pretty_prints() {
        assert_eq!(run(r#"{"a":1}"#), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_preserves_key_order() {
        assert_eq!(
            run(r#"{"name":"demo","version":"1.0.0","private":true}"#),
            "{\n  \"name\": \"demo\",\n  \"version\": \"1.0.0\",\n  \"private\": true\n}"
        );
    }

    #[test]
    fn test_nested_arrays() {
        assert_eq!(run("[1,[2]]"), "[\n  1,\n  [\n    2\n  ]\n]");
    }

    #[test]
    fn test_whole_floats_print_as_integers() {
        assert_eq!(
            run(r#"{"a":1e2,"b":1.0,"c":1.5,"d":-0.0,"e":2.5e3}"#),
            "{\n  \"a\": 100,\n  \"b\": 1,\n  \"c\": 1.5,\n  \"d\": 0,\n  \"e\": 2500\n}"
        );
    }

    #[test]
    fn test_markup_inside_strings_escaped() {
        assert_eq!(run(r#"{"t":"<b>"}"#), "{\n  \"t\": \"&lt;b&gt;\"\n}");
    }

    #[test]
    fn test_invalid_json_falls_back_to_escaping() {
        assert_eq!(run(r#"{"a":"#), "{&quot;a&quot;:");
    }

    #[test]
    fn test_pretty_print_reports_error() {
        let err = JsonHandler::new().pretty_print("not json").unwrap_err();
        assert!(matches!(err, ProcessError::InvalidJson(_)));
    }
}
