//! HTML escaping primitives and the sanitizer collaborator seam.

/// External capability that strips dangerous markup while keeping safe HTML.
///
/// The processor only calls it for `html` content with sanitization enabled.
/// Without one, HTML content is escaped as literal text.
pub trait HtmlSanitizer: Send + Sync {
    /// Return a sanitized copy of the given markup.
    fn sanitize(&self, html: &str) -> String;
}

impl<F> HtmlSanitizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn sanitize(&self, html: &str) -> String {
        self(html)
    }
}

/// Escape the five HTML-significant characters.
///
/// Single left-to-right pass. Existing entities are not recognised, so
/// `&amp;` becomes `&amp;amp;`.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape text for use as element content, leaving quotes alone.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_html_plain_text_unchanged() {
        assert_eq!(escape_html("plain text 123"), "plain text 123");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_escape_html_is_not_entity_aware() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_escape_html_multibyte() {
        assert_eq!(escape_html("变量 <x>"), "变量 &lt;x&gt;");
    }

    #[test]
    fn test_escape_text_keeps_quotes() {
        assert_eq!(
            escape_text(r#"{"tag": "<b>" & 'x'}"#),
            r#"{"tag": "&lt;b&gt;" &amp; 'x'}"#
        );
    }

    #[test]
    fn test_closure_sanitizer() {
        let sanitizer = |html: &str| html.replace("<script>", "");
        assert_eq!(sanitizer.sanitize("<script><b>ok</b>"), "<b>ok</b>");
    }
}
