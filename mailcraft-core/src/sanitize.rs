//! Sanitizing - Everything User-Authored Goes Through Here
//!
//! Free text, attribute values, URLs and inline style values each have their
//! own entry point. Merge-field tokens such as `{{recipient.first_name}}` are
//! copied through byte for byte; the mail-merge system downstream needs them
//! exactly as authored.

use once_cell::sync::Lazy;
use regex::Regex;

static MERGE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*\s*\}\}")
        .expect("merge token pattern is valid")
});

/// Merge-field tokens in the order they appear.
pub fn merge_tokens(value: &str) -> Vec<&str> {
    MERGE_TOKEN.find_iter(value).map(|m| m.as_str()).collect()
}

/// True when `{{`/`}}` pairs do not match up outside recognised tokens.
pub fn has_unbalanced_braces(value: &str) -> bool {
    let stripped = MERGE_TOKEN.replace_all(value, "");
    stripped.contains("{{") || stripped.contains("}}")
}

fn escape_preserving_tokens(value: &str, escape: fn(&str) -> String) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    for token in MERGE_TOKEN.find_iter(value) {
        out.push_str(&escape(&value[last..token.start()]));
        out.push_str(token.as_str());
        last = token.end();
    }
    out.push_str(&escape(&value[last..]));
    out
}

fn escape_text(value: &str) -> String {
    htmlescape::encode_minimal(value)
}

fn escape_attr(value: &str) -> String {
    htmlescape::encode_minimal(value).replace('"', "&quot;")
}

/// Element content.
pub fn text(value: &str) -> String {
    escape_preserving_tokens(value, escape_text)
}

/// Element content where newlines become `<br />`.
pub fn multiline(value: &str) -> String {
    text(&value.replace("\r\n", "\n")).replace('\n', "<br />")
}

/// Double-quoted attribute value.
pub fn attr(value: &str) -> String {
    escape_preserving_tokens(value, escape_attr)
}

/// Schemes that execute or embed markup rather than navigate or load an image.
pub fn is_unsafe_url(value: &str) -> bool {
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    normalized.starts_with("javascript:")
        || normalized.starts_with("vbscript:")
        || (normalized.starts_with("data:") && !normalized.starts_with("data:image/"))
}

/// `href`/`src` value. Unsafe schemes collapse to `#`.
pub fn url(value: &str) -> String {
    let trimmed = value.trim();
    if is_unsafe_url(trimmed) {
        return "#".to_string();
    }
    attr(trimmed)
}

/// Value placed inside an inline `style` declaration.
///
/// Characters that could close the declaration, the attribute or the element
/// are dropped, as are values that try to run script. Merge-field tokens are
/// kept whole.
pub fn css_value(value: &str) -> String {
    let lowered = value.to_ascii_lowercase();
    if ["expression(", "javascript:", "url("].iter().any(|p| lowered.contains(p)) {
        return String::new();
    }
    escape_preserving_tokens(value.trim(), clean_css).trim().to_string()
}

fn clean_css(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '{' | '}' | ';' | '\\') && !c.is_control())
        .collect::<String>()
        .replace('&', "&amp;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_escapes_markup() {
        let out = text("<script>alert('x')</script> & more");
        assert!(!out.contains("<script"));
        assert!(out.contains("&lt;script&gt;"));
        assert!(out.contains("&amp; more"));
    }

    #[test]
    fn test_merge_tokens_pass_through() {
        let input = "Hi {{recipient.first_name}}, see {{ dealer.address.city }} <b>now</b>";
        let out = text(input);
        assert!(out.contains("{{recipient.first_name}}"));
        assert!(out.contains("{{ dealer.address.city }}"));
        assert!(!out.contains("<b>"));

        let href = url("https://example.com/?u={{recipient.id}}&src=email");
        assert!(href.contains("{{recipient.id}}"));
        assert!(href.contains("&amp;src=email"));
    }

    #[test]
    fn test_multiline_breaks() {
        assert_eq!(multiline("a\nb\r\nc"), "a<br />b<br />c");
    }

    #[test]
    fn test_attr_never_closes_quote() {
        let out = attr(r#"x" onerror="alert(1)"#);
        assert!(!out.contains('"'));
    }

    #[test]
    fn test_unsafe_urls_neutralized() {
        assert_eq!(url("javascript:alert(1)"), "#");
        assert_eq!(url("  JaVa\tScRiPt:alert(1)"), "#");
        assert_eq!(url("data:text/html;base64,PHNjcmlwdD4="), "#");
        assert_eq!(url("data:image/png;base64,AAAA"), "data:image/png;base64,AAAA");
        assert_eq!(url("https://example.com/a.png"), "https://example.com/a.png");
    }

    #[test]
    fn test_css_value_strips_breakouts() {
        assert_eq!(css_value("#ff0000"), "#ff0000");
        let stack = "Arial, 'Helvetica Neue', sans-serif";
        assert_eq!(css_value(stack), stack);
        assert_eq!(css_value("red;\" onload=\"x"), "red onload=x");
        assert_eq!(css_value("expression(alert(1))"), "");
    }

    #[test]
    fn test_css_value_keeps_merge_tokens() {
        assert_eq!(css_value("{{brand.primary_color}}"), "{{brand.primary_color}}");
        assert_eq!(css_value(" {{brand.font}}, serif; "), "{{brand.font}}, serif");
        assert_eq!(css_value("{{brand.color}}\"><b"), "{{brand.color}}b");
        assert_eq!(css_value("{not.a.token}"), "not.a.token");
    }

    #[test]
    fn test_unbalanced_braces() {
        assert!(!has_unbalanced_braces("Hello {{recipient.first_name}}"));
        assert!(has_unbalanced_braces("Hello {{recipient.first_name"));
        assert_eq!(merge_tokens("{{a.b}} and {{c}}"), vec!["{{a.b}}", "{{c}}"]);
    }
}
