//! Message body handling

use html_escape::encode_text;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PARAGRAPH_OPEN: Regex = Regex::new(r"(?i)<p(\s[^>]*)?>").unwrap();
    static ref PARAGRAPH_CLOSE: Regex = Regex::new(r"(?i)</p\s*>").unwrap();
}

/// What the rich-text editor holds when nothing has been typed
pub const EMPTY_EDITOR: &str = "<p><br></p>";

const LINE_BREAK: &str = "<br>";

/// Whether `html` carries no content
pub fn is_empty_body(html: &str) -> bool {
    let html = html.trim();

    html.is_empty() || html == EMPTY_EDITOR || html == "<p></p>"
}

/// Turn plain text into editor HTML, one escaped paragraph per line
pub fn body_from_text(text: &str) -> String {
    text.lines()
        .map(|line| match line.trim() {
            "" => EMPTY_EDITOR.to_string(),
            _ => format!("<p>{}</p>", encode_text(line)),
        })
        .collect()
}

/// Flatten editor paragraphs into `<br>`-separated HTML.
///
/// Opening `<p>` tags are dropped, closing ones become `<br>`, doubled
/// breaks are collapsed in a single pass and one trailing break is removed.
pub fn normalize_body(html: &str) -> String {
    let html = PARAGRAPH_OPEN.replace_all(html, "");
    let html = PARAGRAPH_CLOSE.replace_all(&html, LINE_BREAK);
    let html = html.replace("<br><br>", LINE_BREAK);

    match html.strip_suffix(LINE_BREAK) {
        Some(stripped) => stripped.to_string(),
        None => html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body() {
        assert!(is_empty_body(EMPTY_EDITOR));
        assert!(is_empty_body("  "));
        assert!(is_empty_body("<p></p>"));
        assert!(!is_empty_body("<p>Hi</p>"));
    }

    #[test]
    fn test_normalize_single_paragraph() {
        assert_eq!(normalize_body("<p>Hello</p>"), "Hello");
    }

    #[test]
    fn test_normalize_paragraphs() {
        assert_eq!(
            normalize_body("<p>Hello</p><p>World</p>"),
            "Hello<br>World"
        );
    }

    #[test]
    fn test_normalize_keeps_blank_line_between_paragraphs() {
        assert_eq!(
            normalize_body("<p>Hello</p><p><br></p><p>Bye</p>"),
            "Hello<br><br>Bye"
        );
    }

    #[test]
    fn test_normalize_paragraph_with_attributes() {
        assert_eq!(
            normalize_body(r#"<p class="ql-align-center">Centered</p><pre>code</pre>"#),
            "Centered<br><pre>code</pre>"
        );
    }

    #[test]
    fn test_body_from_text_escapes_markup() {
        assert_eq!(
            body_from_text("a < b & c\n\n<b>not bold</b>"),
            "<p>a &lt; b &amp; c</p><p><br></p><p>&lt;b&gt;not bold&lt;/b&gt;</p>"
        );
        assert_eq!(
            normalize_body(&body_from_text("Hi\nBye")),
            "Hi<br>Bye"
        );
    }

    #[test]
    fn test_normalize_plain_text_untouched() {
        assert_eq!(normalize_body("already <b>flat</b>"), "already <b>flat</b>");
    }
}
