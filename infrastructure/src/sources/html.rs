//! Readable text extraction from HTML bodies

use scraper::{ElementRef, Html, Node, Selector};

/// Tags whose entire subtree is ignored
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "svg", "nav", "footer"];

/// Extract readable text from HTML, stripping tags, scripts, and styles
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    // Prefer <body>, fall back to the whole document
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    let root = body.unwrap_or_else(|| document.root_element());

    let mut parts = Vec::new();
    collect_text(root, &mut parts);
    clean_whitespace(&parts.join(" "))
}

/// True when the content type denotes an HTML document
pub fn is_html(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains("text/html") || ct.contains("application/xhtml"))
}

fn collect_text(element: ElementRef<'_>, parts: &mut Vec<String>) {
    if SKIP_TAGS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let t = text.trim();
                if !t.is_empty() {
                    parts.push(t.to_string());
                }
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, parts);
                }
            }
            _ => {}
        }
    }
}

/// Collapse whitespace runs, keeping at most one blank line
fn clean_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_whitespace = false;
    let mut newline_count = 0;

    for ch in text.chars() {
        if ch == '\n' {
            newline_count += 1;
            if newline_count <= 2 {
                result.push('\n');
            }
            prev_was_whitespace = true;
        } else if ch.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
            }
            prev_was_whitespace = true;
            newline_count = 0;
        } else {
            result.push(ch);
            prev_was_whitespace = false;
            newline_count = 0;
        }
    }

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_basic() {
        let text = html_to_text("<html><body><h1>Tides</h1><p>are caused by the Moon.</p></body></html>");
        assert_eq!(text, "Tides are caused by the Moon.");
    }

    #[test]
    fn test_html_to_text_skips_boilerplate() {
        let html = r#"
        <html><body>
            <nav>Home | About</nav>
            <script>var tracking = 1;</script>
            <style>.x { color: red; }</style>
            <p>Visible article text</p>
            <footer>Copyright</footer>
        </body></html>
        "#;
        let text = html_to_text(html);
        assert_eq!(text, "Visible article text");
    }

    #[test]
    fn test_html_to_text_empty() {
        assert!(html_to_text("").trim().is_empty());
    }

    #[test]
    fn test_is_html() {
        assert!(is_html(Some("text/html; charset=utf-8")));
        assert!(!is_html(Some("application/json")));
        assert!(!is_html(None));
    }

    #[test]
    fn test_clean_whitespace() {
        assert_eq!(clean_whitespace("  hello   world  "), "hello world");
        assert_eq!(clean_whitespace("a\n\n\n\nb"), "a\n\nb");
    }
}
