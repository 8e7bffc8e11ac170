//! Markdown-to-HTML rendering for item bodies. All of the actual parsing is
//! delegated to [`pulldown_cmark`]; this module only picks the extension
//! options and serializes the event stream.

use pulldown_cmark::{html, Options, Parser};

/// Renders a markdown source string to an HTML fragment. Strikethrough,
/// tables, task lists, and smart punctuation are enabled; fenced code blocks
/// keep their `language-*` classes so a highlighting plugin can pick them up
/// client-side.
pub fn render(source: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION;

    let mut out = String::with_capacity(source.len() * 2);
    html::push_html(&mut out, Parser::new_ext(source, options));
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render_paragraph() {
        assert_eq!(render("Hello, *world*."), "<p>Hello, <em>world</em>.</p>\n");
    }

    #[test]
    fn test_render_fenced_code_language_class() {
        let html = render("```swift\nlet x = 1\n```");
        assert!(html.contains(r#"<code class="language-swift">"#));
    }

    #[test]
    fn test_render_table() {
        let html = render("| a | b |\n| - | - |\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }
}
