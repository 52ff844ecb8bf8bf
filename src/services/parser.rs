//! Fenced code block extraction for LLM completions

use regex::Regex;
use std::sync::LazyLock;

use crate::types::GeneratedCode;

static HTML_BLOCK: LazyLock<Regex> = LazyLock::new(|| fenced_block("html"));
static CSS_BLOCK: LazyLock<Regex> = LazyLock::new(|| fenced_block("css"));
static JS_BLOCK: LazyLock<Regex> = LazyLock::new(|| fenced_block("javascript"));

fn fenced_block(label: &str) -> Regex {
    Regex::new(&format!(r"(?s)```{label}\n(.*?)```")).expect("fenced block pattern is valid")
}

/// Splits a completion into its HTML, CSS and JavaScript sections
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeBlockParser;

impl CodeBlockParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract the first `html`, `css` and `javascript` blocks.
    ///
    /// Missing blocks become empty strings; `raw` keeps the whole text.
    pub fn parse(&self, content: &str) -> GeneratedCode {
        crate::log_debug!("Parser: extracting code blocks from {} chars", content.len());

        let code = GeneratedCode {
            html: Self::extract(&HTML_BLOCK, content),
            css: Self::extract(&CSS_BLOCK, content),
            js: Self::extract(&JS_BLOCK, content),
            raw: content.to_string(),
        };

        crate::log_debug!(
            "Parser: html={} css={} js={} chars",
            code.html.len(),
            code.css.len(),
            code.js.len()
        );
        code
    }

    fn extract(pattern: &Regex, content: &str) -> String {
        pattern
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| Self::format_code(m.as_str()))
            .unwrap_or_default()
    }

    /// Trim every line and drop the empty ones
    pub fn format_code(code: &str) -> String {
        code.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_all_three_sections() {
        let completion = "Here you go:\n```html\n<main>\n  <h1>Hi</h1>\n</main>\n```\n\
                          ```css\nh1 {\n    color: red;\n}\n```\n\
                          ```javascript\nconsole.log('ok');\n```\nDone.";
        let code = CodeBlockParser::new().parse(completion);

        assert_eq!(code.html, "<main>\n<h1>Hi</h1>\n</main>");
        assert_eq!(code.css, "h1 {\ncolor: red;\n}");
        assert_eq!(code.js, "console.log('ok');");
        assert_eq!(code.raw, completion);
    }

    #[test]
    fn test_missing_blocks_are_empty() {
        let code = CodeBlockParser::new().parse("```html\n<p>only html</p>\n```");
        assert_eq!(code.html, "<p>only html</p>");
        assert!(code.css.is_empty());
        assert!(code.js.is_empty());
    }

    #[test]
    fn test_label_must_be_followed_by_newline() {
        let code = CodeBlockParser::new().parse("```js\nalert(1)\n``` ```html <p>x</p>```");
        assert!(code.js.is_empty());
        assert!(code.html.is_empty());
    }

    #[test]
    fn test_first_block_wins() {
        let code = CodeBlockParser::new().parse("```css\na{}\n```\n```css\nb{}\n```");
        assert_eq!(code.css, "a{}");
    }

    #[test]
    fn test_format_code_drops_blank_lines() {
        assert_eq!(CodeBlockParser::format_code("  a  \n\n   \n b"), "a\nb");
    }
}
