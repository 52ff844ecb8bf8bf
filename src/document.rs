//! Full-page assembly, the sandboxed preview frame and element-level edits

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// `sandbox` attribute of the preview frame
pub const SANDBOX_POLICY: &str = "allow-scripts";

/// Elements written without a closing tag
const VOID_ELEMENTS: [&str; 8] = ["area", "br", "col", "hr", "img", "input", "link", "meta"];

static STYLE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\sstyle\s*=\s*"([^"]*)""#).expect("Failed to compile style attribute regex")
});

const BASE_STYLES: &str = "* {
        margin: 0;
        padding: 0;
        box-sizing: border-box;
      }
      body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
      }";

/// Self-contained HTML document from generated fragments
pub fn assemble(html: &str, css: &str, js: &str) -> String {
    format!(
        "<!DOCTYPE html>
<html>
  <head>
    <style>
      {BASE_STYLES}
      {css}
    </style>
  </head>
  <body>
    {html}
    <script>{js}</script>
  </body>
</html>
"
    )
}

/// Wrap a document in an iframe that may run scripts and nothing else
pub fn preview_frame(document: &str) -> String {
    format!(
        "<iframe sandbox=\"{SANDBOX_POLICY}\" title=\"preview\" srcdoc=\"{}\"></iframe>",
        escape_attribute(document)
    )
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Parse `prop: value;` lists into ordered pairs.
///
/// Entries without a property or value are skipped; a repeated property
/// keeps its first position and takes the later value.
pub fn parse_style_declarations(text: &str) -> Vec<(String, String)> {
    let mut declarations: Vec<(String, String)> = Vec::new();

    for entry in text.split(';').filter(|e| !e.trim().is_empty()) {
        let Some((prop, value)) = entry.split_once(':') else {
            continue;
        };
        let (prop, value) = (prop.trim(), value.trim());
        if prop.is_empty() || value.is_empty() {
            continue;
        }

        match declarations.iter_mut().find(|(p, _)| p == prop) {
            Some(existing) => existing.1 = value.to_string(),
            None => declarations.push((prop.to_string(), value.to_string())),
        }
    }

    declarations
}

/// Render declarations back into an inline `style` value
pub fn format_style_declarations(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(prop, value)| format!("{prop}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Byte range of the first `<tag>` element, closing tag included.
///
/// Tags match case-insensitively and nested elements of the same tag are
/// balanced. Void and self-closing elements end at their opening tag.
pub fn find_element(document: &str, tag: &str) -> Option<Range<usize>> {
    let tag = tag.trim().to_ascii_lowercase();
    if tag.is_empty() {
        return None;
    }

    let lower = document.to_ascii_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let start = find_opening_tag(&lower, &open, 0)?;
    let open_end = start + lower[start..].find('>')? + 1;
    if VOID_ELEMENTS.contains(&tag.as_str()) || lower[..open_end].ends_with("/>") {
        return Some(start..open_end);
    }

    let mut depth = 1;
    let mut cursor = open_end;
    while depth > 0 {
        let next_close = cursor + lower[cursor..].find(&close)?;
        match find_opening_tag(&lower, &open, cursor) {
            Some(next_open) if next_open < next_close => {
                depth += 1;
                cursor = next_open + open.len();
            }
            _ => {
                depth -= 1;
                cursor = next_close + close.len();
            }
        }
    }

    Some(start..cursor)
}

fn find_opening_tag(lower: &str, open: &str, from: usize) -> Option<usize> {
    let mut cursor = from;
    while let Some(offset) = lower[cursor..].find(open) {
        let at = cursor + offset;
        let boundary = lower[at + open.len()..].chars().next();
        if boundary.is_some_and(|c| c.is_whitespace() || c == '>' || c == '/') {
            return Some(at);
        }
        cursor = at + open.len();
    }
    None
}

/// Merge `declarations` into the inline style of an element's opening tag
pub fn apply_inline_style(element: &str, declarations: &str) -> String {
    let Some(open_end) = element.find('>') else {
        return element.to_string();
    };
    let (opening, rest) = element.split_at(open_end);

    let existing = STYLE_ATTRIBUTE
        .captures(opening)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str());
    let merged = parse_style_declarations(&format!("{existing};{declarations}"));
    let attribute = format!(" style=\"{}\"", escape_attribute(&format_style_declarations(&merged)));

    let opening = if STYLE_ATTRIBUTE.is_match(opening) {
        STYLE_ATTRIBUTE
            .replace(opening, regex::NoExpand(&attribute))
            .into_owned()
    } else {
        match opening.strip_suffix('/') {
            Some(head) => format!("{}{attribute} /", head.trim_end()),
            None => format!("{opening}{attribute}"),
        }
    };

    format!("{opening}{rest}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_orders_sections() {
        let doc = assemble("<h1>Hi</h1>", "h1 { color: red; }", "console.log(1)");

        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("box-sizing: border-box;"));
        assert!(doc.contains("'Segoe UI'"));

        let reset = doc.find("box-sizing").unwrap_or(usize::MAX);
        let css = doc.find("h1 { color: red; }").unwrap_or(0);
        let html = doc.find("<h1>Hi</h1>").unwrap_or(0);
        let js = doc.find("<script>console.log(1)</script>").unwrap_or(0);
        assert!(reset < css && css < html && html < js);
    }

    #[test]
    fn test_preview_frame_escapes() {
        let frame = preview_frame("<p class=\"x\">a & b</p>");
        assert!(frame.starts_with("<iframe sandbox=\"allow-scripts\""));
        assert!(frame.contains("srcdoc=\"&lt;p class=&quot;x&quot;&gt;a &amp; b&lt;/p&gt;\""));
        assert!(!frame.contains("allow-same-origin"));
    }

    #[test]
    fn test_style_declarations() {
        let parsed = parse_style_declarations(
            "color: red; ; margin:0;broken; padding: ; background: url(http://x/a.png); color: blue",
        );
        assert_eq!(
            parsed,
            vec![
                ("color".to_string(), "blue".to_string()),
                ("margin".to_string(), "0".to_string()),
                ("background".to_string(), "url(http://x/a.png)".to_string()),
            ]
        );
    }

    #[test]
    fn test_find_element_balances_nesting() {
        let doc = "<body><DIV class=\"a\"><div>inner</div></DIV><div>second</div></body>";
        let range = find_element(doc, "div").expect("div present");
        assert_eq!(&doc[range], "<DIV class=\"a\"><div>inner</div></DIV>");
    }

    #[test]
    fn test_find_element_tag_boundaries() {
        let doc = "<header><h1>Title</h1></header><h1>x</h1>";
        let range = find_element(doc, "h1").expect("h1 present");
        assert_eq!(&doc[range], "<h1>Title</h1>");

        assert_eq!(find_element(doc, "head"), None);
        assert_eq!(find_element(doc, "  "), None);
        assert_eq!(find_element("<p>unclosed", "p"), None);
    }

    #[test]
    fn test_find_void_element() {
        let doc = "<p>a</p><img src=\"x.jpg\" alt=\"x\"><p>b</p>";
        let range = find_element(doc, "IMG").expect("img present");
        assert_eq!(&doc[range], "<img src=\"x.jpg\" alt=\"x\">");
    }

    #[test]
    fn test_inline_style_added_and_merged() {
        assert_eq!(
            apply_inline_style("<h1>Hi</h1>", "color: red"),
            "<h1 style=\"color: red;\">Hi</h1>"
        );
        assert_eq!(
            apply_inline_style(
                "<p class=\"lead\" style=\"color: red; margin: 0\">x</p>",
                "color: blue; padding: 1rem"
            ),
            "<p class=\"lead\" style=\"color: blue; margin: 0; padding: 1rem;\">x</p>"
        );
        assert_eq!(
            apply_inline_style("<br/>", "clear: both"),
            "<br style=\"clear: both;\" />"
        );
    }
}
