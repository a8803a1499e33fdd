//! Small helpers over `scraper` for reading and rewriting rich-text markup.
//!
//! The editor surface hands us HTML fragments. Everything here is read-only
//! parsing plus string re-serialization; no DOM is kept between calls.

use scraper::{ElementRef, Html, Selector};

/// Escapes text for safe inclusion in element content or a quoted attribute.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Concatenated text content of an element and its descendants.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// A matched element reduced to its tag name and text content.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub tag: String,
    pub text: String,
}

/// Returns every element of `markup` matching `css`, in document order.
///
/// An unparsable selector yields no blocks.
pub fn text_blocks(markup: &str, css: &str) -> Vec<TextBlock> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    let fragment = Html::parse_fragment(markup);
    fragment
        .select(&selector)
        .map(|el| TextBlock {
            tag: el.value().name().to_string(),
            text: element_text(el),
        })
        .collect()
}

/// Re-serializes the top-level nodes of `markup`, dropping elements for which
/// `drop` returns true. Comments are discarded; text is re-escaped.
pub fn retain_top_level<F>(markup: &str, drop: F) -> String
where
    F: Fn(ElementRef<'_>) -> bool,
{
    let fragment = Html::parse_fragment(markup);
    let mut out = String::with_capacity(markup.len());
    for child in fragment.root_element().children() {
        if let Some(element) = ElementRef::wrap(child) {
            if !drop(element) {
                out.push_str(&element.html());
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(&escape_text(text));
        }
    }
    out
}

/// True when the element carries `class` among its class names.
pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}
