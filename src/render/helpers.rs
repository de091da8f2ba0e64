//! HTML formatting helpers shared by the rendering functions.

use crate::model::Inline;

/// Escape special HTML characters.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// ` id="..."` when an id is present, empty otherwise.
pub fn id_attribute(id: Option<&str>) -> String {
    match id {
        Some(id) => format!(" id=\"{}\"", escape_html(id)),
        None => String::new(),
    }
}

/// ` class="..."` when any class names are present, empty otherwise.
pub fn class_attribute(names: &[String]) -> String {
    if names.is_empty() {
        String::new()
    } else {
        format!(" class=\"{}\"", escape_html(&names.join(" ")))
    }
}

/// An anchor element, or just the escaped text when there is no href.
pub fn link_to(text: &str, href: &str, classnames: &[String]) -> String {
    if href.is_empty() {
        escape_html(text)
    } else {
        format!(
            "<a href=\"{}\"{}>{}</a>",
            escape_html(href),
            class_attribute(classnames),
            escape_html(text)
        )
    }
}

/// A mailto link.
pub fn mail_to(email: &str, text: &str) -> String {
    link_to(text, &format!("mailto:{email}"), &[])
}

/// Render an inline run: cross-references become hyperlinks, everything
/// else is escaped text.
pub fn render_inline(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Literal(s) => out.push_str(&escape_html(s)),
            Inline::Xref(x) => out.push_str(&link_to(&x.text, &x.href, &[])),
            Inline::Span(s) => out.push_str(&escape_html(&s.text)),
        }
    }
    out
}
