//! Markdown transformer.
//!
//! Converts the snapshot's body HTML into Markdown with a recursive walk
//! over the parsed DOM. The converter covers the structures that matter
//! for captured articles: headings, paragraphs, emphasis, links, images,
//! lists, blockquotes, and code. Unknown elements render their children
//! inline.

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::page::PageData;

use super::UploadData;

// ============================================================================
// Constants
// ============================================================================

/// MIME type of the produced payload.
const MIME_TYPE: &str = "text/markdown";

/// Collapses runs of blank lines left by nested block elements.
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("static regex"));

/// Strips trailing whitespace before line breaks.
static TRAILING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+\n").expect("static regex"));

// ============================================================================
// Transformer
// ============================================================================

/// Transforms a snapshot into a Markdown payload.
#[must_use]
pub fn transform(page: &PageData) -> UploadData {
    UploadData {
        page_data: page.clone(),
        data: html_to_markdown(&page.body_html).into_bytes(),
        mime_type: MIME_TYPE.to_string(),
        file_extension: "md".to_string(),
    }
}

/// Converts an HTML fragment to Markdown.
#[must_use]
pub fn html_to_markdown(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    render_children(fragment.root_element(), &mut out);
    tidy(&out)
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders every child of `el` into `out`.
fn render_children(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            push_text(out, text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            render_element(child_el, out);
        }
    }
}

/// Renders one element into `out`.
fn render_element(el: ElementRef<'_>, out: &mut String) {
    let tag = el.value().name();

    match tag {
        // Invisible or irrelevant subtrees
        "script" | "style" | "noscript" | "template" | "head" | "svg" | "iframe" => {}

        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = tag[1..].parse::<usize>().unwrap_or(1);
            let heading = render_inline(el);
            if !heading.is_empty() {
                ensure_block(out);
                out.push_str(&"#".repeat(level));
                out.push(' ');
                out.push_str(&heading);
                ensure_block(out);
            }
        }

        "p" => {
            ensure_block(out);
            render_children(el, out);
            ensure_block(out);
        }

        "br" => out.push('\n'),

        "hr" => {
            ensure_block(out);
            out.push_str("---");
            ensure_block(out);
        }

        "strong" | "b" => wrap_inline(el, out, "**"),
        "em" | "i" => wrap_inline(el, out, "*"),

        "code" => {
            // Fenced blocks are emitted by the pre branch
            if parent_tag(el) != Some("pre") {
                out.push('`');
                out.push_str(&el.text().collect::<String>());
                out.push('`');
            }
        }

        "pre" => {
            let code: String = el.text().collect();
            ensure_block(out);
            out.push_str("```\n");
            out.push_str(code.trim_end());
            out.push_str("\n```");
            ensure_block(out);
        }

        "a" => {
            let label = render_inline(el);
            if !label.is_empty() {
                match el.value().attr("href") {
                    Some(href) if !href.is_empty() => {
                        out.push('[');
                        out.push_str(&label);
                        out.push_str("](");
                        out.push_str(href);
                        out.push(')');
                    }
                    _ => out.push_str(&label),
                }
            }
        }

        "img" => {
            let alt = el.value().attr("alt").unwrap_or_default();
            let src = el.value().attr("src").unwrap_or_default();
            if !src.is_empty() {
                out.push_str("![");
                out.push_str(alt);
                out.push_str("](");
                out.push_str(src);
                out.push(')');
            }
        }

        "ul" => render_list(el, out, None),
        "ol" => render_list(el, out, Some(1)),

        "blockquote" => {
            let mut inner = String::new();
            render_children(el, &mut inner);
            let inner = tidy(&inner);
            if !inner.is_empty() {
                ensure_block(out);
                for line in inner.lines() {
                    out.push_str("> ");
                    out.push_str(line);
                    out.push('\n');
                }
                ensure_block(out);
            }
        }

        // Block containers: delimit, then recurse
        "body" | "div" | "section" | "article" | "main" | "header" | "footer" | "aside"
        | "nav" | "figure" | "table" | "tbody" | "thead" | "tr" => {
            ensure_block(out);
            render_children(el, out);
            ensure_block(out);
        }

        "td" | "th" => {
            render_children(el, out);
            out.push(' ');
        }

        // Everything else renders inline (span, label, button, ...)
        _ => render_children(el, out),
    }
}

/// Renders a list, numbered when `start` is set.
fn render_list(el: ElementRef<'_>, out: &mut String, start: Option<usize>) {
    ensure_block(out);
    let mut index = start;

    for child in el.children() {
        let Some(item) = ElementRef::wrap(child) else {
            continue;
        };
        if item.value().name() != "li" {
            continue;
        }

        let body = render_inline(item);
        if body.is_empty() {
            continue;
        }

        match index.as_mut() {
            Some(n) => {
                out.push_str(&format!("{n}. {body}\n"));
                *n += 1;
            }
            None => {
                out.push_str(&format!("- {body}\n"));
            }
        }
    }

    ensure_block(out);
}

/// Renders `el`'s children and collapses the result to one line.
fn render_inline(el: ElementRef<'_>) -> String {
    let mut buf = String::new();
    render_children(el, &mut buf);
    buf.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Renders `el`'s children surrounded by an inline marker pair.
fn wrap_inline(el: ElementRef<'_>, out: &mut String, marker: &str) {
    let inner = render_inline(el);
    if !inner.is_empty() {
        out.push_str(marker);
        out.push_str(&inner);
        out.push_str(marker);
    }
}

/// Returns the tag name of `el`'s parent element, if any.
fn parent_tag(el: ElementRef<'_>) -> Option<&str> {
    el.parent()
        .and_then(ElementRef::wrap)
        .map(|parent| parent.value().name())
}

/// Appends a text node, collapsing runs of whitespace.
fn push_text(out: &mut String, text: &str) {
    if text.trim().is_empty() {
        if !out.is_empty() && !out.ends_with(char::is_whitespace) {
            out.push(' ');
        }
        return;
    }

    if text.starts_with(char::is_whitespace)
        && !out.is_empty()
        && !out.ends_with(char::is_whitespace)
    {
        out.push(' ');
    }

    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    out.push_str(&normalized);

    if text.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

/// Ensures `out` ends with exactly one blank line (block boundary).
fn ensure_block(out: &mut String) {
    if out.is_empty() {
        return;
    }
    while out.ends_with(' ') || out.ends_with('\t') {
        out.pop();
    }
    while !out.ends_with("\n\n") {
        out.push('\n');
    }
}

/// Final cleanup: collapse blank-line runs, strip trailing space, trim.
fn tidy(raw: &str) -> String {
    let stripped = TRAILING_SPACE.replace_all(raw, "\n");
    let collapsed = BLANK_LINES.replace_all(&stripped, "\n\n");
    collapsed.trim().to_string()
}

// ============================================================================
// Tests
// ============================================================================
