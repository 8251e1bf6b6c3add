//! The `marked` directive: markdown text rendered into a `div.marked` block

use maud::{html, Markup, PreEscaped};
use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Options, Parser};
use regex::{Captures, Regex};

/// Markdown rendering switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Pass raw HTML in the source through instead of escaping it
    pub allow_raw_html: bool,
    /// Enable GitHub-style tables
    pub tables: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            allow_raw_html: false,
            tables: true,
        }
    }
}

/// Render markdown to an HTML string
///
/// Raw HTML blocks and inline tags are emitted as escaped text unless
/// `allow_raw_html` is set.
pub fn to_html(text: &str, options: &MarkdownOptions) -> String {
    let mut opts = Options::ENABLE_STRIKETHROUGH;
    if options.tables {
        opts.insert(Options::ENABLE_TABLES);
    }

    let allow_raw = options.allow_raw_html;
    let events = Parser::new_ext(text, opts).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) if !allow_raw => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut out, events);
    out
}

/// Render markdown wrapped the way the directive emits it
pub fn marked(text: &str, options: &MarkdownOptions) -> Markup {
    html! {
        div.marked { (PreEscaped(to_html(&dedent(text), options))) }
    }
}

static MARKED_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<marked(?:\s[^>]*)?>(.*?)</marked>").unwrap());

/// Replace each `<marked>…</marked>` element in a fragment with its rendering
///
/// The element's content is taken as markdown source. Elements do not nest.
pub fn expand_marked_elements(fragment: &str, options: &MarkdownOptions) -> String {
    MARKED_ELEMENT
        .replace_all(fragment, |caps: &Captures| marked(&caps[1], options).into_string())
        .into_owned()
}

/// Strip the indentation shared by all non-blank lines
///
/// Markdown embedded in an indented template would otherwise turn into code blocks.
fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|l| l.get(indent..).unwrap_or_else(|| l.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}
