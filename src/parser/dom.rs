//! Shared DOM helpers: static selectors, document-order search, link query keys.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::ParseError;

/// Compiles a CSS selector at static init; panics on invalid pattern.
pub(crate) fn static_selector(pattern: &str) -> Selector {
    Selector::parse(pattern).unwrap_or_else(|e| panic!("invalid static selector '{pattern}': {e}"))
}

/// Compiles a regex at static init; panics on invalid pattern.
pub(crate) fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"\s+"));

/// Base used to resolve relative hrefs when reading their query strings.
static LINK_BASE: LazyLock<Url> = LazyLock::new(|| {
    Url::parse(crate::request::BASE_URL)
        .unwrap_or_else(|e| panic!("invalid static base URL: {e}"))
});

/// Collapses runs of whitespace into single spaces and trims.
#[must_use]
pub(crate) fn normalize_ws(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Concatenated text content of an element, whitespace-normalized.
#[must_use]
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    normalize_ws(&element.text().collect::<String>())
}

/// Concatenated text content of an element with line breaks preserved.
#[must_use]
pub(crate) fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Finds the first element named `name` that follows `start` in document
/// order, skipping `start`'s own descendants.
pub(crate) fn next_element_after<'a>(
    document: &'a Html,
    start: ElementRef<'a>,
    name: &str,
) -> Option<ElementRef<'a>> {
    let start_id = start.id();
    let mut passed = false;
    for node in document.tree.root().descendants() {
        if node.id() == start_id {
            passed = true;
            continue;
        }
        if !passed || node.ancestors().any(|ancestor| ancestor.id() == start_id) {
            continue;
        }
        if let Some(element) = ElementRef::wrap(node)
            && element.value().name() == name
        {
            return Some(element);
        }
    }
    None
}

/// Direct child elements named `name`.
pub(crate) fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

/// Text of every HTML comment in the document.
pub(crate) fn comments(document: &Html) -> impl Iterator<Item = &str> {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_comment().map(|comment| &**comment))
}

/// Value of query key `key` in a (possibly relative) link, if present.
#[must_use]
pub fn query_value(href: &str, key: &str) -> Option<String> {
    let url = LINK_BASE.join(href.trim()).ok()?;
    url.query_pairs()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
}

/// Value of query key `key`, or a [`ParseError::MissingQueryKey`].
///
/// # Errors
///
/// Returns an error when the link has no such key or the value is empty.
pub fn require_query_value(href: &str, key: &'static str) -> Result<String, ParseError> {
    query_value(href, key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ParseError::missing_query_key(href, key))
}
