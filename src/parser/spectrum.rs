//! Spectrum discovery and JCAMP-DX block extraction.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::ParseError;
use super::dom::{raw_text, require_query_value, static_selector};

const PAGE: &str = "spectrum";

static INDEX_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| static_selector(r#"a[href*="Index="]"#));
static PRE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| static_selector("pre"));

/// Spectrum indexes linked from a spectrum data page, sorted and unique.
///
/// # Errors
///
/// Returns [`ParseError`] when an `Index=` link holds a non-numeric index.
pub fn parse_spectrum_indexes(html: &str) -> Result<Vec<u32>, ParseError> {
    let document = Html::parse_document(html);
    let mut indexes = BTreeSet::new();
    for link in document.select(&INDEX_LINK_SELECTOR) {
        let href = link.value().attr("href").unwrap_or_default();
        let raw = require_query_value(href, "Index")?;
        let index = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ParseError::invalid_number("spectrum index", raw.clone()))?;
        indexes.insert(index);
    }
    Ok(indexes.into_iter().collect())
}

/// Extracts the JCAMP-DX text from a spectrum download response.
///
/// Plain-text bodies are passed through. HTML bodies are unwrapped from their
/// `pre` block. The result must contain at least one `##` labelled record.
///
/// # Errors
///
/// Returns [`ParseError::UnrecognizedPage`] when no JCAMP-DX record is present,
/// which is what the server sends for an unknown index.
pub fn parse_spectrum_block(body: &str) -> Result<String, ParseError> {
    let text = if body.trim_start().starts_with('<') {
        let document = Html::parse_document(body);
        document
            .select(&PRE_SELECTOR)
            .next()
            .map(raw_text)
            .ok_or_else(|| ParseError::unrecognized(PAGE, "no JCAMP-DX block in HTML response"))?
    } else {
        body.to_string()
    };

    let text = text.trim_start_matches(['\r', '\n']).to_string();
    if !text.lines().any(|line| line.trim_start().starts_with("##")) {
        return Err(ParseError::unrecognized(PAGE, "no ##LABEL= records"));
    }
    Ok(text)
}
