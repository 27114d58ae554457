//! Search response parser.
//!
//! A search response is one of three pages: a "not found" notice, a single
//! compound page (the server short-circuits single hits), or a results
//! listing with an `ol` of compound links.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::compound::{CompoundFields, has_summary_list, parse_compound_document};
use super::dom::{element_text, require_query_value, static_selector};
use super::ParseError;

const PAGE: &str = "search results";

static H1_SELECTOR: LazyLock<Selector> = LazyLock::new(|| static_selector("h1"));
static LIST_SELECTOR: LazyLock<Selector> = LazyLock::new(|| static_selector("ol"));
static RESULT_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| static_selector(r#"a[href*="/cgi/cbook.cgi"]"#));
static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| static_selector("body"));

/// Lower-cased `h1` phrases the server uses for an empty search.
const NOT_FOUND_MARKERS: [&str; 3] = [
    "not found",
    "information from the inchi",
    "no matching species found",
];

/// Body phrase printed when the listing was cut at the result cap.
const TRUNCATION_MARKER: &str = "due to the large number of matching species";

/// Identifiers listed on a results page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchListing {
    /// Compound identifiers in page order, without duplicates.
    pub identifiers: Vec<String>,
    /// True when the page carries the truncation notice.
    pub truncated: bool,
}

/// What a search response turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPage {
    /// The server reported no matches.
    NotFound,
    /// The server answered with the single matching compound.
    Compound(Box<CompoundFields>),
    /// A results listing.
    Listing(SearchListing),
}

/// Classifies and parses a search response.
///
/// # Errors
///
/// Returns [`ParseError`] when the page is none of the three known shapes, or
/// when a known shape is missing required data.
pub fn parse_search_page(html: &str) -> Result<SearchPage, ParseError> {
    let document = Html::parse_document(html);
    if is_not_found(&document) {
        return Ok(SearchPage::NotFound);
    }
    if has_summary_list(&document) {
        let fields = parse_compound_document(&document)?;
        return Ok(SearchPage::Compound(Box::new(fields)));
    }
    parse_listing(&document).map(SearchPage::Listing)
}

/// Parses a results listing into identifiers plus the truncation flag.
///
/// # Errors
///
/// Returns [`ParseError::UnrecognizedPage`] when there is no result list, and
/// [`ParseError::MissingQueryKey`] when a result link lacks its `ID`.
pub fn parse_search_results_page(html: &str) -> Result<SearchListing, ParseError> {
    parse_listing(&Html::parse_document(html))
}

/// True when the page is the server's "no matches" notice.
#[must_use]
pub fn is_not_found_page(html: &str) -> bool {
    is_not_found(&Html::parse_document(html))
}

fn is_not_found(document: &Html) -> bool {
    document.select(&H1_SELECTOR).any(|h1| {
        let text = element_text(h1).to_lowercase();
        NOT_FOUND_MARKERS.iter().any(|marker| text.contains(marker))
    })
}

fn parse_listing(document: &Html) -> Result<SearchListing, ParseError> {
    let list = document
        .select(&LIST_SELECTOR)
        .next()
        .ok_or_else(|| ParseError::unrecognized(PAGE, "no result list"))?;

    let mut seen = HashSet::new();
    let mut identifiers = Vec::new();
    for link in list.select(&RESULT_LINK_SELECTOR) {
        let href = link.value().attr("href").unwrap_or_default();
        let id = require_query_value(href, "ID")?;
        if seen.insert(id.clone()) {
            identifiers.push(id);
        }
    }

    let body_text = document
        .select(&BODY_SELECTOR)
        .next()
        .map(element_text)
        .unwrap_or_default()
        .to_lowercase();

    Ok(SearchListing {
        identifiers,
        truncated: body_text.contains(TRUNCATION_MARKER),
    })
}
