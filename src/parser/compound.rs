//! Compound detail page parser.
//!
//! A compound page is an `h1#Top` title followed by a summary `ul` whose direct
//! `li` children carry labelled fields ("Formula:", "CAS Registry Number:", ...)
//! and nested link lists.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use super::ParseError;
use super::dom::{
    child_elements, comments, compile_static_regex, element_text, next_element_after, normalize_ws,
    query_value, raw_text, static_selector,
};
use super::references::{ReferenceCategory, ReferenceSection, StructureFile, classify_reference};

const PAGE: &str = "compound";

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| static_selector("h1#Top"));
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| static_selector("a[href]"));
static ITEM_SELECTOR: LazyLock<Selector> = LazyLock::new(|| static_selector("li"));
static INCHI_TEXT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| static_selector(".inchi-text"));
static H2_SELECTOR: LazyLock<Selector> = LazyLock::new(|| static_selector("h2"));

/// `...cgi/...?Form=<ID>&...` inside the notes comment.
static COMMENT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"/cgi/[^\s]*?\?Form=([^&\s]+)&"));

/// Link references found on a compound page, split by category.
///
/// Values are hrefs exactly as they appear on the page (relative for
/// WebBook-hosted links).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompoundReferences {
    /// Coordinate-file downloads.
    pub structure: BTreeMap<StructureFile, String>,
    /// WebBook data pages keyed by codename (`cIR`, `cGC`, ...) or link text.
    pub webbook_data: BTreeMap<String, String>,
    /// Other public NIST sites keyed by link text.
    pub public: BTreeMap<String, String>,
    /// Subscription NIST sites keyed by link text.
    pub subscription: BTreeMap<String, String>,
}

impl CompoundReferences {
    fn insert(&mut self, category: ReferenceCategory, href: &str) {
        let href = href.trim().to_string();
        match category {
            ReferenceCategory::Structure(kind) => {
                self.structure.entry(kind).or_insert(href);
            }
            ReferenceCategory::WebBookData { key } => {
                self.webbook_data.insert(key, href);
            }
            ReferenceCategory::PublicExternal { key } => {
                self.public.insert(key, href);
            }
            ReferenceCategory::Subscription { key } => {
                self.subscription.insert(key, href);
            }
        }
    }
}

/// Fields extracted from a compound page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundFields {
    /// NIST compound identifier, e.g. `C71432`.
    pub id: String,
    /// Title of the page.
    pub name: String,
    /// "Other names", in page order.
    pub synonyms: Vec<String>,
    /// Chemical formula, e.g. `C6H6`.
    pub formula: Option<String>,
    /// Molecular weight in g/mol.
    pub mol_weight: Option<f64>,
    /// IUPAC Standard InChI.
    pub inchi: Option<String>,
    /// IUPAC Standard InChIKey.
    pub inchi_key: Option<String>,
    /// CAS Registry Number.
    pub cas_rn: Option<String>,
    /// Categorised links.
    pub references: CompoundReferences,
}

/// True when the page is a single-compound detail page.
#[must_use]
pub fn is_compound_page(html: &str) -> bool {
    has_summary_list(&Html::parse_document(html))
}

pub(crate) fn has_summary_list(document: &Html) -> bool {
    summary_list(document).is_some()
}

/// Parses a compound detail page.
///
/// # Errors
///
/// Returns [`ParseError`] when the title or summary list is missing, when no
/// compound identifier can be recovered, or when the molecular weight is not
/// a number.
pub fn parse_compound_page(html: &str) -> Result<CompoundFields, ParseError> {
    let document = Html::parse_document(html);
    parse_compound_document(&document)
}

pub(crate) fn parse_compound_document(document: &Html) -> Result<CompoundFields, ParseError> {
    let (title, info) =
        summary_list(document).ok_or_else(|| ParseError::missing(PAGE, "h1#Top title with summary list"))?;

    let mut fields = CompoundFields {
        id: String::new(),
        name: element_text(title),
        synonyms: Vec::new(),
        formula: None,
        mol_weight: None,
        inchi: None,
        inchi_key: None,
        cas_rn: None,
        references: CompoundReferences::default(),
    };

    for item in child_elements(info, "li") {
        let text = element_text(item);
        let Some((label, value)) = text.split_once(':') else {
            continue;
        };
        let label = label.trim();
        let value = value.trim();

        if label == "Formula" {
            fields.formula = Some(clean_formula(value)).filter(|f| !f.is_empty());
        } else if label == "Molecular weight" {
            fields.mol_weight = Some(parse_mol_weight(value)?);
        } else if label == "CAS Registry Number" {
            fields.cas_rn = Some(value.to_string()).filter(|v| !v.is_empty());
        } else if label == "Other names" {
            fields.synonyms = parse_synonyms(&raw_text(item));
        } else if label.ends_with("InChIKey") {
            fields.inchi_key = inchi_text(item);
        } else if label.ends_with("InChI") {
            fields.inchi = inchi_text(item);
        } else if label.starts_with("Other data available") {
            collect_list_links(item, ReferenceSection::OtherData, &mut fields.references);
        } else if label.contains("other public NIST sites") {
            collect_list_links(item, ReferenceSection::PublicSites, &mut fields.references);
        }
    }

    for link in info.select(&LINK_SELECTOR) {
        let href = link.value().attr("href").unwrap_or_default();
        if let Some(category) = classify_reference(ReferenceSection::InfoList, &element_text(link), href)
        {
            fields.references.insert(category, href);
        }
    }

    if let Some(list) = subscription_list(document) {
        collect_list_links(list, ReferenceSection::SubscriptionSites, &mut fields.references);
    }

    fields.id = compound_id(document, info, &fields.references)
        .ok_or_else(|| ParseError::missing(PAGE, "compound identifier"))?;
    Ok(fields)
}

/// Title and summary list, when both exist.
fn summary_list(document: &Html) -> Option<(ElementRef<'_>, ElementRef<'_>)> {
    let title = document.select(&TITLE_SELECTOR).next()?;
    let info = next_element_after(document, title, "ul")?;
    Some((title, info))
}

fn clean_formula(value: &str) -> String {
    normalize_ws(&value.replace("Monomer", ""))
}

fn parse_mol_weight(value: &str) -> Result<f64, ParseError> {
    let token = value
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::invalid_number("molecular weight", value))?;
    token
        .parse::<f64>()
        .ok()
        .filter(|weight| weight.is_finite())
        .ok_or_else(|| ParseError::invalid_number("molecular weight", value))
}

fn parse_synonyms(raw: &str) -> Vec<String> {
    let body = raw.split_once(':').map_or(raw, |(_, rest)| rest);
    body.lines()
        .map(|line| normalize_ws(line.trim().trim_matches(';')))
        .filter(|name| !name.is_empty())
        .collect()
}

fn inchi_text(item: ElementRef<'_>) -> Option<String> {
    item.select(&INCHI_TEXT_SELECTOR)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Adds the first link of every nested `li` under `list`.
fn collect_list_links(list: ElementRef<'_>, section: ReferenceSection, refs: &mut CompoundReferences) {
    for entry in list.select(&ITEM_SELECTOR) {
        let Some(link) = entry.select(&LINK_SELECTOR).next() else {
            continue;
        };
        let href = link.value().attr("href").unwrap_or_default();
        if let Some(category) = classify_reference(section, &element_text(link), href) {
            refs.insert(category, href);
        }
    }
}

fn subscription_list(document: &Html) -> Option<ElementRef<'_>> {
    let header = document
        .select(&H2_SELECTOR)
        .find(|h2| element_text(*h2).contains("NIST subscription"))?;
    next_element_after(document, header, "ul")
}

/// Recovers the identifier: notes comment, then units-switch link, then data links.
fn compound_id(document: &Html, info: ElementRef<'_>, refs: &CompoundReferences) -> Option<String> {
    let from_comment = comments(document).find_map(|comment| {
        let flat: String = comment.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        COMMENT_ID_RE
            .captures(&flat)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    });
    if from_comment.is_some() {
        return from_comment;
    }

    let from_switch = info
        .select(&LINK_SELECTOR)
        .filter(|link| element_text(*link).contains("witch to"))
        .find_map(|link| link.value().attr("href").and_then(|href| query_value(href, "ID")));
    if from_switch.is_some() {
        return from_switch;
    }

    refs.webbook_data
        .values()
        .find_map(|href| query_value(href, "ID"))
        .filter(|id| !id.is_empty())
}
