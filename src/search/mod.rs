//! Search engine: query construction, submission, and result interpretation.
//!
//! The WebBook caps every search at [`SEARCH_RESULT_CAP`] hits and has no
//! offset or cursor. [`SearchResult::lost`] reports when a listing was cut;
//! callers enumerate large result sets by partitioning the query (for example
//! by fixing more atom counts in a formula pattern) and merging the pieces
//! with [`union_identifiers`].
//!
//! # Example
//!
//! ```no_run
//! use webbook::request::{RequestConfig, WebBookClient};
//! use webbook::search::{SearchParameters, SearchType, search};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WebBookClient::new(RequestConfig::default())?;
//! let result = search(&client, "anthracene", SearchType::Name, &SearchParameters::default()).await?;
//! println!("{} hits, lost = {}", result.identifiers.len(), result.lost);
//! # Ok(())
//! # }
//! ```

mod structure;

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::compound::CompoundRecord;
use crate::parser::{DataKind, ParseError, SearchPage, parse_search_page};
use crate::request::{RequestError, SEARCH_PATH, WebBookClient};

pub use structure::{MolBlockSummary, MolVersion, validate_mol_block};

/// Hard maximum number of hits the server returns for one search.
pub const SEARCH_RESULT_CAP: usize = 400;

/// Errors that prevent a search from being issued or interpreted.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Identifier was empty or whitespace.
    #[error("search identifier must not be empty")]
    EmptyIdentifier,

    /// Structure search input is not a usable MOL block.
    #[error("invalid MOL block: {reason}")]
    InvalidStructure {
        /// First problem found.
        reason: String,
    },

    /// Unrecognised search type name.
    #[error("unknown search type '{value}' (expected one of: name, inchi, cas, formula, structure-exact, structure-sub, id)")]
    UnknownSearchType {
        /// Rejected input.
        value: String,
    },

    /// Transport failure.
    #[error("request error: {0}")]
    Request(#[from] RequestError),

    /// Response page did not match any known shape.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl SearchError {
    /// Creates an `InvalidStructure` error.
    #[must_use]
    pub fn invalid_structure(reason: impl Into<String>) -> Self {
        Self::InvalidStructure {
            reason: reason.into(),
        }
    }
}

/// What the identifier passed to [`search`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchType {
    /// Chemical name.
    Name,
    /// IUPAC InChI string.
    Inchi,
    /// CAS Registry Number.
    Cas,
    /// Formula pattern; `*` and `?` act as wildcards server-side.
    Formula,
    /// Exact structure match on a MOL block.
    StructureExact,
    /// Substructure match on a MOL block.
    StructureSub,
    /// NIST compound identifier.
    Id,
}

impl SearchType {
    /// Every search type.
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Inchi,
        Self::Cas,
        Self::Formula,
        Self::StructureExact,
        Self::StructureSub,
        Self::Id,
    ];

    /// Query key carrying the identifier.
    #[must_use]
    pub fn parameter_key(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Inchi => "InChI",
            Self::Cas | Self::Id => "ID",
            Self::Formula => "Formula",
            Self::StructureExact | Self::StructureSub => "MOL",
        }
    }

    /// True for the two MOL-block searches.
    #[must_use]
    pub fn is_structure(self) -> bool {
        matches!(self, Self::StructureExact | Self::StructureSub)
    }

    /// Name accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Inchi => "inchi",
            Self::Cas => "cas",
            Self::Formula => "formula",
            Self::StructureExact => "structure-exact",
            Self::StructureSub => "structure-sub",
            Self::Id => "id",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| SearchError::UnknownSearchType {
                value: s.to_string(),
            })
    }
}

/// Unit system for thermodynamic data on returned pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Units {
    /// Joule-based (`Units=SI`).
    #[default]
    Si,
    /// Calorie-based (`Units=CAL`).
    Calorie,
}

impl Units {
    fn as_param(self) -> &'static str {
        match self {
            Self::Si => "SI",
            Self::Calorie => "CAL",
        }
    }
}

/// One entry of the [`SearchParameters::describe`] catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Server query key.
    pub codename: &'static str,
    /// What setting it does.
    pub description: &'static str,
    /// True when only formula searches honour it.
    pub formula_only: bool,
}

const FORMULA_FLAGS: [ParameterInfo; 4] = [
    ParameterInfo {
        codename: "MatchIso",
        description: "Exactly match the specified isotopes",
        formula_only: true,
    },
    ParameterInfo {
        codename: "AllowOther",
        description: "Allow elements not specified in formula",
        formula_only: true,
    },
    ParameterInfo {
        codename: "AllowExtra",
        description: "Allow more atoms of elements in formula than specified",
        formula_only: true,
    },
    ParameterInfo {
        codename: "NoIon",
        description: "Exclude ions from the search",
        formula_only: true,
    },
];

/// Search filters, translated verbatim into query parameters.
///
/// Immutable once built; the `with_*` methods return modified copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParameters {
    units: Units,
    match_isotopes: bool,
    allow_other: bool,
    allow_extra: bool,
    no_ion: bool,
    required_data: BTreeSet<DataKind>,
}

impl SearchParameters {
    /// Default parameters: SI units, no filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the unit system.
    #[must_use]
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Exactly match isotopes (formula searches only).
    #[must_use]
    pub fn with_match_isotopes(mut self, on: bool) -> Self {
        self.match_isotopes = on;
        self
    }

    /// Allow elements not in the formula (formula searches only).
    #[must_use]
    pub fn with_allow_other(mut self, on: bool) -> Self {
        self.allow_other = on;
        self
    }

    /// Allow more atoms than specified (formula searches only).
    #[must_use]
    pub fn with_allow_extra(mut self, on: bool) -> Self {
        self.allow_extra = on;
        self
    }

    /// Exclude ions (formula searches only).
    #[must_use]
    pub fn with_no_ion(mut self, on: bool) -> Self {
        self.no_ion = on;
        self
    }

    /// Only return compounds that have data of `kind`.
    #[must_use]
    pub fn requiring(mut self, kind: DataKind) -> Self {
        self.required_data.insert(kind);
        self
    }

    /// Unit system.
    #[must_use]
    pub fn units(&self) -> Units {
        self.units
    }

    /// Data kinds a hit must have.
    #[must_use]
    pub fn required_data(&self) -> &BTreeSet<DataKind> {
        &self.required_data
    }

    /// Query pairs for a search of `search_type`.
    ///
    /// `Units` is always present. Formula-only flags are dropped for every
    /// other search type.
    #[must_use]
    pub fn query_pairs(&self, search_type: SearchType) -> Vec<(&'static str, &'static str)> {
        let mut pairs = vec![("Units", self.units.as_param())];
        if search_type == SearchType::Formula {
            let flags = [
                self.match_isotopes,
                self.allow_other,
                self.allow_extra,
                self.no_ion,
            ];
            for (info, on) in FORMULA_FLAGS.iter().zip(flags) {
                if on {
                    pairs.push((info.codename, "on"));
                }
            }
        }
        for kind in &self.required_data {
            pairs.push((kind.codename(), "on"));
        }
        pairs
    }

    /// Catalogue of every supported parameter with a description.
    #[must_use]
    pub fn describe() -> Vec<ParameterInfo> {
        let mut catalogue = vec![ParameterInfo {
            codename: "Units",
            description: "Units for thermodynamic data: SI or CAL (calories)",
            formula_only: false,
        }];
        catalogue.extend(FORMULA_FLAGS);
        catalogue.extend(DataKind::ALL.into_iter().map(|kind| ParameterInfo {
            codename: kind.codename(),
            description: kind.description(),
            formula_only: false,
        }));
        catalogue
    }
}

impl fmt::Display for SearchParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs = self.query_pairs(SearchType::Formula);
        let rendered: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "SearchParameters({})", rendered.join(", "))
    }
}

/// Outcome of one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// False when the server answered with a non-success status.
    pub success: bool,
    /// True when the listing was truncated at [`SEARCH_RESULT_CAP`].
    pub lost: bool,
    /// Compound identifiers, without duplicates.
    pub identifiers: Vec<String>,
    /// Records loaded by [`SearchResult::load_compounds`], or the single hit
    /// the server returned directly.
    pub compounds: Vec<CompoundRecord>,
}

impl SearchResult {
    fn failed() -> Self {
        Self {
            success: false,
            lost: false,
            identifiers: Vec::new(),
            compounds: Vec::new(),
        }
    }

    fn empty() -> Self {
        Self {
            success: true,
            ..Self::failed()
        }
    }

    /// Number of identifiers found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// True when nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Loads a [`CompoundRecord`] for every identifier, replacing any records
    /// already held. Identifiers that no longer resolve to a single compound
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first transport or parse failure.
    pub async fn load_compounds(&mut self, client: &WebBookClient) -> crate::Result<&[CompoundRecord]> {
        let mut compounds = Vec::with_capacity(self.identifiers.len());
        for id in &self.identifiers {
            match CompoundRecord::load(client, id).await? {
                Some(record) => compounds.push(record),
                None => debug!(id = %id, "identifier did not resolve to a compound page"),
            }
        }
        self.compounds = compounds;
        Ok(&self.compounds)
    }
}

/// Union of identifiers across several searches, first occurrence first.
#[must_use]
pub fn union_identifiers<'a, I>(results: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a SearchResult>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::new();
    for result in results {
        for id in &result.identifiers {
            if seen.insert(id) {
                merged.push(id.clone());
            }
        }
    }
    merged
}

/// Runs one search.
///
/// A non-success status left after the retry budget gives
/// `success = false` with no identifiers. A "not found" page gives a
/// successful empty result.
///
/// # Errors
///
/// Returns [`SearchError::EmptyIdentifier`] / [`SearchError::InvalidStructure`]
/// for bad input, [`SearchError::Request`] for transport failures, and
/// [`SearchError::Parse`] when the response matches no known page shape.
#[instrument(skip(client, identifier, params, search_type), fields(search_type = %search_type))]
pub async fn search(
    client: &WebBookClient,
    identifier: &str,
    search_type: SearchType,
    params: &SearchParameters,
) -> Result<SearchResult, SearchError> {
    let query = build_query(identifier, search_type, params)?;
    let url = client.endpoint(SEARCH_PATH)?;
    let response = client.get(&url, query).await?;
    if !response.is_success() {
        info!(status = response.status, "search failed after retries");
        return Ok(SearchResult::failed());
    }

    let result = match parse_search_page(&response.text)? {
        SearchPage::NotFound => SearchResult::empty(),
        SearchPage::Compound(fields) => {
            let record = CompoundRecord::from_fields(*fields);
            SearchResult {
                identifiers: vec![record.id.clone()],
                compounds: vec![record],
                ..SearchResult::empty()
            }
        }
        SearchPage::Listing(listing) => SearchResult {
            lost: listing.truncated || listing.identifiers.len() >= SEARCH_RESULT_CAP,
            identifiers: listing.identifiers,
            ..SearchResult::empty()
        },
    };
    debug!(hits = result.identifiers.len(), lost = result.lost, "search parsed");
    Ok(result)
}

fn build_query(
    identifier: &str,
    search_type: SearchType,
    params: &SearchParameters,
) -> Result<Vec<(String, String)>, SearchError> {
    if identifier.trim().is_empty() {
        return Err(SearchError::EmptyIdentifier);
    }

    let mut query = Vec::new();
    if search_type.is_structure() {
        validate_mol_block(identifier)?;
        let mode = if search_type == SearchType::StructureExact {
            "Exact"
        } else {
            "Sub"
        };
        query.push(("Type".to_string(), "Struct".to_string()));
        query.push(("StructSearch".to_string(), mode.to_string()));
        query.push((search_type.parameter_key().to_string(), identifier.to_string()));
    } else {
        query.push((search_type.parameter_key().to_string(), identifier.trim().to_string()));
    }
    query.extend(
        params
            .query_pairs(search_type)
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );
    Ok(query)
}
