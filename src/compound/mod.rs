//! Compound records and their lazily fetched artifacts.
//!
//! A [`CompoundRecord`] is filled from the compound page when it is built.
//! Coordinate files, spectra and chromatograms start as
//! [`Artifact::NotFetched`] and are loaded only by the matching `fetch_*`
//! call. Every fetch re-requests and overwrites its slot.

mod chromatogram;
mod spectrum;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::parser::{
    CompoundFields, CompoundReferences, DataKind, SearchPage, StructureFile, is_compound_page,
    large_format_table_links, parse_chromatography_page, parse_compound_page, parse_search_page,
    parse_spectrum_block, parse_spectrum_indexes,
};
use crate::request::{INCHI_PATH, SEARCH_PATH, WebBookClient, fix_html};
use crate::search::SearchError;

pub use chromatogram::Chromatogram;
pub use spectrum::{Spectrum, SpectrumKind};

static CAS_RE: LazyLock<Regex> =
    LazyLock::new(|| crate::parser::compile_static_regex(r"^\d{2,7}-\d{2}-\d$"));

/// Load state of a secondary artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Artifact<T> {
    /// Never requested.
    #[default]
    NotFetched,
    /// Loaded by the last fetch.
    Fetched(T),
    /// The last fetch failed with this message.
    FetchFailed(String),
}

impl<T> Artifact<T> {
    /// Loaded value, if the last fetch succeeded.
    #[must_use]
    pub fn as_fetched(&self) -> Option<&T> {
        match self {
            Self::Fetched(value) => Some(value),
            Self::NotFetched | Self::FetchFailed(_) => None,
        }
    }

    /// True once a fetch succeeded.
    #[must_use]
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    /// Failure message of the last fetch, if it failed.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::FetchFailed(message) => Some(message),
            Self::NotFetched | Self::Fetched(_) => None,
        }
    }
}

/// Result of resolving an identifier to a single compound.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Exactly one compound.
    Found(Box<CompoundRecord>),
    /// No compound matches.
    NotFound,
    /// Several compounds match; their identifiers.
    Ambiguous(Vec<String>),
}

impl Resolution {
    /// The record, collapsing `Ambiguous` into `None`.
    #[must_use]
    pub fn into_record(self) -> Option<CompoundRecord> {
        match self {
            Self::Found(record) => Some(*record),
            Self::NotFound | Self::Ambiguous(_) => None,
        }
    }
}

/// How an identifier passed to [`CompoundRecord::resolve`] is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// `InChI=...` string.
    Inchi,
    /// CAS Registry Number (`71-43-2`).
    Cas,
    /// Anything else is taken as a NIST compound identifier.
    NistId,
}

impl IdentifierKind {
    /// Classifies an identifier by shape.
    #[must_use]
    pub fn classify(identifier: &str) -> Self {
        let identifier = identifier.trim();
        if identifier.starts_with("InChI=") {
            Self::Inchi
        } else if CAS_RE.is_match(identifier) {
            Self::Cas
        } else {
            Self::NistId
        }
    }
}

/// A WebBook compound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundRecord {
    /// NIST compound identifier.
    pub id: String,
    /// Primary name.
    pub name: String,
    /// Other names.
    pub synonyms: Vec<String>,
    /// Chemical formula.
    pub formula: Option<String>,
    /// Molecular weight in g/mol.
    pub mol_weight: Option<f64>,
    /// IUPAC Standard InChI.
    pub inchi: Option<String>,
    /// IUPAC Standard InChIKey.
    pub inchi_key: Option<String>,
    /// CAS Registry Number.
    pub cas_rn: Option<String>,
    /// Categorised links from the compound page.
    pub references: CompoundReferences,
    mol_2d: Artifact<Option<String>>,
    mol_3d: Artifact<Option<String>>,
    ir_spectra: Artifact<Vec<Spectrum>>,
    thz_spectra: Artifact<Vec<Spectrum>>,
    ms_spectra: Artifact<Vec<Spectrum>>,
    uv_spectra: Artifact<Vec<Spectrum>>,
    gas_chromatography: Artifact<Vec<Chromatogram>>,
}

impl CompoundRecord {
    /// Builds a record from parsed page fields; artifacts start unfetched.
    #[must_use]
    pub fn from_fields(fields: CompoundFields) -> Self {
        Self {
            id: fields.id,
            name: fields.name,
            synonyms: fields.synonyms,
            formula: fields.formula,
            mol_weight: fields.mol_weight,
            inchi: fields.inchi,
            inchi_key: fields.inchi_key,
            cas_rn: fields.cas_rn,
            references: fields.references,
            mol_2d: Artifact::NotFetched,
            mol_3d: Artifact::NotFetched,
            ir_spectra: Artifact::NotFetched,
            thz_spectra: Artifact::NotFetched,
            ms_spectra: Artifact::NotFetched,
            uv_spectra: Artifact::NotFetched,
            gas_chromatography: Artifact::NotFetched,
        }
    }

    /// Builds a record from an already fetched compound page body.
    ///
    /// # Errors
    ///
    /// Returns [`crate::parser::ParseError`] if the page is not a compound page.
    pub fn from_html(html: &str) -> std::result::Result<Self, crate::parser::ParseError> {
        parse_compound_page(&fix_html(html)).map(Self::from_fields)
    }

    /// Fetches the compound page for a NIST identifier.
    ///
    /// Returns `Ok(None)` when the server does not answer with a single
    /// compound page for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] on transport failure or when the compound page cannot
    /// be parsed.
    #[instrument(skip(client))]
    pub async fn load(client: &WebBookClient, id: &str) -> Result<Option<Self>> {
        let id = id.trim();
        if id.is_empty() {
            return Err(SearchError::EmptyIdentifier.into());
        }
        let url = client.endpoint(SEARCH_PATH)?;
        let page = client.get_ok(&url, [("ID", id), ("Units", "SI")]).await?;
        let html = fix_html(&page.text);
        if !is_compound_page(&html) {
            debug!("response is not a compound page");
            return Ok(None);
        }
        Ok(Some(Self::from_html(&html)?))
    }

    /// Resolves a NIST identifier, CAS Registry Number, or InChI.
    ///
    /// NIST identifiers are fetched directly. CAS numbers and InChI strings go
    /// through a lookup whose response is read like a search response: a
    /// listing with one hit is followed, a listing with several is
    /// [`Resolution::Ambiguous`].
    ///
    /// # Errors
    ///
    /// Returns [`Error`] on transport failure or unrecognised markup.
    #[instrument(skip(client))]
    pub async fn resolve(client: &WebBookClient, identifier: &str) -> Result<Resolution> {
        let identifier = identifier.trim();
        let page = match IdentifierKind::classify(identifier) {
            IdentifierKind::NistId => {
                return Ok(Self::load(client, identifier)
                    .await?
                    .map_or(Resolution::NotFound, |record| Resolution::Found(Box::new(record))));
            }
            IdentifierKind::Cas => {
                let url = client.endpoint(SEARCH_PATH)?;
                client.get_ok(&url, [("ID", identifier), ("Units", "SI")]).await?
            }
            IdentifierKind::Inchi => {
                let url = client.endpoint(&format!("{INCHI_PATH}/{identifier}"))?;
                client.get_ok(&url, Vec::<(String, String)>::new()).await?
            }
        };

        match parse_search_page(&fix_html(&page.text))? {
            SearchPage::NotFound => Ok(Resolution::NotFound),
            SearchPage::Compound(fields) => Ok(Resolution::Found(Box::new(Self::from_fields(*fields)))),
            SearchPage::Listing(listing) => {
                let mut candidates = listing.identifiers;
                if candidates.len() > 1 {
                    info!(candidates = candidates.len(), "identifier is ambiguous");
                    return Ok(Resolution::Ambiguous(candidates));
                }
                match candidates.pop() {
                    None => Ok(Resolution::NotFound),
                    Some(only) => Ok(Self::load(client, &only)
                        .await?
                        .map_or(Resolution::NotFound, |record| Resolution::Found(Box::new(record)))),
                }
            }
        }
    }

    /// 2D coordinate file state.
    #[must_use]
    pub fn mol_2d(&self) -> &Artifact<Option<String>> {
        &self.mol_2d
    }

    /// 3D coordinate file state.
    #[must_use]
    pub fn mol_3d(&self) -> &Artifact<Option<String>> {
        &self.mol_3d
    }

    /// Spectra state for `kind`.
    #[must_use]
    pub fn spectra(&self, kind: SpectrumKind) -> &Artifact<Vec<Spectrum>> {
        match kind {
            SpectrumKind::Ir => &self.ir_spectra,
            SpectrumKind::Thz => &self.thz_spectra,
            SpectrumKind::Mass => &self.ms_spectra,
            SpectrumKind::UvVis => &self.uv_spectra,
        }
    }

    /// Gas chromatography state.
    #[must_use]
    pub fn gas_chromatography(&self) -> &Artifact<Vec<Chromatogram>> {
        &self.gas_chromatography
    }

    /// Link to the WebBook data page for `kind`, if the compound has one.
    #[must_use]
    pub fn data_reference(&self, kind: DataKind) -> Option<&str> {
        self.references
            .webbook_data
            .get(kind.codename())
            .map(String::as_str)
    }

    /// Fetches the 2D MOL file. `Ok(None)` when the compound has none.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] on transport failure; the slot records the failure.
    pub async fn fetch_coordinates_2d(&mut self, client: &WebBookClient) -> Result<Option<&str>> {
        self.fetch_coordinates(client, StructureFile::Mol2D).await
    }

    /// Fetches the 3D MOL file. `Ok(None)` when the compound has none.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] on transport failure; the slot records the failure.
    pub async fn fetch_coordinates_3d(&mut self, client: &WebBookClient) -> Result<Option<&str>> {
        self.fetch_coordinates(client, StructureFile::Mol3D).await
    }

    #[instrument(skip(self, client), fields(id = %self.id))]
    async fn fetch_coordinates(
        &mut self,
        client: &WebBookClient,
        file: StructureFile,
    ) -> Result<Option<&str>> {
        let href = self.references.structure.get(&file).cloned();
        let outcome = match href {
            None => Ok(None),
            Some(href) => fetch_text(client, &href).await.map(Some),
        };
        let slot = match file {
            StructureFile::Mol2D => &mut self.mol_2d,
            StructureFile::Mol3D => &mut self.mol_3d,
        };
        settle(slot, outcome)?;
        Ok(slot.as_fetched().and_then(Option::as_deref))
    }

    /// Fetches every spectrum of `kind`, in index order.
    ///
    /// A compound without a data page for `kind` gets an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] on transport failure or unrecognised spectrum markup;
    /// the slot records the failure.
    #[instrument(skip(self, client), fields(id = %self.id, kind = %kind))]
    pub async fn fetch_spectra(
        &mut self,
        client: &WebBookClient,
        kind: SpectrumKind,
    ) -> Result<&[Spectrum]> {
        let outcome = self.download_spectra(client, kind).await;
        let slot = match kind {
            SpectrumKind::Ir => &mut self.ir_spectra,
            SpectrumKind::Thz => &mut self.thz_spectra,
            SpectrumKind::Mass => &mut self.ms_spectra,
            SpectrumKind::UvVis => &mut self.uv_spectra,
        };
        settle(slot, outcome)?;
        Ok(slot.as_fetched().map(Vec::as_slice).unwrap_or_default())
    }

    async fn download_spectra(
        &self,
        client: &WebBookClient,
        kind: SpectrumKind,
    ) -> Result<Vec<Spectrum>> {
        let Some(href) = self.data_reference(kind.data_kind()) else {
            debug!("no data page for this spectrum kind");
            return Ok(Vec::new());
        };
        let listing = fetch_text(client, href).await?;
        let indexes = parse_spectrum_indexes(&listing)?;
        debug!(count = indexes.len(), "spectrum indexes found");

        let url = client.endpoint(SEARCH_PATH)?;
        let mut spectra = Vec::with_capacity(indexes.len());
        for index in indexes {
            let index_param = index.to_string();
            let page = client
                .get_ok(
                    &url,
                    [
                        ("JCAMP", self.id.as_str()),
                        ("Index", index_param.as_str()),
                        ("Type", kind.jcamp_type()),
                    ],
                )
                .await?;
            spectra.push(Spectrum {
                compound_id: self.id.clone(),
                kind,
                index,
                jdx_text: parse_spectrum_block(&page.text)?,
            });
        }
        Ok(spectra)
    }

    /// Fetches IR, THz, MS and UV spectra in that order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failure; later kinds stay untouched.
    pub async fn fetch_all_spectra(&mut self, client: &WebBookClient) -> Result<()> {
        for kind in SpectrumKind::ALL {
            self.fetch_spectra(client, kind).await?;
        }
        Ok(())
    }

    /// Fetches every gas chromatography table.
    ///
    /// A compound without a `cGC` data page gets an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] on transport failure or malformed tables; the slot
    /// records the failure.
    #[instrument(skip(self, client), fields(id = %self.id))]
    pub async fn fetch_gas_chromatography(
        &mut self,
        client: &WebBookClient,
    ) -> Result<&[Chromatogram]> {
        let outcome = self.download_chromatography(client).await;
        settle(&mut self.gas_chromatography, outcome)?;
        Ok(self
            .gas_chromatography
            .as_fetched()
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    async fn download_chromatography(&self, client: &WebBookClient) -> Result<Vec<Chromatogram>> {
        let Some(href) = self.data_reference(DataKind::GasChromatography) else {
            debug!("no gas chromatography page");
            return Ok(Vec::new());
        };
        let overview = fetch_text(client, href).await?;
        let mut chromatograms = Vec::new();
        for link in large_format_table_links(&overview) {
            let url = client.absolutize(&link)?;
            let page = client.get_ok(&url, Vec::<(String, String)>::new()).await?;
            let sections = parse_chromatography_page(&fix_html(&page.text))?;
            chromatograms.extend(
                sections
                    .into_iter()
                    .map(|section| Chromatogram::from_section(&self.id, url.as_str(), section)),
            );
        }
        debug!(count = chromatograms.len(), "chromatograms parsed");
        Ok(chromatograms)
    }

    /// Writes every fetched spectrum of `kind` into `dir`.
    ///
    /// Nothing is written when the spectra were never fetched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotADirectory`] if `dir` is not a directory, or
    /// [`Error::Write`] for the first file that cannot be written.
    pub fn save_spectra(&self, kind: SpectrumKind, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(Error::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        self.spectra(kind)
            .as_fetched()
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|spectrum| spectrum.save(dir))
            .collect()
    }
}

/// Resolves an identifier, collapsing ambiguous matches into `None`.
///
/// # Errors
///
/// Same as [`CompoundRecord::resolve`].
pub async fn resolve_compound(
    client: &WebBookClient,
    identifier: &str,
) -> Result<Option<CompoundRecord>> {
    Ok(CompoundRecord::resolve(client, identifier).await?.into_record())
}

/// GETs a page-relative link and returns its body.
async fn fetch_text(client: &WebBookClient, href: &str) -> Result<String> {
    let url = client.absolutize(href)?;
    let page = client.get_ok(&url, Vec::<(String, String)>::new()).await?;
    Ok(if page.is_html() { fix_html(&page.text) } else { page.text })
}

/// Stores a fetch outcome in its slot, passing the error through.
fn settle<T>(slot: &mut Artifact<T>, outcome: Result<T>) -> Result<()> {
    match outcome {
        Ok(value) => {
            *slot = Artifact::Fetched(value);
            Ok(())
        }
        Err(error) => {
            warn!(error = %error, "artifact fetch failed");
            *slot = Artifact::FetchFailed(error.to_string());
            Err(error)
        }
    }
}
