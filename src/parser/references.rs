//! Reference classification for compound-page links.
//!
//! Which bucket a link lands in depends on the page section it appeared in.
//! [`classify_reference`] makes that an explicit, pure mapping.

use serde::{Deserialize, Serialize};

use super::dom::query_value;

/// Page section a link was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceSection {
    /// The compound summary list directly below the title.
    InfoList,
    /// The "Other data available" sub-list.
    OtherData,
    /// The "Data at other public NIST sites" sub-list.
    PublicSites,
    /// The list following the "NIST subscription sites" header.
    SubscriptionSites,
}

/// Coordinate-file flavour linked from the summary list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StructureFile {
    /// 2D MOL file (`Str2File`).
    #[serde(rename = "mol2D")]
    Mol2D,
    /// 3D MOL file (`Str3File`).
    #[serde(rename = "mol3D")]
    Mol3D,
}

/// WebBook-hosted data category keyed by the `Mask=` hex bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DataKind {
    /// Gas phase thermochemistry (`cTG`).
    GasThermo,
    /// Condensed phase thermochemistry (`cTC`).
    CondensedThermo,
    /// Phase change data (`cTP`).
    PhaseChange,
    /// Reaction thermochemistry (`cTR`).
    ReactionThermo,
    /// Henry's law data (`cSO`).
    Solubility,
    /// Gas phase ion energetics (`cIE`).
    IonEnergetics,
    /// Ion clustering (`cIC`).
    IonClustering,
    /// IR spectrum (`cIR`).
    Ir,
    /// THz IR spectrum (`cTZ`).
    Thz,
    /// Mass spectrum (`cMS`).
    Mass,
    /// UV/Visible spectrum (`cUV`).
    UvVis,
    /// Electronic / vibrational spectra (`cES`).
    Electronic,
    /// Constants of diatomic molecules (`cDI`).
    Diatomic,
    /// Gas chromatography (`cGC`).
    GasChromatography,
}

impl DataKind {
    /// Every kind, in bitmask order.
    pub const ALL: [Self; 14] = [
        Self::GasThermo,
        Self::CondensedThermo,
        Self::PhaseChange,
        Self::ReactionThermo,
        Self::Solubility,
        Self::IonEnergetics,
        Self::IonClustering,
        Self::Ir,
        Self::Thz,
        Self::Mass,
        Self::UvVis,
        Self::Electronic,
        Self::Diatomic,
        Self::GasChromatography,
    ];

    /// Server codename, also used as search flag and index column name.
    #[must_use]
    pub fn codename(self) -> &'static str {
        match self {
            Self::GasThermo => "cTG",
            Self::CondensedThermo => "cTC",
            Self::PhaseChange => "cTP",
            Self::ReactionThermo => "cTR",
            Self::Solubility => "cSO",
            Self::IonEnergetics => "cIE",
            Self::IonClustering => "cIC",
            Self::Ir => "cIR",
            Self::Thz => "cTZ",
            Self::Mass => "cMS",
            Self::UvVis => "cUV",
            Self::Electronic => "cES",
            Self::Diatomic => "cDI",
            Self::GasChromatography => "cGC",
        }
    }

    /// `Mask=` value as printed in data-page links.
    #[must_use]
    pub fn mask(self) -> &'static str {
        match self {
            Self::GasThermo => "1",
            Self::CondensedThermo => "2",
            Self::PhaseChange => "4",
            Self::ReactionThermo => "8",
            Self::Solubility => "10",
            Self::IonEnergetics => "20",
            Self::IonClustering => "40",
            Self::Ir => "80",
            Self::Thz => "100",
            Self::Mass => "200",
            Self::UvVis => "400",
            Self::Electronic => "800",
            Self::Diatomic => "1000",
            Self::GasChromatography => "2000",
        }
    }

    /// Human-readable description used by the search-flag catalogue.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::GasThermo => "Gas phase thermochemistry data",
            Self::CondensedThermo => "Condensed phase thermochemistry data",
            Self::PhaseChange => "Phase change data",
            Self::ReactionThermo => "Reaction thermochemistry data",
            Self::Solubility => "Henry's law data",
            Self::IonEnergetics => "Gas phase ion energetics data",
            Self::IonClustering => "Ion clustering data",
            Self::Ir => "IR spectrum",
            Self::Thz => "THz IR spectrum",
            Self::Mass => "Mass spectrum (electron ionization)",
            Self::UvVis => "UV/Visible spectrum",
            Self::Electronic => "Vibrational and electronic energy levels",
            Self::Diatomic => "Constants of diatomic molecules",
            Self::GasChromatography => "Gas chromatography",
        }
    }

    /// Looks a kind up by its `Mask=` value (case-insensitive hex).
    #[must_use]
    pub fn from_mask(mask: &str) -> Option<Self> {
        let mask = mask.trim().trim_start_matches('0');
        Self::ALL
            .into_iter()
            .find(|kind| kind.mask().eq_ignore_ascii_case(mask))
    }

    /// Looks a kind up by its codename (`cIR`, `cMS`, ...).
    #[must_use]
    pub fn from_codename(codename: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.codename() == codename)
    }
}

/// Category a compound-page link belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceCategory {
    /// Coordinate file download.
    Structure(StructureFile),
    /// Data page hosted on the WebBook, keyed by codename or link text.
    WebBookData {
        /// `cIR`, `cMS`, ... or the link text when the mask is unknown.
        key: String,
    },
    /// Data hosted on another public NIST site.
    PublicExternal {
        /// Link text.
        key: String,
    },
    /// Data hosted on a subscription NIST site.
    Subscription {
        /// Link text.
        key: String,
    },
}

/// Classifies a link by the section it appeared in, its text, and its target.
///
/// Returns `None` for links that carry no reference (e.g. the units switch in
/// the summary list, or a data link without text).
#[must_use]
pub fn classify_reference(
    section: ReferenceSection,
    link_text: &str,
    href: &str,
) -> Option<ReferenceCategory> {
    let text = link_text.trim();
    match section {
        ReferenceSection::InfoList => {
            if href.contains("Str2File") {
                Some(ReferenceCategory::Structure(StructureFile::Mol2D))
            } else if href.contains("Str3File") {
                Some(ReferenceCategory::Structure(StructureFile::Mol3D))
            } else {
                None
            }
        }
        ReferenceSection::OtherData => {
            let known = query_value(href, "Mask")
                .as_deref()
                .and_then(DataKind::from_mask)
                .map(|kind| kind.codename().to_string());
            known
                .or_else(|| (!text.is_empty()).then(|| text.to_string()))
                .map(|key| ReferenceCategory::WebBookData { key })
        }
        ReferenceSection::PublicSites => (!text.is_empty())
            .then(|| ReferenceCategory::PublicExternal { key: text.to_string() }),
        ReferenceSection::SubscriptionSites => (!text.is_empty())
            .then(|| ReferenceCategory::Subscription { key: text.to_string() }),
    }
}
