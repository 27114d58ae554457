//! Spectra attached to a compound.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::Error;
use crate::parser::DataKind;

/// Spectrum families the WebBook serves as JCAMP-DX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SpectrumKind {
    /// Infrared.
    #[serde(rename = "IR")]
    Ir,
    /// Terahertz infrared.
    #[serde(rename = "TZ")]
    Thz,
    /// Mass (electron ionization).
    #[serde(rename = "MS")]
    Mass,
    /// UV/Visible.
    #[serde(rename = "UV")]
    UvVis,
}

impl SpectrumKind {
    /// Fetch order used by `fetch_all_spectra`.
    pub const ALL: [Self; 4] = [Self::Ir, Self::Thz, Self::Mass, Self::UvVis];

    /// Short tag used in file names and on the command line.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Ir => "IR",
            Self::Thz => "TZ",
            Self::Mass => "MS",
            Self::UvVis => "UV",
        }
    }

    /// `Type=` value of the JCAMP download endpoint.
    #[must_use]
    pub fn jcamp_type(self) -> &'static str {
        match self {
            Self::Ir => "IR",
            Self::Thz => "THz",
            Self::Mass => "Mass",
            Self::UvVis => "UVVis",
        }
    }

    /// Data category whose page lists the spectra of this kind.
    #[must_use]
    pub fn data_kind(self) -> DataKind {
        match self {
            Self::Ir => DataKind::Ir,
            Self::Thz => DataKind::Thz,
            Self::Mass => DataKind::Mass,
            Self::UvVis => DataKind::UvVis,
        }
    }

    /// Display name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ir => "IR spectrum",
            Self::Thz => "THz IR spectrum",
            Self::Mass => "Mass spectrum",
            Self::UvVis => "UV-Vis spectrum",
        }
    }
}

impl fmt::Display for SpectrumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SpectrumKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IR" => Ok(Self::Ir),
            "TZ" | "THZ" => Ok(Self::Thz),
            "MS" | "MASS" => Ok(Self::Mass),
            "UV" | "UVVIS" | "UV-VIS" => Ok(Self::UvVis),
            other => Err(format!("unknown spectrum kind '{other}' (expected IR, TZ, MS or UV)")),
        }
    }
}

/// One JCAMP-DX spectrum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spectrum {
    /// Identifier of the owning compound (context only).
    pub compound_id: String,
    /// Spectrum family.
    pub kind: SpectrumKind,
    /// Zero-based index among this compound's spectra of `kind`.
    pub index: u32,
    /// Raw JCAMP-DX text.
    pub jdx_text: String,
}

impl Spectrum {
    /// Default file name: `<ID>_<TYPE>_<INDEX>.jdx`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}_{}_{}.jdx", self.compound_id, self.kind.code(), self.index)
    }

    /// Writes the JCAMP-DX text into `dir` under [`Spectrum::file_name`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the file cannot be written.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, Error> {
        let path = dir.join(self.file_name());
        std::fs::write(&path, &self.jdx_text).map_err(|e| Error::write(&path, e))?;
        debug!(path = %path.display(), "saved spectrum");
        Ok(path)
    }
}

impl fmt::Display for Spectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Spectrum({}, {} #{})", self.compound_id, self.kind.label(), self.index)
    }
}
