//! Gas chromatography retention-index tables attached to a compound.

use std::fmt;

use serde::Serialize;

use crate::parser::{ChromatogramKind, ChromatographySection, DataTable};

/// One classified retention-index table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chromatogram {
    /// Identifier of the owning compound (context only).
    pub compound_id: String,
    /// Retention-index type, column polarity, temperature regime.
    pub kind: ChromatogramKind,
    /// Table data with typed cells.
    pub table: DataTable,
    /// Page the table was read from.
    pub source_url: String,
}

impl Chromatogram {
    pub(crate) fn from_section(
        compound_id: &str,
        source_url: &str,
        section: ChromatographySection,
    ) -> Self {
        Self {
            compound_id: compound_id.to_string(),
            kind: section.kind,
            table: section.table,
            source_url: source_url.to_string(),
        }
    }
}

impl fmt::Display for Chromatogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chromatogram({}, {}, {} rows)",
            self.compound_id,
            self.kind,
            self.table.row_count()
        )
    }
}
