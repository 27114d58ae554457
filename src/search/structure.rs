//! MOL block validation for structure searches.
//!
//! Only the shape of the connection table is checked (header, counts line,
//! atom and bond blocks, `M  END`). Chemistry is left to the server.

use super::SearchError;

/// Connection table format of a MOL block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MolVersion {
    /// Fixed-column V2000 table.
    V2000,
    /// Extended V3000 table.
    V3000,
}

/// Facts read from a validated MOL block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MolBlockSummary {
    /// Table format.
    pub version: MolVersion,
    /// Declared atom count (0 for V3000, whose counts live in the CTAB).
    pub atoms: usize,
    /// Declared bond count (0 for V3000).
    pub bonds: usize,
}

const HEADER_LINES: usize = 3;

/// Checks that `block` is a well-formed MOL connection table.
///
/// # Errors
///
/// Returns [`SearchError::InvalidStructure`] describing the first problem found.
pub fn validate_mol_block(block: &str) -> Result<MolBlockSummary, SearchError> {
    let lines: Vec<&str> = block.lines().collect();
    if lines.len() < HEADER_LINES + 1 {
        return Err(SearchError::invalid_structure(format!(
            "expected at least 4 lines, found {}",
            lines.len()
        )));
    }

    let counts = lines[HEADER_LINES];
    if counts.contains("V3000") {
        return validate_v3000(&lines[HEADER_LINES + 1..]);
    }

    let (atoms, bonds) = parse_counts(counts)?;
    let atom_start = HEADER_LINES + 1;
    let bond_start = atom_start
        .checked_add(atoms)
        .ok_or_else(|| SearchError::invalid_structure("declared atom count too large"))?;
    let bond_end = bond_start
        .checked_add(bonds)
        .ok_or_else(|| SearchError::invalid_structure("declared bond count too large"))?;
    let atom_lines = lines
        .get(atom_start..bond_start)
        .ok_or_else(|| SearchError::invalid_structure(format!("declared {atoms} atoms but the atom block is short")))?;
    for (i, line) in atom_lines.iter().enumerate() {
        if line.split_whitespace().count() < 4 {
            return Err(SearchError::invalid_structure(format!(
                "atom line {} needs coordinates and a symbol",
                i + 1
            )));
        }
    }

    let bond_lines = lines
        .get(bond_start..bond_end)
        .ok_or_else(|| SearchError::invalid_structure(format!("declared {bonds} bonds but the bond block is short")))?;
    for (i, line) in bond_lines.iter().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let valid = fields.len() >= 3
            && fields[..3]
                .iter()
                .all(|field| field.parse::<usize>().is_ok_and(|n| n > 0));
        if !valid {
            return Err(SearchError::invalid_structure(format!(
                "bond line {} needs two atom numbers and a bond type",
                i + 1
            )));
        }
    }

    if !lines[bond_end..].iter().any(|line| is_end_line(line)) {
        return Err(SearchError::invalid_structure("missing 'M  END' line"));
    }

    Ok(MolBlockSummary {
        version: MolVersion::V2000,
        atoms,
        bonds,
    })
}

fn validate_v3000(body: &[&str]) -> Result<MolBlockSummary, SearchError> {
    if !body.iter().any(|line| line.trim_end() == "M  V30 BEGIN CTAB") {
        return Err(SearchError::invalid_structure("V3000 block without 'M  V30 BEGIN CTAB'"));
    }
    if !body.iter().any(|line| is_end_line(line)) {
        return Err(SearchError::invalid_structure("missing 'M  END' line"));
    }
    Ok(MolBlockSummary {
        version: MolVersion::V3000,
        atoms: 0,
        bonds: 0,
    })
}

/// Atom and bond counts from a V2000 counts line.
///
/// The fields are fixed 3-column wide; files that drifted from fixed columns
/// fall back to whitespace splitting.
fn parse_counts(line: &str) -> Result<(usize, usize), SearchError> {
    let fixed = line
        .get(0..3)
        .zip(line.get(3..6))
        .and_then(|(a, b)| Some((a.trim().parse().ok()?, b.trim().parse().ok()?)));
    if let Some(counts) = fixed {
        return Ok(counts);
    }
    let mut fields = line.split_whitespace();
    let atoms = fields.next().and_then(|f| f.parse().ok());
    let bonds = fields.next().and_then(|f| f.parse().ok());
    atoms
        .zip(bonds)
        .ok_or_else(|| SearchError::invalid_structure(format!("bad counts line '{}'", line.trim())))
}

fn is_end_line(line: &str) -> bool {
    line.trim_end() == "M  END"
}
