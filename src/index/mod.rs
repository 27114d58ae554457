//! Precomputed compound index.
//!
//! A read-only table of every WebBook compound with its identifiers and one
//! availability flag per data category, regenerated out of band and loaded
//! here from CSV. Nothing in this module touches the network.
//!
//! File layout:
//!
//! ```text
//! # version: 2024.1
//! ID,name,synonyms,formula,mol_weight,inchi,inchi_key,cas_rn,cIR,cMS,mol2D
//! C71432,Benzene,Benzol;;Cyclohexatriene,C6H6,78.1118,InChI=1S/...,UHOV...,71-43-2,1,1,1
//! ```
//!
//! Flag columns are recognised by header: data codenames (`cIR`, `cGC`, ...),
//! structure files (`mol2D`, `mol3D`), or a `data_refs` column holding
//! `;;`-separated codenames. Other columns are kept as raw text in
//! [`IndexEntry::extra`].

mod csv;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::parser::{DataKind, StructureFile};
use csv::{Record, parse_records};

/// Separator for multi-valued cells (`synonyms`, `data_refs`).
pub const LIST_SEPARATOR: &str = ";;";

const VERSION_PREFIX: &str = "# version:";

/// Errors loading the index file.
#[derive(Debug, Error)]
pub enum IndexError {
    /// File could not be read.
    #[error("failed to read index {path}: {source}")]
    Io {
        /// Index path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No header row was found.
    #[error("index has no header row")]
    MissingHeader,

    /// A required column is absent from the header.
    #[error("index header is missing required column '{column}'")]
    MissingColumn {
        /// Column name.
        column: &'static str,
    },

    /// A row has a different number of fields than the header.
    #[error("line {line}: expected {expected} fields, found {found}")]
    RowLength {
        /// 1-based line number.
        line: usize,
        /// Header width.
        expected: usize,
        /// Row width.
        found: usize,
    },

    /// A numeric cell did not parse.
    #[error("line {line}: invalid number in '{column}': '{text}'")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Column name.
        column: String,
        /// Offending text.
        text: String,
    },

    /// A flag cell was not a recognised boolean.
    #[error("line {line}: invalid flag in '{column}': '{text}'")]
    InvalidFlag {
        /// 1-based line number.
        line: usize,
        /// Column name.
        column: String,
        /// Offending text.
        text: String,
    },

    /// The same identifier appears twice.
    #[error("line {line}: duplicate identifier '{id}'")]
    DuplicateId {
        /// 1-based line number.
        line: usize,
        /// Repeated identifier.
        id: String,
    },
}

impl IndexError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// One compound in the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    /// WebBook identifier.
    pub id: String,
    /// Primary name (may be empty).
    pub name: String,
    /// Alternative names.
    pub synonyms: Vec<String>,
    /// Chemical formula.
    pub formula: Option<String>,
    /// Molecular weight.
    pub mol_weight: Option<f64>,
    /// Standard InChI.
    pub inchi: Option<String>,
    /// InChIKey.
    pub inchi_key: Option<String>,
    /// CAS registry number.
    pub cas_rn: Option<String>,
    /// Data categories the compound has pages for.
    pub data: BTreeSet<DataKind>,
    /// Structure files the compound offers.
    pub structures: BTreeSet<StructureFile>,
    /// Unrecognised columns, raw.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl IndexEntry {
    /// True if the compound has a page for `kind`.
    #[must_use]
    pub fn has(&self, kind: DataKind) -> bool {
        self.data.contains(&kind)
    }

    /// True if the compound offers the `file` coordinate download.
    #[must_use]
    pub fn has_structure(&self, file: StructureFile) -> bool {
        self.structures.contains(&file)
    }
}

#[derive(Debug, Clone)]
enum Column {
    Id,
    Name,
    Synonyms,
    Formula,
    MolWeight,
    Inchi,
    InchiKey,
    Cas,
    Data(DataKind),
    Structure(StructureFile),
    DataRefs,
    Extra(String),
}

impl Column {
    fn from_header(header: &str) -> Self {
        let header = header.trim();
        if let Some(kind) = DataKind::from_codename(header) {
            return Self::Data(kind);
        }
        match header.to_ascii_lowercase().as_str() {
            "id" => Self::Id,
            "name" => Self::Name,
            "synonyms" => Self::Synonyms,
            "formula" => Self::Formula,
            "mol_weight" => Self::MolWeight,
            "inchi" => Self::Inchi,
            "inchi_key" => Self::InchiKey,
            "cas_rn" => Self::Cas,
            "data_refs" => Self::DataRefs,
            "mol2d" => Self::Structure(StructureFile::Mol2D),
            "mol3d" => Self::Structure(StructureFile::Mol3D),
            "ir" => Self::Data(DataKind::Ir),
            "thz" => Self::Data(DataKind::Thz),
            "ms" => Self::Data(DataKind::Mass),
            "uvvis" => Self::Data(DataKind::UvVis),
            "gc" => Self::Data(DataKind::GasChromatography),
            _ => Self::Extra(header.to_string()),
        }
    }
}

/// The loaded index.
#[derive(Debug, Clone, Default)]
pub struct CompoundIndex {
    version: Option<String>,
    entries: Vec<IndexEntry>,
    by_id: HashMap<String, usize>,
}

impl CompoundIndex {
    /// Reads the index from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Io`] if the file cannot be read, or any format
    /// error from [`CompoundIndex::from_csv`].
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let text = std::fs::read_to_string(path).map_err(|e| IndexError::io(path, e))?;
        let index = Self::from_csv(&text)?;
        info!(
            path = %path.display(),
            entries = index.len(),
            version = index.version().unwrap_or("unversioned"),
            "loaded compound index"
        );
        Ok(index)
    }

    /// Parses index CSV text.
    ///
    /// # Errors
    ///
    /// Returns an [`IndexError`] naming the line of the first malformed row.
    pub fn from_csv(text: &str) -> Result<Self, IndexError> {
        let mut body = text.trim_start_matches('\u{feff}');
        let mut version = None;
        let mut skipped = 0;
        while let Some(line) = body.lines().next() {
            let trimmed = line.trim();
            if !trimmed.starts_with('#') && !trimmed.is_empty() {
                break;
            }
            if let Some(rest) = trimmed.strip_prefix(VERSION_PREFIX) {
                version = Some(rest.trim().to_string()).filter(|v| !v.is_empty());
            }
            // Leading comments are dropped; record lines are offset by `skipped`.
            let rest = &body[line.len()..];
            body = rest
                .strip_prefix("\r\n")
                .or_else(|| rest.strip_prefix('\n'))
                .unwrap_or(rest);
            skipped += 1;
        }

        let mut records = parse_records(body).into_iter();
        let header = records.next().ok_or(IndexError::MissingHeader)?;
        let columns: Vec<Column> = header.fields.iter().map(|h| Column::from_header(h)).collect();
        if !columns.iter().any(|c| matches!(c, Column::Id)) {
            return Err(IndexError::MissingColumn { column: "ID" });
        }

        let mut index = Self {
            version,
            ..Self::default()
        };
        for mut record in records {
            record.line += skipped;
            let entry = parse_entry(&columns, &header.fields, &record)?;
            if index.by_id.contains_key(&entry.id) {
                return Err(IndexError::DuplicateId {
                    line: record.line,
                    id: entry.id,
                });
            }
            index.by_id.insert(entry.id.clone(), index.entries.len());
            index.entries.push(entry);
        }
        debug!(entries = index.entries.len(), "parsed index rows");
        Ok(index)
    }

    /// Version string from the `# version:` line, if any.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// All entries in file order.
    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by WebBook identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// Entry by CAS registry number.
    #[must_use]
    pub fn by_cas(&self, cas: &str) -> Option<&IndexEntry> {
        let cas = cas.trim();
        self.entries
            .iter()
            .find(|e| e.cas_rn.as_deref() == Some(cas))
    }

    /// Entry by InChIKey (case-insensitive).
    #[must_use]
    pub fn by_inchi_key(&self, key: &str) -> Option<&IndexEntry> {
        let key = key.trim();
        self.entries.iter().find(|e| {
            e.inchi_key
                .as_deref()
                .is_some_and(|k| k.eq_ignore_ascii_case(key))
        })
    }

    /// Entries whose formula matches exactly, ignoring whitespace.
    #[must_use]
    pub fn by_formula(&self, formula: &str) -> Vec<&IndexEntry> {
        let wanted = strip_whitespace(formula);
        self.filter(move |e| {
            e.formula
                .as_deref()
                .is_some_and(|f| strip_whitespace(f) == wanted)
        })
        .collect()
    }

    /// Entries matching `predicate`, in file order.
    pub fn filter<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a IndexEntry> + 'a
    where
        P: Fn(&IndexEntry) -> bool + 'a,
    {
        self.entries.iter().filter(move |e| predicate(e))
    }

    /// Entries with a page for `kind`.
    pub fn with_flag(&self, kind: DataKind) -> impl Iterator<Item = &IndexEntry> + '_ {
        self.filter(move |e| e.has(kind))
    }

    /// Entries with a non-empty InChI.
    pub fn with_inchi(&self) -> impl Iterator<Item = &IndexEntry> + '_ {
        self.filter(|e| e.inchi.is_some())
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn split_list(text: &str) -> impl Iterator<Item = &str> {
    text.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "x" => Some(true),
        "" | "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_entry(
    columns: &[Column],
    headers: &[String],
    record: &Record,
) -> Result<IndexEntry, IndexError> {
    if record.fields.len() != columns.len() {
        return Err(IndexError::RowLength {
            line: record.line,
            expected: columns.len(),
            found: record.fields.len(),
        });
    }

    let mut entry = IndexEntry {
        id: String::new(),
        name: String::new(),
        synonyms: Vec::new(),
        formula: None,
        mol_weight: None,
        inchi: None,
        inchi_key: None,
        cas_rn: None,
        data: BTreeSet::new(),
        structures: BTreeSet::new(),
        extra: BTreeMap::new(),
    };
    for ((column, header), cell) in columns.iter().zip(headers).zip(&record.fields) {
        let flag = || {
            parse_flag(cell).ok_or_else(|| IndexError::InvalidFlag {
                line: record.line,
                column: header.clone(),
                text: cell.clone(),
            })
        };
        match column {
            Column::Id => entry.id = cell.trim().to_string(),
            Column::Name => entry.name = cell.trim().to_string(),
            Column::Synonyms => entry.synonyms = split_list(cell).map(str::to_string).collect(),
            Column::Formula => entry.formula = non_empty(cell),
            Column::MolWeight => {
                entry.mol_weight = match non_empty(cell) {
                    None => None,
                    Some(text) if text.eq_ignore_ascii_case("nan") => None,
                    Some(text) => Some(text.parse::<f64>().map_err(|_| {
                        IndexError::InvalidNumber {
                            line: record.line,
                            column: header.clone(),
                            text,
                        }
                    })?),
                };
            }
            Column::Inchi => entry.inchi = non_empty(cell),
            Column::InchiKey => entry.inchi_key = non_empty(cell),
            Column::Cas => entry.cas_rn = non_empty(cell),
            Column::Data(kind) => {
                if flag()? {
                    entry.data.insert(*kind);
                }
            }
            Column::Structure(file) => {
                if flag()? {
                    entry.structures.insert(*file);
                }
            }
            Column::DataRefs => {
                for codename in split_list(cell) {
                    match (DataKind::from_codename(codename), codename) {
                        (Some(kind), _) => {
                            entry.data.insert(kind);
                        }
                        (None, "mol2D") => {
                            entry.structures.insert(StructureFile::Mol2D);
                        }
                        (None, "mol3D") => {
                            entry.structures.insert(StructureFile::Mol3D);
                        }
                        (None, _) => {}
                    }
                }
            }
            Column::Extra(name) => {
                if !cell.is_empty() {
                    entry.extra.insert(name.clone(), cell.clone());
                }
            }
        }
    }

    if entry.id.is_empty() {
        return Err(IndexError::MissingColumn { column: "ID" });
    }
    Ok(entry)
}
