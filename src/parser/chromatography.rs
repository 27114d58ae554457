//! Gas chromatography pages.
//!
//! The `cGC` data page links one "large format table" page per retention-index
//! section. Each of those pages has an `h2[id]` header such as
//! `Kovats' RI, non-polar column, isothermal` followed by one or more
//! `table.data` elements laid out row-wise: the `th` of a row names the
//! column, its `td` cells hold the values.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use super::ParseError;
use super::dom::{element_text, normalize_ws, static_selector};

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| static_selector("a[href]"));
static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| static_selector("tr"));
static HEADER_CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| static_selector("th"));
static DATA_CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| static_selector("td"));
static REF_SPAN_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| static_selector(r#"span[id^="ref-"]"#));

const LARGE_TABLE_LINK_TEXT: &str = "view large format table";
const REFERENCE_COLUMN: &str = "Reference";

/// Three-part classification of a retention-index table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChromatogramKind {
    /// Retention index type, e.g. `Kovats' RI`, `Normal alkane RI`.
    pub ri_type: String,
    /// Column polarity, e.g. `non-polar column`.
    pub column_polarity: String,
    /// Temperature regime, e.g. `isothermal`, `ramp`, `custom temperature program`.
    pub temperature_regime: String,
}

impl fmt::Display for ChromatogramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.ri_type, self.column_polarity, self.temperature_regime
        )
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Parsed as a floating point number.
    Number(f64),
    /// Anything else; empty cells are `Text("")`.
    Text(String),
}

impl CellValue {
    /// Types a cell: numeric where parseable, text otherwise.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        if text.is_empty() {
            return Self::Text(String::new());
        }
        match text.parse::<f64>() {
            Ok(number) if number.is_finite() => Self::Number(number),
            _ => Self::Text(text.to_string()),
        }
    }

    /// Numeric value, if any.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Text value, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(t) => Some(t),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

/// Named column of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataColumn {
    /// Header text.
    pub name: String,
    /// Cells, top to bottom.
    pub values: Vec<CellValue>,
}

/// Column-oriented table; every column has the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    columns: Vec<DataColumn>,
}

impl DataTable {
    /// Columns in page order.
    #[must_use]
    pub fn columns(&self) -> &[DataColumn] {
        &self.columns
    }

    /// Column by header text.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&DataColumn> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Column header texts in page order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    /// Number of rows (entries per column).
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |column| column.values.len())
    }

    /// True when no cells were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    fn extend_column(&mut self, name: String, values: Vec<CellValue>) {
        if let Some(column) = self.columns.iter_mut().find(|column| column.name == name) {
            column.values.extend(values);
        } else {
            self.columns.push(DataColumn { name, values });
        }
    }
}

/// A classified table from a large-format chromatography page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromatographySection {
    /// Header text the classification was derived from.
    pub header: String,
    /// Classification.
    pub kind: ChromatogramKind,
    /// Concatenated table data.
    pub table: DataTable,
}

/// Links to the large-format table pages on a `cGC` data page.
#[must_use]
pub fn large_format_table_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&LINK_SELECTOR)
        .filter(|link| element_text(*link).to_lowercase().contains(LARGE_TABLE_LINK_TEXT))
        .filter_map(|link| link.value().attr("href").map(|href| href.trim().to_string()))
        .collect()
}

/// Classifies a section from its header and column headers.
///
/// The header is split on commas into retention-index type, column polarity
/// and temperature regime. Parts the header omits are inferred from the
/// column headers (temperature columns) or left as `unknown`.
#[must_use]
pub fn classify_section(header: &str, column_names: &[&str]) -> ChromatogramKind {
    let parts: Vec<&str> = header
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    let ri_type = parts.first().copied().unwrap_or("unknown").to_string();
    let rest = parts.get(1..).unwrap_or_default();

    let column_polarity = rest
        .iter()
        .find(|part| part.to_lowercase().contains("column") || part.to_lowercase().contains("polar"))
        .map_or_else(|| "unknown".to_string(), |part| (*part).to_string());

    let temperature_regime = rest
        .iter()
        .find(|part| {
            let lower = part.to_lowercase();
            lower.contains("isothermal") || lower.contains("ramp") || lower.contains("program")
        })
        .map_or_else(|| infer_temperature_regime(column_names), |part| (*part).to_string());

    ChromatogramKind {
        ri_type,
        column_polarity,
        temperature_regime,
    }
}

fn infer_temperature_regime(column_names: &[&str]) -> String {
    let has = |needle: &str| {
        column_names
            .iter()
            .any(|name| name.to_lowercase().contains(needle))
    };
    if has("heat rate") || has("tstart") || has("tend") {
        "ramp".to_string()
    } else if has("program") {
        "custom temperature program".to_string()
    } else if has("temperature") {
        "isothermal".to_string()
    } else {
        "unknown".to_string()
    }
}

/// Parses a large-format chromatography page into classified sections.
///
/// Sections without any `table.data` are skipped.
///
/// # Errors
///
/// Returns [`ParseError::MalformedTable`] when a row has no header cell, a
/// reference cell points at an unknown citation, or columns end up with
/// different lengths.
pub fn parse_chromatography_page(html: &str) -> Result<Vec<ChromatographySection>, ParseError> {
    let document = Html::parse_document(html);
    let citations = literature_references(&document);

    let mut sections: Vec<(String, Vec<ElementRef<'_>>)> = Vec::new();
    for node in document.tree.root().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        let value = element.value();
        if value.name() == "h2" && value.attr("id").is_some() {
            sections.push((element_text(element), Vec::new()));
        } else if value.name() == "table" && value.classes().any(|class| class == "data") {
            if let Some((_, tables)) = sections.last_mut() {
                tables.push(element);
            }
        }
    }

    sections
        .into_iter()
        .filter(|(_, tables)| !tables.is_empty())
        .map(|(header, tables)| {
            let table = parse_section_tables(&header, &tables, &citations)?;
            let kind = classify_section(&header, &table.column_names());
            Ok(ChromatographySection {
                header,
                kind,
                table,
            })
        })
        .collect()
}

fn parse_section_tables(
    header: &str,
    tables: &[ElementRef<'_>],
    citations: &HashMap<String, String>,
) -> Result<DataTable, ParseError> {
    let mut table = DataTable::default();
    for element in tables {
        for row in element.select(&ROW_SELECTOR) {
            let name = row
                .select(&HEADER_CELL_SELECTOR)
                .next()
                .map(element_text)
                .ok_or_else(|| ParseError::malformed_table(header, "row without header cell"))?;
            let values = row
                .select(&DATA_CELL_SELECTOR)
                .map(|cell| {
                    if name == REFERENCE_COLUMN {
                        reference_cell(header, cell, citations)
                    } else {
                        Ok(CellValue::parse(&element_text(cell)))
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            table.extend_column(name, values);
        }
    }

    let expected = table.row_count();
    if let Some(column) = table
        .columns()
        .iter()
        .find(|column| column.values.len() != expected)
    {
        return Err(ParseError::malformed_table(
            header,
            format!(
                "column '{}' has {} values, expected {expected}",
                column.name,
                column.values.len()
            ),
        ));
    }
    Ok(table)
}

fn reference_cell(
    header: &str,
    cell: ElementRef<'_>,
    citations: &HashMap<String, String>,
) -> Result<CellValue, ParseError> {
    let Some(link) = cell.select(&LINK_SELECTOR).next() else {
        return Ok(CellValue::Text(element_text(cell)));
    };
    let anchor = link
        .value()
        .attr("href")
        .unwrap_or_default()
        .trim_start_matches('#');
    citations
        .get(anchor)
        .map(|text| CellValue::Text(text.clone()))
        .ok_or_else(|| ParseError::malformed_table(header, format!("unknown reference '{anchor}'")))
}

/// Maps `ref-N` span ids to the citation text of their parent paragraph.
fn literature_references(document: &Html) -> HashMap<String, String> {
    let mut citations = HashMap::new();
    for span in document.select(&REF_SPAN_SELECTOR) {
        let Some(id) = span.value().attr("id") else {
            continue;
        };
        let Some(parent) = span.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        citations.insert(id.to_string(), citation_text(parent));
    }
    citations
}

/// Paragraph text without `span` content and "all data" back-links.
fn citation_text(paragraph: ElementRef<'_>) -> String {
    let parent_id = paragraph.id();
    let mut text = String::new();
    for node in paragraph.descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let inside_span = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != parent_id)
            .any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| element.name() == "span")
            });
        if inside_span || fragment.contains("all data") {
            continue;
        }
        text.push_str(fragment);
    }
    normalize_ws(&text)
        .trim_matches(|c: char| c == ' ' || c == '.' || c == '[' || c == ']')
        .to_string()
}
