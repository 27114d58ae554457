//! HTML parsing layer: pure functions from WebBook markup to typed fields.
//!
//! Nothing here touches the network. Each page type has one entry point:
//!
//! - [`parse_compound_page`] - compound detail page
//! - [`parse_search_page`] / [`parse_search_results_page`] - search responses
//! - [`parse_spectrum_indexes`] / [`parse_spectrum_block`] - spectrum pages
//! - [`parse_chromatography_page`] - large-format gas chromatography tables
//!
//! Optional sections that are absent come back empty. Markup that matches no
//! known shape is a [`ParseError`].
//!
//! # Example
//!
//! ```
//! use webbook::parser::{SearchPage, parse_search_page};
//!
//! let page = parse_search_page("<html><body><h1>Name Not Found</h1></body></html>").unwrap();
//! assert_eq!(page, SearchPage::NotFound);
//! ```

mod chromatography;
mod compound;
mod dom;
mod error;
mod references;
mod search;
mod spectrum;

pub use chromatography::{
    CellValue, ChromatogramKind, ChromatographySection, DataColumn, DataTable, classify_section,
    large_format_table_links, parse_chromatography_page,
};
pub use compound::{CompoundFields, CompoundReferences, is_compound_page, parse_compound_page};
pub(crate) use dom::compile_static_regex;
pub use dom::{query_value, require_query_value};
pub use error::ParseError;
pub use references::{
    DataKind, ReferenceCategory, ReferenceSection, StructureFile, classify_reference,
};
pub use search::{
    SearchListing, SearchPage, is_not_found_page, parse_search_page, parse_search_results_page,
};
pub use spectrum::{parse_spectrum_block, parse_spectrum_indexes};
