//! NIST Chemistry WebBook client library
//!
//! Searches the WebBook, parses compound pages into typed records, and fetches
//! the secondary artifacts a compound links to (coordinate files, JCAMP-DX
//! spectra, gas chromatography tables).
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`request`] - rate-limited, retrying HTTP GET against the WebBook
//! - [`parser`] - pure HTML parsers for every page type
//! - [`search`] - search types, parameters, and the `search` entry point
//! - [`compound`] - compound records and their lazily fetched artifacts
//! - [`index`] - precomputed compound index loaded from CSV
//! - [`error`] - crate-level error aggregating the module errors
//!
//! # Example
//!
//! ```no_run
//! use webbook::{RequestConfig, SearchParameters, SearchType, WebBookClient, search};
//!
//! # async fn run() -> webbook::Result<()> {
//! let client = WebBookClient::new(RequestConfig::default())?;
//! let result = search(&client, "benzene", SearchType::Name, &SearchParameters::new()).await?;
//! println!("{} hits (truncated: {})", result.len(), result.lost);
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compound;
pub mod error;
pub mod index;
pub mod parser;
pub mod request;
pub mod search;
mod user_agent;

// Re-export commonly used types
pub use compound::{
    Artifact, Chromatogram, CompoundRecord, IdentifierKind, Resolution, Spectrum, SpectrumKind,
    resolve_compound,
};
pub use error::{Error, Result};
pub use index::{CompoundIndex, IndexEntry, IndexError};
pub use parser::{DataKind, ParseError, StructureFile};
pub use request::{
    BASE_URL, RequestConfig, RequestError, TransportOptions, WebBookClient, fetch_crawl_delay,
};
pub use search::{
    SEARCH_RESULT_CAP, SearchError, SearchParameters, SearchResult, SearchType, Units, search,
    union_identifiers,
};
