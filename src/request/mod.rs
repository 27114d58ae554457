//! Request layer: rate-limited, retrying HTTP GET against the WebBook.
//!
//! - [`RequestConfig`] - immutable delay / attempts / transport options
//! - [`WebBookClient`] - pooled client bound to one host
//! - [`RetryPolicy`] - attempt budget and failure classification
//! - [`fetch_crawl_delay`] - robots.txt `Crawl-delay` lookup

mod client;
mod config;
mod error;
mod retry;
mod robots;

pub use client::{WebBookClient, WebBookResponse, fix_html};
pub use config::{
    ConfigError, DEFAULT_CONNECT_TIMEOUT, DEFAULT_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT,
    RequestConfig, TransportOptions,
};
pub use error::RequestError;
pub use retry::{FailureType, RetryDecision, RetryPolicy, classify_error, classify_http_status};
pub use robots::{fetch_crawl_delay, parse_crawl_delay};

/// Public WebBook host.
pub const BASE_URL: &str = "https://webbook.nist.gov";

/// Search, compound, spectrum, and coordinate-file endpoint.
pub const SEARCH_PATH: &str = "/cgi/cbook.cgi";

/// InChI lookup endpoint; the InChI string is appended as a path segment.
pub const INCHI_PATH: &str = "/cgi/inchi";
