//! Error types for WebBook page parsing.
//!
//! A [`ParseError`] means the markup did not match any shape the parsers know.
//! It is the signal that the WebBook layout drifted; re-requesting will not fix it.

use thiserror::Error;

/// Errors raised while decoding WebBook pages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A required element was not found.
    #[error("missing {element} on {page} page\n  Suggestion: the WebBook markup may have changed")]
    MissingElement {
        /// Which page kind was being parsed.
        page: &'static str,
        /// What was expected.
        element: String,
    },

    /// A link lacked the query key that carries an identifier.
    #[error("link '{url}' has no '{key}' query parameter")]
    MissingQueryKey {
        /// The offending link.
        url: String,
        /// The expected key.
        key: &'static str,
    },

    /// A numeric field held text that is not a number.
    #[error("invalid number '{text}' for {field}")]
    InvalidNumber {
        /// Field being parsed.
        field: &'static str,
        /// The rejected text.
        text: String,
    },

    /// The page is none of the shapes the caller expected.
    #[error("unrecognized {page} page: {reason}\n  Suggestion: the WebBook markup may have changed")]
    UnrecognizedPage {
        /// Which page kind was expected.
        page: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// A data table could not be decomposed into columns.
    #[error("malformed table in section '{section}': {reason}")]
    MalformedTable {
        /// Section header text.
        section: String,
        /// What was wrong.
        reason: String,
    },
}

impl ParseError {
    /// Creates a `MissingElement` error.
    #[must_use]
    pub fn missing(page: &'static str, element: impl Into<String>) -> Self {
        Self::MissingElement {
            page,
            element: element.into(),
        }
    }

    /// Creates a `MissingQueryKey` error.
    #[must_use]
    pub fn missing_query_key(url: impl Into<String>, key: &'static str) -> Self {
        Self::MissingQueryKey {
            url: url.into(),
            key,
        }
    }

    /// Creates an `InvalidNumber` error.
    #[must_use]
    pub fn invalid_number(field: &'static str, text: impl Into<String>) -> Self {
        Self::InvalidNumber {
            field,
            text: text.into(),
        }
    }

    /// Creates an `UnrecognizedPage` error.
    #[must_use]
    pub fn unrecognized(page: &'static str, reason: impl Into<String>) -> Self {
        Self::UnrecognizedPage {
            page,
            reason: reason.into(),
        }
    }

    /// Creates a `MalformedTable` error.
    #[must_use]
    pub fn malformed_table(section: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTable {
            section: section.into(),
            reason: reason.into(),
        }
    }
}
