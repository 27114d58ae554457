//! Crate-level error type.
//!
//! Each layer has its own error enum; [`Error`] wraps them for operations that
//! span layers (loading a compound, fetching its artifacts).

use std::path::PathBuf;

use thiserror::Error;

use crate::index::IndexError;
use crate::parser::ParseError;
use crate::request::{ConfigError, RequestError};
use crate::search::SearchError;

/// Errors from WebBook operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure after the retry budget was spent.
    #[error("request error: {0}")]
    Request(#[from] RequestError),

    /// Markup did not match any known page shape.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Search could not be issued.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Precomputed index could not be loaded.
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Invalid request configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Writing an artifact to disk failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Target for saved artifacts is not a directory.
    #[error("'{path}' is not a directory")]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },
}

impl Error {
    /// Creates a `Write` error.
    #[must_use]
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// True for transport failures, which may clear up on a later attempt.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Request(_) | Self::Search(SearchError::Request(_))
        )
    }
}

/// Convenience alias for crate results.
pub type Result<T, E = Error> = std::result::Result<T, E>;
