//! Error types for solrq operations.

use std::io;
use thiserror::Error;

use crate::query::QueryKind;

/// The error type for solrq operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was absent or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A parser was handed a query it cannot translate.
    #[error("{parser} cannot translate a {kind} query")]
    UnsupportedQuery {
        /// Name of the parser that rejected the query.
        parser: &'static str,
        /// Kind of the rejected query.
        kind: QueryKind,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized Result type for solrq operations.
pub type Result<T> = std::result::Result<T, Error>;
