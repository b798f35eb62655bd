//! solrq - query parser dispatch for Solr-style search clients.
//!
//! The [`ParserRegistry`](registry::ParserRegistry) maps a query's
//! [`QueryKind`](query::QueryKind) to the [`QueryParser`](parser::QueryParser)
//! that turns it into [`SolrRequest`](request::SolrRequest) parameters. Field
//! names are resolved through an optional
//! [`MappingContext`](mapping::MappingContext), which can be swapped at runtime
//! without losing custom parser registrations.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod config;
pub mod error;
pub mod mapping;
pub mod parser;
pub mod query;
pub mod registry;
pub mod request;

// Public CLI module (needed by binary)
pub mod cli;

pub use error::{Error, Result};
