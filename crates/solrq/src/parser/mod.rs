//! Parsers translating queries into request parameters.
//!
//! A [`QueryParser`] populates a [`SolrRequest`] from a [`DataQuery`]. Two
//! parsers ship with the crate:
//!
//! - [`DefaultQueryParser`]: search queries (including facet and highlight
//!   options) and custom queries
//! - [`TermsQueryParser`]: terms component queries
//!
//! Both resolve property names through an optional [`MappingContext`].
//! Callers may register their own parsers with the
//! [`ParserRegistry`](crate::registry::ParserRegistry).

mod default;
mod terms;

pub use default::{DefaultQueryParser, MATCH_ALL};
pub use terms::{TERMS_HANDLER, TermsQueryParser};

use crate::error::Result;
use crate::mapping::MappingContext;
use crate::query::DataQuery;
use crate::request::SolrRequest;
use std::fmt;
use std::sync::Arc;

/// Translates a query into request parameters.
///
/// Implementations must be `Send + Sync` so a registry can be shared across
/// threads behind an `Arc`.
pub trait QueryParser: Send + Sync + fmt::Debug {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Populate `request` from `query`.
    ///
    /// `domain_type` names the mapped type the query targets, if any.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedQuery` if the parser cannot translate this
    /// shape of query.
    fn construct(
        &self,
        query: &DataQuery,
        domain_type: Option<&str>,
        request: &mut SolrRequest,
    ) -> Result<()>;
}

/// Resolve `property` through an optional mapping context.
fn resolve_field<'a>(
    context: Option<&'a MappingContext>,
    domain_type: Option<&str>,
    property: &'a str,
) -> &'a str {
    context.map_or(property, |context| context.resolve_field(domain_type, property))
}

/// Set the collection parameter when the domain type is mapped to one.
fn apply_collection(
    context: Option<&Arc<MappingContext>>,
    domain_type: Option<&str>,
    request: &mut SolrRequest,
) {
    if let Some(collection) = context.and_then(|context| context.collection_for(domain_type)) {
        request.set(crate::request::COLLECTION, collection);
    }
}
