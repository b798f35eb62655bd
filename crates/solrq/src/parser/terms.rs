//! Parser for terms component queries.

use super::{QueryParser, apply_collection, resolve_field};
use crate::error::{Error, Result};
use crate::mapping::MappingContext;
use crate::query::DataQuery;
use crate::request::{self, SolrRequest};
use std::sync::Arc;

/// Request handler serving the terms component.
pub const TERMS_HANDLER: &str = "/terms";

/// Translates terms queries.
#[derive(Debug, Clone, Default)]
pub struct TermsQueryParser {
    mapping_context: Option<Arc<MappingContext>>,
}

impl TermsQueryParser {
    /// Create a parser resolving fields through `mapping_context`.
    #[must_use]
    pub fn new(mapping_context: Option<Arc<MappingContext>>) -> Self {
        Self { mapping_context }
    }

    /// The mapping context this parser was built from.
    #[must_use]
    pub fn mapping_context(&self) -> Option<&Arc<MappingContext>> {
        self.mapping_context.as_ref()
    }
}

impl QueryParser for TermsQueryParser {
    fn name(&self) -> &'static str {
        "terms"
    }

    fn construct(
        &self,
        query: &DataQuery,
        domain_type: Option<&str>,
        request: &mut SolrRequest,
    ) -> Result<()> {
        let DataQuery::Terms(terms) = query else {
            return Err(Error::UnsupportedQuery {
                parser: self.name(),
                kind: query.kind(),
            });
        };

        request.set(request::TERMS, "true");
        request.set(request::QT, TERMS_HANDLER);
        for field in &terms.fields {
            request.add(
                request::TERMS_FL,
                resolve_field(self.mapping_context.as_deref(), domain_type, field),
            );
        }
        if let Some(prefix) = &terms.prefix {
            request.set(request::TERMS_PREFIX, prefix.as_str());
        }
        if let Some(min_count) = terms.min_count {
            request.set(request::TERMS_MINCOUNT, min_count.to_string());
        }
        if let Some(limit) = terms.limit {
            request.set(request::TERMS_LIMIT, limit.to_string());
        }
        if let Some(sort) = terms.sort {
            request.set(request::TERMS_SORT, sort.as_str());
        }
        apply_collection(self.mapping_context.as_ref(), domain_type, request);
        Ok(())
    }
}
