//! Dispatch of queries to their parsers.
//!
//! [`ParserRegistry`] keeps an ordered list of `kind -> parser` entries. A
//! lookup walks the list in insertion order and returns the parser of the
//! first entry whose kind the queried kind [is-a](QueryKind::is_a). When no
//! entry matches, the default parser is returned, so lookups never fail.
//!
//! # Built-in entries
//!
//! A new registry holds, in this order:
//!
//! | kind        | parser                  |
//! |-------------|-------------------------|
//! | `Terms`     | [`TermsQueryParser`]    |
//! | `Facet`     | [`DefaultQueryParser`]  |
//! | `Highlight` | [`DefaultQueryParser`]  |
//! | `Query`     | [`DefaultQueryParser`]  |
//!
//! # Precedence
//!
//! The first match in insertion order wins, not the most specific one. A
//! custom kind specializing `Query` is therefore answered by the built-in
//! `Query` entry unless that entry is overridden. Register custom kinds that
//! specialize `Data` directly to have them dispatched to a custom parser.
//!
//! # Mapping context updates
//!
//! [`ParserRegistry::update_mapping_context`] rebuilds the default and terms
//! parsers and rebinds every entry still pointing at them. Entries overridden
//! through [`ParserRegistry::register_parser`] keep their parser; custom
//! parsers that depend on the mapping context must be registered again.
//!
//! # Example
//!
//! ```
//! use solrq::query::{QueryKind, SearchQuery};
//! use solrq::registry::ParserRegistry;
//!
//! let registry = ParserRegistry::new(None);
//! let request = registry
//!     .construct_request(&SearchQuery::new().into(), None)
//!     .unwrap();
//! assert_eq!(request.get("q"), Some("*:*"));
//! assert_eq!(registry.parser_for(&QueryKind::Terms).name(), "terms");
//! ```

mod shared;

pub use shared::SharedParserRegistry;

use crate::error::{Error, Result};
use crate::mapping::MappingContext;
use crate::parser::{DefaultQueryParser, QueryParser, TermsQueryParser};
use crate::query::{DataQuery, QueryKind};
use crate::request::SolrRequest;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Where the parser of an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserOrigin {
    /// The registry's shared default parser.
    BuiltinDefault,

    /// The registry's shared terms parser.
    BuiltinTerms,

    /// Any other parser supplied through [`ParserRegistry::register_parser`].
    Custom,
}

impl fmt::Display for ParserOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserOrigin::BuiltinDefault => write!(f, "builtin-default"),
            ParserOrigin::BuiltinTerms => write!(f, "builtin-terms"),
            ParserOrigin::Custom => write!(f, "custom"),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    kind: QueryKind,
    parser: Arc<dyn QueryParser>,
    origin: ParserOrigin,
}

/// Ordered `kind -> parser` dispatch table.
///
/// Mutation takes `&mut self`; wrap the registry in a
/// [`SharedParserRegistry`] to share it between threads.
#[derive(Debug, Clone)]
pub struct ParserRegistry {
    entries: Vec<Entry>,
    default_parser: Arc<dyn QueryParser>,
    terms_parser: Arc<dyn QueryParser>,
    mapping_context: Option<Arc<MappingContext>>,
}

impl ParserRegistry {
    /// Create a registry holding the built-in entries.
    ///
    /// `mapping_context` may be `None`, in which case the built-in parsers use
    /// property names as document field names.
    #[must_use]
    pub fn new(mapping_context: Option<Arc<MappingContext>>) -> Self {
        let (default_parser, terms_parser) = build_parsers(mapping_context.as_ref());

        let builtin = |kind, parser: &Arc<dyn QueryParser>, origin| Entry {
            kind,
            parser: Arc::clone(parser),
            origin,
        };
        let entries = vec![
            builtin(QueryKind::Terms, &terms_parser, ParserOrigin::BuiltinTerms),
            builtin(QueryKind::Facet, &default_parser, ParserOrigin::BuiltinDefault),
            builtin(QueryKind::Highlight, &default_parser, ParserOrigin::BuiltinDefault),
            builtin(QueryKind::Query, &default_parser, ParserOrigin::BuiltinDefault),
        ];

        Self {
            entries,
            default_parser,
            terms_parser,
            mapping_context,
        }
    }

    /// Parser for queries of `kind`.
    ///
    /// Returns the parser of the first entry, in insertion order, whose kind
    /// `kind` is-a. Falls back to the default parser.
    #[must_use]
    pub fn parser_for(&self, kind: &QueryKind) -> &Arc<dyn QueryParser> {
        self.entries
            .iter()
            .find(|entry| kind.is_a(&entry.kind))
            .map_or(&self.default_parser, |entry| &entry.parser)
    }

    /// Parser for `query`, dispatched on its kind.
    #[must_use]
    pub fn parser_for_query(&self, query: &DataQuery) -> &Arc<dyn QueryParser> {
        self.parser_for(&query.kind())
    }

    /// Translate `query` into a new request using its dispatched parser.
    ///
    /// # Errors
    ///
    /// Propagates the parser's error, typically `Error::UnsupportedQuery`.
    pub fn construct_request(
        &self,
        query: &DataQuery,
        domain_type: Option<&str>,
    ) -> Result<SolrRequest> {
        let parser = self.parser_for_query(query);
        trace!(kind = %query.kind(), parser = parser.name(), "Constructing request");

        let mut request = SolrRequest::new();
        parser.construct(query, domain_type, &mut request)?;
        Ok(request)
    }

    /// Bind `kind` to `parser`.
    ///
    /// An existing entry for `kind` is replaced in place and keeps its
    /// position; otherwise the entry is appended. Passing the registry's own
    /// default or terms parser keeps the entry tied to that role, so it is
    /// rebound on mapping context updates. Any other parser is tagged
    /// [`ParserOrigin::Custom`] and survives updates untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `parser` is `None`. The registry
    /// is left unchanged.
    pub fn register_parser(
        &mut self,
        kind: QueryKind,
        parser: Option<Arc<dyn QueryParser>>,
    ) -> Result<()> {
        let Some(parser) = parser else {
            return Err(Error::InvalidArgument("parser must not be null".to_string()));
        };

        let origin = self.origin_of_parser(&parser);
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.kind == kind) {
            if entry.origin != ParserOrigin::Custom && origin == ParserOrigin::Custom {
                warn!(%kind, parser = parser.name(), "Overriding built-in query parser");
            } else {
                debug!(%kind, parser = parser.name(), %origin, "Replacing query parser");
            }
            entry.parser = parser;
            entry.origin = origin;
        } else {
            debug!(%kind, parser = parser.name(), %origin, "Registering query parser");
            self.entries.push(Entry {
                kind,
                parser,
                origin,
            });
        }
        Ok(())
    }

    /// Rebuild the built-in parsers from `mapping_context`.
    ///
    /// Every entry bound to the current default or terms parser is rebound to
    /// the new parser of the same role. Custom entries are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `mapping_context` is `None`. The
    /// registry is left unchanged.
    pub fn update_mapping_context(
        &mut self,
        mapping_context: Option<Arc<MappingContext>>,
    ) -> Result<()> {
        let Some(mapping_context) = mapping_context else {
            return Err(Error::InvalidArgument(
                "mapping context must not be null".to_string(),
            ));
        };

        let (default_parser, terms_parser) = build_parsers(Some(&mapping_context));
        let entries: Vec<Entry> = self
            .entries
            .iter()
            .map(|entry| {
                let parser = match entry.origin {
                    ParserOrigin::BuiltinDefault => Arc::clone(&default_parser),
                    ParserOrigin::BuiltinTerms => Arc::clone(&terms_parser),
                    ParserOrigin::Custom => Arc::clone(&entry.parser),
                };
                Entry {
                    kind: entry.kind.clone(),
                    parser,
                    origin: entry.origin,
                }
            })
            .collect();

        let rebound = entries
            .iter()
            .filter(|entry| entry.origin != ParserOrigin::Custom)
            .count();
        debug!(
            rebound,
            custom = entries.len() - rebound,
            "Updated mapping context of built-in query parsers"
        );

        self.entries = entries;
        self.default_parser = default_parser;
        self.terms_parser = terms_parser;
        self.mapping_context = Some(mapping_context);
        Ok(())
    }

    /// The current default parser, also used as the lookup fallback.
    #[must_use]
    pub fn default_parser(&self) -> &Arc<dyn QueryParser> {
        &self.default_parser
    }

    /// The current terms parser.
    #[must_use]
    pub fn terms_parser(&self) -> &Arc<dyn QueryParser> {
        &self.terms_parser
    }

    /// The mapping context the built-in parsers were last built from.
    #[must_use]
    pub fn mapping_context(&self) -> Option<&Arc<MappingContext>> {
        self.mapping_context.as_ref()
    }

    /// Origin of the entry registered for exactly `kind`.
    #[must_use]
    pub fn origin_of(&self, kind: &QueryKind) -> Option<ParserOrigin> {
        self.entries
            .iter()
            .find(|entry| entry.kind == *kind)
            .map(|entry| entry.origin)
    }

    /// Entries in lookup order.
    pub fn entries(
        &self,
    ) -> impl Iterator<Item = (&QueryKind, &Arc<dyn QueryParser>, ParserOrigin)> {
        self.entries
            .iter()
            .map(|entry| (&entry.kind, &entry.parser, entry.origin))
    }

    /// Registered kinds in lookup order.
    pub fn kinds(&self) -> impl Iterator<Item = &QueryKind> {
        self.entries.iter().map(|entry| &entry.kind)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the built-in entries cannot be removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Origin tag for `parser`: the role it plays if it is one of the shared
    /// built-in instances, `Custom` otherwise.
    fn origin_of_parser(&self, parser: &Arc<dyn QueryParser>) -> ParserOrigin {
        if Arc::ptr_eq(parser, &self.default_parser) {
            ParserOrigin::BuiltinDefault
        } else if Arc::ptr_eq(parser, &self.terms_parser) {
            ParserOrigin::BuiltinTerms
        } else {
            ParserOrigin::Custom
        }
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new(None)
    }
}

fn build_parsers(
    mapping_context: Option<&Arc<MappingContext>>,
) -> (Arc<dyn QueryParser>, Arc<dyn QueryParser>) {
    let default_parser: Arc<dyn QueryParser> =
        Arc::new(DefaultQueryParser::new(mapping_context.cloned()));
    let terms_parser: Arc<dyn QueryParser> =
        Arc::new(TermsQueryParser::new(mapping_context.cloned()));
    (default_parser, terms_parser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NoopParser;

    impl QueryParser for NoopParser {
        fn name(&self) -> &'static str {
            "noop"
        }

        fn construct(&self, _: &DataQuery, _: Option<&str>, _: &mut SolrRequest) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_builtin_entries_in_order() {
        let registry = ParserRegistry::default();

        let kinds: Vec<_> = registry.kinds().cloned().collect();
        assert_eq!(
            kinds,
            vec![
                QueryKind::Terms,
                QueryKind::Facet,
                QueryKind::Highlight,
                QueryKind::Query,
            ]
        );
        assert_eq!(registry.origin_of(&QueryKind::Terms), Some(ParserOrigin::BuiltinTerms));
        assert_eq!(registry.origin_of(&QueryKind::Query), Some(ParserOrigin::BuiltinDefault));
        assert_eq!(registry.origin_of(&QueryKind::Data), None);
        assert!(registry.mapping_context().is_none());
    }

    #[test]
    fn test_builtin_entries_share_parsers() {
        let registry = ParserRegistry::default();
        for (_, parser, origin) in registry.entries() {
            let expected = match origin {
                ParserOrigin::BuiltinDefault => registry.default_parser(),
                ParserOrigin::BuiltinTerms => registry.terms_parser(),
                ParserOrigin::Custom => panic!("no custom entries expected"),
            };
            assert!(Arc::ptr_eq(parser, expected));
        }
    }

    #[test]
    fn test_register_existing_kind_keeps_position() {
        let mut registry = ParserRegistry::default();
        registry
            .register_parser(QueryKind::Facet, Some(Arc::new(NoopParser)))
            .unwrap();

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.kinds().nth(1), Some(&QueryKind::Facet));
        assert_eq!(registry.origin_of(&QueryKind::Facet), Some(ParserOrigin::Custom));
        assert_eq!(registry.parser_for(&QueryKind::Facet).name(), "noop");
        // FacetAndHighlight is-a Facet, which is checked before Highlight.
        assert_eq!(registry.parser_for(&QueryKind::FacetAndHighlight).name(), "noop");
    }

    #[test]
    fn test_register_none_is_rejected() {
        let mut registry = ParserRegistry::default();
        let err = registry
            .register_parser(QueryKind::custom("MyQuery", QueryKind::Data), None)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("parser must not be null"));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_update_with_none_is_rejected() {
        let mut registry = ParserRegistry::default();
        let before = Arc::clone(registry.default_parser());

        let err = registry.update_mapping_context(None).unwrap_err();

        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(Arc::ptr_eq(registry.default_parser(), &before));
        assert!(registry.mapping_context().is_none());
    }
}
