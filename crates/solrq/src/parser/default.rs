//! Parser for search and custom queries.

use super::{QueryParser, apply_collection, resolve_field};
use crate::error::{Error, Result};
use crate::mapping::MappingContext;
use crate::query::{Criteria, DataQuery, FacetOptions, HighlightOptions, SearchQuery};
use crate::request::{self, SolrRequest};
use std::sync::Arc;

/// Query string matching every document.
pub const MATCH_ALL: &str = "*:*";

/// Translates search queries, with their facet and highlight options, and
/// passes custom query parameters through.
#[derive(Debug, Clone, Default)]
pub struct DefaultQueryParser {
    mapping_context: Option<Arc<MappingContext>>,
}

impl DefaultQueryParser {
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

    fn field<'a>(&'a self, domain_type: Option<&str>, property: &'a str) -> &'a str {
        resolve_field(self.mapping_context.as_deref(), domain_type, property)
    }

    fn render(&self, criteria: &Criteria, domain_type: Option<&str>) -> String {
        criteria.render(self.field(domain_type, &criteria.field))
    }

    fn construct_search(
        &self,
        query: &SearchQuery,
        domain_type: Option<&str>,
        request: &mut SolrRequest,
    ) {
        let q = if query.criteria.is_empty() {
            MATCH_ALL.to_string()
        } else {
            query
                .criteria
                .iter()
                .map(|criteria| self.render(criteria, domain_type))
                .collect::<Vec<_>>()
                .join(" AND ")
        };
        request.set(request::Q, q);

        for filter in &query.filters {
            request.add(request::FQ, self.render(filter, domain_type));
        }

        if !query.projection.is_empty() {
            request.set(request::FL, self.join_fields(&query.projection, domain_type));
        }

        if !query.sort.is_empty() {
            let sort = query
                .sort
                .iter()
                .map(|sort| {
                    format!(
                        "{} {}",
                        self.field(domain_type, &sort.field),
                        sort.direction.as_str()
                    )
                })
                .collect::<Vec<_>>()
                .join(",");
            request.set(request::SORT, sort);
        }

        if let Some(offset) = query.offset {
            request.set(request::START, offset.to_string());
        }
        if let Some(rows) = query.rows {
            request.set(request::ROWS, rows.to_string());
        }

        if let Some(facet) = &query.facet {
            self.apply_facet(facet, domain_type, request);
        }
        if let Some(highlight) = &query.highlight {
            self.apply_highlight(highlight, domain_type, request);
        }
    }

    fn apply_facet(
        &self,
        facet: &FacetOptions,
        domain_type: Option<&str>,
        request: &mut SolrRequest,
    ) {
        request.set(request::FACET, "true");
        for field in &facet.fields {
            request.add(request::FACET_FIELD, self.field(domain_type, field));
        }
        if let Some(min_count) = facet.min_count {
            request.set(request::FACET_MINCOUNT, min_count.to_string());
        }
        if let Some(limit) = facet.limit {
            request.set(request::FACET_LIMIT, limit.to_string());
        }
        if let Some(prefix) = &facet.prefix {
            request.set(request::FACET_PREFIX, prefix.as_str());
        }
    }

    fn apply_highlight(
        &self,
        highlight: &HighlightOptions,
        domain_type: Option<&str>,
        request: &mut SolrRequest,
    ) {
        request.set(request::HL, "true");
        if !highlight.fields.is_empty() {
            request.set(request::HL_FL, self.join_fields(&highlight.fields, domain_type));
        }
        if let Some(pre) = &highlight.pre {
            request.set(request::HL_SIMPLE_PRE, pre.as_str());
        }
        if let Some(post) = &highlight.post {
            request.set(request::HL_SIMPLE_POST, post.as_str());
        }
        if let Some(fragment_size) = highlight.fragment_size {
            request.set(request::HL_FRAGSIZE, fragment_size.to_string());
        }
        if let Some(snippets) = highlight.snippets {
            request.set(request::HL_SNIPPETS, snippets.to_string());
        }
    }

    fn join_fields(&self, properties: &[String], domain_type: Option<&str>) -> String {
        properties
            .iter()
            .map(|property| self.field(domain_type, property))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl QueryParser for DefaultQueryParser {
    fn name(&self) -> &'static str {
        "default"
    }

    fn construct(
        &self,
        query: &DataQuery,
        domain_type: Option<&str>,
        request: &mut SolrRequest,
    ) -> Result<()> {
        match query {
            DataQuery::Search(search) => self.construct_search(search, domain_type, request),
            DataQuery::Custom(custom) => {
                if !custom.params.iter().any(|(name, _)| name == request::Q) {
                    request.set(request::Q, MATCH_ALL);
                }
                for (name, value) in &custom.params {
                    request.add(name, value.as_str());
                }
            }
            DataQuery::Terms(_) => {
                return Err(Error::UnsupportedQuery {
                    parser: self.name(),
                    kind: query.kind(),
                });
            }
        }
        apply_collection(self.mapping_context.as_ref(), domain_type, request);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::EntityMapping;
    use crate::query::{CustomQuery, Predicate, QueryKind, SortDirection, TermsQuery};

    fn books() -> Arc<MappingContext> {
        Arc::new(MappingContext::new().with_entity(
            "Book",
            EntityMapping::in_collection("books")
                .with_field("title", "title_t")
                .with_field("price", "price_d")
                .with_field("genre", "genre_s"),
        ))
    }

    fn construct(
        parser: &DefaultQueryParser,
        query: impl Into<DataQuery>,
        domain_type: Option<&str>,
    ) -> SolrRequest {
        let mut request = SolrRequest::new();
        parser
            .construct(&query.into(), domain_type, &mut request)
            .unwrap();
        request
    }

    #[test]
    fn test_empty_search_matches_all() {
        let request = construct(&DefaultQueryParser::default(), SearchQuery::new(), None);
        assert_eq!(request.get(request::Q), Some(MATCH_ALL));
        assert_eq!(request.len(), 1);
    }

    #[test]
    fn test_search_without_context_uses_property_names() {
        let query = SearchQuery::new()
            .with_criteria(Criteria::is("title", "rust"))
            .with_criteria(Criteria::new(
                "price",
                Predicate::Between {
                    lower: Some("10".into()),
                    upper: None,
                },
            ))
            .with_filter(Criteria::is("genre", "tech"))
            .with_projection("title")
            .with_projection("price")
            .with_sort("price", SortDirection::Desc)
            .with_sort("title", SortDirection::Asc)
            .with_page(20, 10);

        let request = construct(&DefaultQueryParser::new(None), query, Some("Book"));

        assert_eq!(request.get(request::Q), Some("title:rust AND price:[10 TO *]"));
        assert_eq!(request.get_all(request::FQ), ["genre:tech"]);
        assert_eq!(request.get(request::FL), Some("title,price"));
        assert_eq!(request.get(request::SORT), Some("price desc,title asc"));
        assert_eq!(request.get(request::START), Some("20"));
        assert_eq!(request.get(request::ROWS), Some("10"));
        assert!(!request.contains(request::COLLECTION));
    }

    #[test]
    fn test_search_resolves_fields_through_context() {
        let query = SearchQuery::new()
            .with_criteria(Criteria::is("title", "rust"))
            .with_filter(Criteria::is("genre", "tech"))
            .with_projection("title")
            .with_sort("price", SortDirection::Asc);

        let request = construct(&DefaultQueryParser::new(Some(books())), query, Some("Book"));

        assert_eq!(request.get(request::Q), Some("title_t:rust"));
        assert_eq!(request.get(request::FQ), Some("genre_s:tech"));
        assert_eq!(request.get(request::FL), Some("title_t"));
        assert_eq!(request.get(request::SORT), Some("price_d asc"));
        assert_eq!(request.get(request::COLLECTION), Some("books"));
    }

    #[test]
    fn test_facet_and_highlight_options() {
        let query = SearchQuery::new()
            .with_facet(FacetOptions {
                fields: vec!["genre".into(), "author".into()],
                min_count: Some(1),
                limit: Some(-1),
                prefix: Some("sci".into()),
            })
            .with_highlight(HighlightOptions {
                fields: vec!["title".into()],
                pre: Some("<b>".into()),
                post: Some("</b>".into()),
                fragment_size: Some(80),
                snippets: Some(2),
            });

        let request = construct(&DefaultQueryParser::new(Some(books())), query, Some("Book"));

        assert_eq!(request.get(request::FACET), Some("true"));
        assert_eq!(request.get_all(request::FACET_FIELD), ["genre_s", "author"]);
        assert_eq!(request.get(request::FACET_MINCOUNT), Some("1"));
        assert_eq!(request.get(request::FACET_LIMIT), Some("-1"));
        assert_eq!(request.get(request::FACET_PREFIX), Some("sci"));
        assert_eq!(request.get(request::HL), Some("true"));
        assert_eq!(request.get(request::HL_FL), Some("title_t"));
        assert_eq!(request.get(request::HL_SIMPLE_PRE), Some("<b>"));
        assert_eq!(request.get(request::HL_SIMPLE_POST), Some("</b>"));
        assert_eq!(request.get(request::HL_FRAGSIZE), Some("80"));
        assert_eq!(request.get(request::HL_SNIPPETS), Some("2"));
    }

    #[test]
    fn test_custom_query_params_pass_through() {
        let kind = QueryKind::custom("spatial", QueryKind::Data);
        let query = CustomQuery::new(kind.clone())
            .with_param("fq", "{!geofilt}")
            .with_param("pt", "45.15,-93.85");
        let request = construct(&DefaultQueryParser::default(), query, None);
        assert_eq!(request.get(request::Q), Some(MATCH_ALL));
        assert_eq!(request.get("pt"), Some("45.15,-93.85"));

        let query = CustomQuery::new(kind).with_param("q", "name:x");
        let request = construct(&DefaultQueryParser::default(), query, None);
        assert_eq!(request.get_all(request::Q), ["name:x"]);
    }

    #[test]
    fn test_terms_query_is_unsupported() {
        let mut request = SolrRequest::new();
        let err = DefaultQueryParser::default()
            .construct(
                &TermsQuery::for_fields(["title"]).into(),
                None,
                &mut request,
            )
            .unwrap_err();

        assert!(matches!(
            err,
            Error::UnsupportedQuery { parser: "default", kind: QueryKind::Terms }
        ));
        assert!(request.is_empty());
    }
}
