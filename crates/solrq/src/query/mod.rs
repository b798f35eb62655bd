//! Query model handed to parsers.
//!
//! A [`DataQuery`] is one of three shapes: a [`SearchQuery`] (optionally
//! carrying facet and highlight options), a [`TermsQuery`], or a
//! [`CustomQuery`] whose kind is chosen by the caller. Every query reports a
//! [`QueryKind`], which the registry uses to pick a parser.

pub mod criteria;
pub mod kind;

pub use criteria::{Criteria, Predicate};
pub use kind::{CustomKind, QueryKind};

use serde::{Deserialize, Serialize};

/// A query of any shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuery {
    /// Search query.
    Search(SearchQuery),

    /// Terms component query.
    Terms(TermsQuery),

    /// Caller-defined query.
    Custom(CustomQuery),
}

impl DataQuery {
    /// The kind this query dispatches as.
    ///
    /// Search queries are classified by the options they carry.
    #[must_use]
    pub fn kind(&self) -> QueryKind {
        match self {
            DataQuery::Search(search) => {
                match (search.facet.is_some(), search.highlight.is_some()) {
                    (true, true) => QueryKind::FacetAndHighlight,
                    (true, false) => QueryKind::Facet,
                    (false, true) => QueryKind::Highlight,
                    (false, false) => QueryKind::Query,
                }
            }
            DataQuery::Terms(_) => QueryKind::Terms,
            DataQuery::Custom(custom) => custom.kind.clone(),
        }
    }
}

impl From<SearchQuery> for DataQuery {
    fn from(query: SearchQuery) -> Self {
        DataQuery::Search(query)
    }
}

impl From<TermsQuery> for DataQuery {
    fn from(query: TermsQuery) -> Self {
        DataQuery::Terms(query)
    }
}

impl From<CustomQuery> for DataQuery {
    fn from(query: CustomQuery) -> Self {
        DataQuery::Custom(query)
    }
}

/// Search query with criteria, filters, projection, sorting and paging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    /// Main criteria, combined with `AND`. Empty matches all documents.
    pub criteria: Vec<Criteria>,

    /// Filter criteria, each rendered as its own filter query.
    pub filters: Vec<Criteria>,

    /// Properties to return. Empty returns the engine default.
    pub projection: Vec<String>,

    /// Sort order, applied left to right.
    pub sort: Vec<SortField>,

    /// Index of the first row to return.
    pub offset: Option<u64>,

    /// Maximum number of rows to return.
    pub rows: Option<u32>,

    /// Facet options.
    pub facet: Option<FacetOptions>,

    /// Highlight options.
    pub highlight: Option<HighlightOptions>,
}

impl SearchQuery {
    /// Create an empty search query matching all documents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a main criteria.
    #[must_use]
    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria.push(criteria);
        self
    }

    /// Add a filter criteria.
    #[must_use]
    pub fn with_filter(mut self, filter: Criteria) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a projected property.
    #[must_use]
    pub fn with_projection(mut self, field: impl Into<String>) -> Self {
        self.projection.push(field.into());
        self
    }

    /// Append a sort field.
    #[must_use]
    pub fn with_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(SortField {
            field: field.into(),
            direction,
        });
        self
    }

    /// Set paging.
    #[must_use]
    pub fn with_page(mut self, offset: u64, rows: u32) -> Self {
        self.offset = Some(offset);
        self.rows = Some(rows);
        self
    }

    /// Attach facet options.
    #[must_use]
    pub fn with_facet(mut self, facet: FacetOptions) -> Self {
        self.facet = Some(facet);
        self
    }

    /// Attach highlight options.
    #[must_use]
    pub fn with_highlight(mut self, highlight: HighlightOptions) -> Self {
        self.highlight = Some(highlight);
        self
    }
}

/// A property to sort on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Domain property name.
    pub field: String,

    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    #[default]
    Asc,

    /// Descending.
    Desc,
}

impl SortDirection {
    /// Parameter value for this direction.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Facet options of a search query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetOptions {
    /// Properties to facet on.
    pub fields: Vec<String>,

    /// Minimum count for a facet value to be returned.
    pub min_count: Option<u32>,

    /// Maximum number of values per facet field.
    pub limit: Option<i32>,

    /// Only return facet values starting with this prefix.
    pub prefix: Option<String>,
}

/// Highlight options of a search query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightOptions {
    /// Properties to highlight. Empty highlights the engine default fields.
    pub fields: Vec<String>,

    /// Markup inserted before a highlighted term.
    pub pre: Option<String>,

    /// Markup inserted after a highlighted term.
    pub post: Option<String>,

    /// Fragment size in characters.
    pub fragment_size: Option<u32>,

    /// Maximum number of snippets per field.
    pub snippets: Option<u32>,
}

/// Terms component query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermsQuery {
    /// Properties to list terms for.
    pub fields: Vec<String>,

    /// Only return terms starting with this prefix.
    pub prefix: Option<String>,

    /// Minimum document frequency.
    pub min_count: Option<u32>,

    /// Maximum number of terms to return.
    pub limit: Option<i32>,

    /// Term ordering.
    pub sort: Option<TermsSort>,
}

impl TermsQuery {
    /// Create a terms query over the given properties.
    #[must_use]
    pub fn for_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Ordering of terms in a terms response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermsSort {
    /// By document frequency, highest first.
    Count,

    /// By index order.
    Index,
}

impl TermsSort {
    /// Parameter value for this ordering.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TermsSort::Count => "count",
            TermsSort::Index => "index",
        }
    }
}

/// Query of a caller-defined kind with raw parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomQuery {
    /// Kind used for dispatch.
    pub kind: QueryKind,

    /// Raw request parameters, in order.
    #[serde(default)]
    pub params: Vec<(String, String)>,
}

impl CustomQuery {
    /// Create a custom query with no parameters.
    #[must_use]
    pub fn new(kind: QueryKind) -> Self {
        Self {
            kind,
            params: Vec::new(),
        }
    }

    /// Append a raw parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain(SearchQuery::new(), QueryKind::Query)]
    #[case::facet(SearchQuery::new().with_facet(FacetOptions::default()), QueryKind::Facet)]
    #[case::highlight(
        SearchQuery::new().with_highlight(HighlightOptions::default()),
        QueryKind::Highlight
    )]
    #[case::both(
        SearchQuery::new()
            .with_facet(FacetOptions::default())
            .with_highlight(HighlightOptions::default()),
        QueryKind::FacetAndHighlight
    )]
    fn test_search_query_kind(#[case] query: SearchQuery, #[case] expected: QueryKind) {
        assert_eq!(DataQuery::from(query).kind(), expected);
    }

    #[test]
    fn test_terms_and_custom_kind() {
        assert_eq!(
            DataQuery::from(TermsQuery::for_fields(["title"])).kind(),
            QueryKind::Terms
        );

        let mine = QueryKind::custom("MyQuery", QueryKind::Data);
        assert_eq!(DataQuery::from(CustomQuery::new(mine.clone())).kind(), mine);
    }

    #[test]
    fn test_deserialize_search_query_with_defaults() {
        let query: DataQuery = serde_json::from_str(
            r#"{
                "search": {
                    "criteria": [{"field": "title", "predicate": {"is": "rust"}}],
                    "sort": [{"field": "price"}],
                    "rows": 10
                }
            }"#,
        )
        .unwrap();

        let DataQuery::Search(search) = query else {
            panic!("expected a search query");
        };
        assert_eq!(search.criteria, vec![Criteria::is("title", "rust")]);
        assert_eq!(search.sort[0].direction, SortDirection::Asc);
        assert_eq!(search.rows, Some(10));
        assert!(search.offset.is_none());
        assert!(search.facet.is_none());
    }
}
