//! Request parameters populated by parsers.
//!
//! [`SolrRequest`] is an ordered, multi-valued parameter map. It carries no
//! transport or encoding logic; sending it is the caller's business.

use serde::{Deserialize, Serialize};

/// Main query.
pub const Q: &str = "q";
/// Filter query, one per filter.
pub const FQ: &str = "fq";
/// Projected fields.
pub const FL: &str = "fl";
/// Sort specification.
pub const SORT: &str = "sort";
/// First row offset.
pub const START: &str = "start";
/// Row count.
pub const ROWS: &str = "rows";
/// Target collection.
pub const COLLECTION: &str = "collection";
/// Request handler.
pub const QT: &str = "qt";

/// Facet switch.
pub const FACET: &str = "facet";
/// Facet field, one per field.
pub const FACET_FIELD: &str = "facet.field";
/// Facet minimum count.
pub const FACET_MINCOUNT: &str = "facet.mincount";
/// Facet value limit.
pub const FACET_LIMIT: &str = "facet.limit";
/// Facet value prefix.
pub const FACET_PREFIX: &str = "facet.prefix";

/// Highlight switch.
pub const HL: &str = "hl";
/// Highlighted fields.
pub const HL_FL: &str = "hl.fl";
/// Highlight pre markup.
pub const HL_SIMPLE_PRE: &str = "hl.simple.pre";
/// Highlight post markup.
pub const HL_SIMPLE_POST: &str = "hl.simple.post";
/// Highlight fragment size.
pub const HL_FRAGSIZE: &str = "hl.fragsize";
/// Highlight snippets per field.
pub const HL_SNIPPETS: &str = "hl.snippets";

/// Terms component switch.
pub const TERMS: &str = "terms";
/// Terms field, one per field.
pub const TERMS_FL: &str = "terms.fl";
/// Terms prefix.
pub const TERMS_PREFIX: &str = "terms.prefix";
/// Terms minimum count.
pub const TERMS_MINCOUNT: &str = "terms.mincount";
/// Terms limit.
pub const TERMS_LIMIT: &str = "terms.limit";
/// Terms sort.
pub const TERMS_SORT: &str = "terms.sort";

/// A named parameter and its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,

    /// Values in insertion order. Never empty.
    pub values: Vec<String>,
}

/// Ordered, multi-valued request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolrRequest {
    params: Vec<Param>,
}

impl SolrRequest {
    /// Create an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all values of `name` with `value`.
    ///
    /// A new parameter is appended; an existing one keeps its position.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(index) => self.params[index].values = vec![value],
            None => self.params.push(Param {
                name: name.to_string(),
                values: vec![value],
            }),
        }
    }

    /// Append `value` to the values of `name`.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(index) => self.params[index].values.push(value),
            None => self.params.push(Param {
                name: name.to_string(),
                values: vec![value],
            }),
        }
    }

    /// First value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// All values of `name`, empty if absent.
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        match self.position(name) {
            Some(index) => &self.params[index].values,
            None => &[],
        }
    }

    /// Returns `true` if `name` has at least one value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Remove `name`, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.position(name)
            .map(|index| self.params.remove(index).values)
    }

    /// Number of distinct parameter names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate `(name, value)` pairs in order, one pair per value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().flat_map(|param| {
            param
                .values
                .iter()
                .map(move |value| (param.name.as_str(), value.as_str()))
        })
    }

    /// The parameters in order.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|param| param.name == name)
    }
}
