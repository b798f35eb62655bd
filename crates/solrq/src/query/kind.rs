//! Query kinds used as dispatch keys.
//!
//! Kinds form a small hierarchy rooted at [`QueryKind::Data`]:
//!
//! ```text
//! Data
//! ├── Query
//! │   ├── Facet ─────────┐
//! │   └── Highlight ─────┴── FacetAndHighlight
//! └── Terms
//! ```
//!
//! Caller-defined kinds hang off any node through [`QueryKind::Custom`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a query variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Root of every query kind.
    Data,

    /// A plain search query.
    Query,

    /// A search query carrying facet options.
    Facet,

    /// A search query carrying highlight options.
    Highlight,

    /// A search query carrying both facet and highlight options.
    FacetAndHighlight,

    /// A terms component query.
    Terms,

    /// A caller-defined kind.
    Custom(CustomKind),
}

/// A caller-defined query kind and the kind it specializes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomKind {
    /// Name of the kind, used for display.
    pub name: String,

    /// The kind this one specializes.
    pub parent: Box<QueryKind>,
}

impl QueryKind {
    /// Create a custom kind specializing `parent`.
    #[must_use]
    pub fn custom(name: impl Into<String>, parent: QueryKind) -> Self {
        QueryKind::Custom(CustomKind {
            name: name.into(),
            parent: Box::new(parent),
        })
    }

    /// Returns `true` if `self` is `ancestor` or a more specific variant of it.
    ///
    /// The relation is reflexive and transitive. Every kind is-a [`QueryKind::Data`].
    #[must_use]
    pub fn is_a(&self, ancestor: &QueryKind) -> bool {
        if self == ancestor {
            return true;
        }
        match self {
            QueryKind::Data => false,
            QueryKind::Query | QueryKind::Terms => *ancestor == QueryKind::Data,
            QueryKind::Facet | QueryKind::Highlight => QueryKind::Query.is_a(ancestor),
            QueryKind::FacetAndHighlight => {
                QueryKind::Facet.is_a(ancestor) || QueryKind::Highlight.is_a(ancestor)
            }
            QueryKind::Custom(custom) => custom.parent.is_a(ancestor),
        }
    }

    /// Returns `true` for the kinds defined by this crate.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        !matches!(self, QueryKind::Custom(_))
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::Data => write!(f, "data"),
            QueryKind::Query => write!(f, "query"),
            QueryKind::Facet => write!(f, "facet"),
            QueryKind::Highlight => write!(f, "highlight"),
            QueryKind::FacetAndHighlight => write!(f, "facet_and_highlight"),
            QueryKind::Terms => write!(f, "terms"),
            QueryKind::Custom(custom) => write!(f, "{}", custom.name),
        }
    }
}
