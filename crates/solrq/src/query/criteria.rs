//! Field criteria and their rendering into query-string clauses.

use serde::{Deserialize, Serialize};

/// Characters with special meaning in the standard query parser.
const SPECIAL_CHARS: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\', '/',
];

/// A condition on a single domain property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    /// Domain property name, resolved to a document field by the mapping context.
    pub field: String,

    /// Condition the field must satisfy.
    pub predicate: Predicate,
}

/// Condition applied to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Exact match.
    Is(String),

    /// Value occurs anywhere in the field.
    Contains(String),

    /// Field starts with the value.
    StartsWith(String),

    /// Field ends with the value.
    EndsWith(String),

    /// Inclusive range; an open bound is rendered as `*`.
    Between {
        /// Lower bound.
        lower: Option<String>,
        /// Upper bound.
        upper: Option<String>,
    },

    /// Raw expression, rendered verbatim after the field name.
    Expression(String),
}

impl Criteria {
    /// Create a criteria on `field`.
    #[must_use]
    pub fn new(field: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            field: field.into(),
            predicate,
        }
    }

    /// Shorthand for an exact match.
    #[must_use]
    pub fn is(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Predicate::Is(value.into()))
    }

    /// Render as `field:clause` using an already-resolved document field name.
    #[must_use]
    pub fn render(&self, document_field: &str) -> String {
        format!("{}:{}", document_field, self.predicate.render())
    }
}

impl Predicate {
    fn render(&self) -> String {
        match self {
            Predicate::Is(value) => escape_value(value),
            Predicate::Contains(value) => format!("*{}*", escape_term(value)),
            Predicate::StartsWith(value) => format!("{}*", escape_term(value)),
            Predicate::EndsWith(value) => format!("*{}", escape_term(value)),
            Predicate::Between { lower, upper } => format!(
                "[{} TO {}]",
                lower.as_deref().map_or_else(|| "*".to_string(), escape_value),
                upper.as_deref().map_or_else(|| "*".to_string(), escape_value),
            ),
            Predicate::Expression(raw) => raw.clone(),
        }
    }
}

/// Escape a value, quoting it when it contains whitespace.
fn escape_value(value: &str) -> String {
    if value.chars().any(char::is_whitespace) {
        let inner = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{inner}\"")
    } else {
        escape_term(value)
    }
}

/// Backslash-escape every special character and whitespace.
fn escape_term(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if SPECIAL_CHARS.contains(&c) || c.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
