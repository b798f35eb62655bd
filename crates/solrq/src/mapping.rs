//! Mapping of domain types onto document fields.
//!
//! A [`MappingContext`] tells parsers which document field a domain property
//! is stored in, and which collection holds documents of a domain type.
//! Lookups never fail: anything without a mapping passes through unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field and collection mappings for every known domain type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingContext {
    /// Mappings keyed by domain type name.
    #[serde(default)]
    pub entities: BTreeMap<String, EntityMapping>,
}

/// Mapping of one domain type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMapping {
    /// Collection holding documents of this type.
    #[serde(default)]
    pub collection: Option<String>,

    /// Document field name keyed by property name.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl MappingContext {
    /// Create an empty mapping context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the mapping of a domain type.
    #[must_use]
    pub fn with_entity(mut self, domain_type: impl Into<String>, mapping: EntityMapping) -> Self {
        self.entities.insert(domain_type.into(), mapping);
        self
    }

    /// Mapping of `domain_type`, if known.
    #[must_use]
    pub fn entity(&self, domain_type: &str) -> Option<&EntityMapping> {
        self.entities.get(domain_type)
    }

    /// Document field for `property` of `domain_type`.
    ///
    /// Falls back to `property` itself when the type or the property is unmapped.
    #[must_use]
    pub fn resolve_field<'a>(&'a self, domain_type: Option<&str>, property: &'a str) -> &'a str {
        domain_type
            .and_then(|name| self.entity(name))
            .and_then(|entity| entity.fields.get(property))
            .map_or(property, String::as_str)
    }

    /// Collection of `domain_type`, if mapped.
    #[must_use]
    pub fn collection_for(&self, domain_type: Option<&str>) -> Option<&str> {
        domain_type
            .and_then(|name| self.entity(name))
            .and_then(|entity| entity.collection.as_deref())
    }
}

impl EntityMapping {
    /// Create a mapping for the given collection.
    #[must_use]
    pub fn in_collection(collection: impl Into<String>) -> Self {
        Self {
            collection: Some(collection.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Map `property` onto `document_field`.
    #[must_use]
    pub fn with_field(
        mut self,
        property: impl Into<String>,
        document_field: impl Into<String>,
    ) -> Self {
        self.fields.insert(property.into(), document_field.into());
        self
    }
}
