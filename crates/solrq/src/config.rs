//! Configuration loading for solrq.
//!
//! The configuration file is YAML and currently carries the mapping context:
//!
//! ```yaml
//! mapping:
//!   entities:
//!     Book:
//!       collection: books
//!       fields:
//!         title: title_t
//!         price: price_d
//! ```

use crate::error::{Error, Result};
use crate::mapping::MappingContext;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "solrq.yaml";

/// Configuration file structure for solrq
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SolrqConfig {
    /// Domain type to document mapping
    #[serde(default)]
    pub mapping: MappingContext,
}

impl SolrqConfig {
    /// Parse and validate configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the YAML is malformed or fails validation.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if
    /// its content is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if serialization fails and `Error::Io` if the
    /// file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// The mapping context, ready to hand to a registry
    #[must_use]
    pub fn mapping_context(&self) -> Arc<MappingContext> {
        Arc::new(self.mapping.clone())
    }

    /// Reject blank type, property, field and collection names
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first offending entry.
    pub fn validate(&self) -> Result<()> {
        for (domain_type, entity) in &self.mapping.entities {
            if domain_type.trim().is_empty() {
                return Err(Error::Config("Domain type name cannot be empty".to_string()));
            }
            if entity
                .collection
                .as_deref()
                .is_some_and(|collection| collection.trim().is_empty())
            {
                return Err(Error::Config(format!(
                    "Collection of '{}' cannot be empty",
                    domain_type
                )));
            }
            for (property, field) in &entity.fields {
                if property.trim().is_empty() || field.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "Field mapping of '{}' has an empty name: '{}' -> '{}'",
                        domain_type, property, field
                    )));
                }
            }
        }
        Ok(())
    }
}
