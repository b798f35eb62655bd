//! Command implementations.

use super::ExplainArgs;
use crate::config::{CONFIG_FILE_NAME, SolrqConfig};
use crate::query::DataQuery;
use crate::registry::ParserRegistry;
use crate::request::SolrRequest;
use anyhow::{Context, Result};
use serde_json::json;
use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

/// Build the registry, taking the mapping context from `config` or from
/// `./solrq.yaml` when that exists.
///
/// # Errors
///
/// Fails if the configuration file cannot be loaded.
pub fn load_registry(config: Option<&Path>) -> Result<ParserRegistry> {
    let path = match config {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = Path::new(CONFIG_FILE_NAME);
            default.is_file().then(|| default.to_path_buf())
        }
    };

    let Some(path) = path else {
        tracing::debug!("No configuration file, using unmapped field names");
        return Ok(ParserRegistry::new(None));
    };

    let config = SolrqConfig::load(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        entities = config.mapping.entities.len(),
        "Loaded mapping configuration"
    );
    Ok(ParserRegistry::new(Some(config.mapping_context())))
}

/// Execute the `explain` command
///
/// # Errors
///
/// Fails if the query cannot be read or parsed, or the parser rejects it.
pub fn execute_explain(
    registry: &ParserRegistry,
    args: &ExplainArgs,
    json: bool,
) -> Result<String> {
    let content = if args.query.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read query from stdin")?;
        content
    } else {
        std::fs::read_to_string(&args.query)
            .with_context(|| format!("Failed to read query from {}", args.query.display()))?
    };
    let query: DataQuery = serde_json::from_str(&content).context("Invalid query JSON")?;

    explain(registry, &query, args.domain_type.as_deref(), json)
}

fn explain(
    registry: &ParserRegistry,
    query: &DataQuery,
    domain_type: Option<&str>,
    json: bool,
) -> Result<String> {
    let kind = query.kind();
    let parser = registry.parser_for(&kind);
    let mut request = SolrRequest::new();
    parser.construct(query, domain_type, &mut request)?;

    if json {
        let value = json!({
            "kind": kind.to_string(),
            "parser": parser.name(),
            "params": request.params(),
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut output = format!("kind: {kind}\nparser: {}", parser.name());
    for (name, value) in request.iter() {
        write!(output, "\n{name}={value}")?;
    }
    Ok(output)
}

/// Execute the `kinds` command
///
/// # Errors
///
/// Fails if the JSON output cannot be serialized.
pub fn execute_kinds(registry: &ParserRegistry, json: bool) -> Result<String> {
    if json {
        let entries: Vec<_> = registry
            .entries()
            .map(|(kind, parser, origin)| {
                json!({
                    "kind": kind.to_string(),
                    "parser": parser.name(),
                    "origin": origin.to_string(),
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&entries)?);
    }

    let lines: Vec<String> = registry
        .entries()
        .enumerate()
        .map(|(i, (kind, parser, origin))| {
            format!("{}. {} -> {} ({})", i + 1, kind, parser.name(), origin)
        })
        .collect();
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{EntityMapping, MappingContext};
    use crate::query::{Criteria, SearchQuery, TermsQuery};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_explain_text() {
        let registry = ParserRegistry::new(Some(Arc::new(MappingContext::new().with_entity(
            "Book",
            EntityMapping::default().with_field("title", "title_t"),
        ))));
        let query =
            DataQuery::from(SearchQuery::new().with_criteria(Criteria::is("title", "rust")));

        let output = explain(&registry, &query, Some("Book"), false).unwrap();
        assert_eq!(output, "kind: query\nparser: default\nq=title_t:rust");
    }

    #[test]
    fn test_explain_json() {
        let registry = ParserRegistry::default();
        let query = DataQuery::from(TermsQuery::for_fields(["title"]));

        let output = explain(&registry, &query, None, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["kind"], "terms");
        assert_eq!(value["parser"], "terms");
        assert_eq!(value["params"][0]["name"], "terms");
    }

    #[test]
    fn test_execute_explain_reads_query_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("query.json");
        std::fs::write(&path, r#"{"search": {"rows": 5}}"#).unwrap();

        let args = ExplainArgs {
            query: path,
            domain_type: None,
        };
        let output = execute_explain(&ParserRegistry::default(), &args, false).unwrap();
        assert_eq!(output, "kind: query\nparser: default\nq=*:*\nrows=5");
    }

    #[test]
    fn test_execute_explain_rejects_bad_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("query.json");
        std::fs::write(&path, "{not json").unwrap();

        let args = ExplainArgs {
            query: path,
            domain_type: None,
        };
        let err = execute_explain(&ParserRegistry::default(), &args, false).unwrap_err();
        assert!(err.to_string().contains("Invalid query JSON"));
    }

    #[test]
    fn test_kinds_text() {
        let output = execute_kinds(&ParserRegistry::default(), false).unwrap();
        assert_eq!(
            output,
            "1. terms -> terms (builtin-terms)\n\
             2. facet -> default (builtin-default)\n\
             3. highlight -> default (builtin-default)\n\
             4. query -> default (builtin-default)"
        );
    }

    #[test]
    fn test_load_registry_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "mapping:\n  entities:\n    Book:\n      collection: books\n",
        )
        .unwrap();

        let registry = load_registry(Some(&path)).unwrap();
        let context = registry.mapping_context().unwrap();
        assert_eq!(context.collection_for(Some("Book")), Some("books"));
    }

    #[test]
    fn test_load_registry_missing_config() {
        let err = load_registry(Some(&PathBuf::from("/nonexistent/solrq.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }
}
