//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `explain`: Show which parser a query dispatches to and the parameters it produces
//! - `kinds`: List the registry entries in lookup order
//!
//! # Global Flags
//!
//! - `--config`: Mapping configuration file (defaults to `./solrq.yaml` when present)
//! - `--json`: Output in JSON format
//!
//! # Example
//!
//! ```bash
//! solrq --config mapping.yaml explain --query query.json --domain-type Book
//! echo '{"terms": {"fields": ["title"]}}' | solrq explain --query -
//! solrq kinds
//! ```

mod execute;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// solrq - query parser dispatch for Solr-style search requests
#[derive(Parser, Debug)]
#[command(name = "solrq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Mapping configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Explain how a query is translated
    ///
    /// Reads a JSON query, dispatches it through the parser registry and
    /// prints the chosen parser and the resulting request parameters.
    Explain(ExplainArgs),

    /// List registry entries in lookup order
    Kinds,
}

/// Arguments for the `explain` command
#[derive(Args, Debug, Clone)]
pub struct ExplainArgs {
    /// JSON file holding the query, or `-` for stdin
    #[arg(short, long)]
    pub query: PathBuf,

    /// Domain type the query targets, used for field mapping
    #[arg(short, long)]
    pub domain_type: Option<String>,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub fn execute(&self) -> Result<()> {
        let registry = execute::load_registry(self.config.as_deref())?;
        let output = match &self.command {
            Commands::Explain(args) => execute::execute_explain(&registry, args, self.json)?,
            Commands::Kinds => execute::execute_kinds(&registry, self.json)?,
        };
        println!("{output}");
        Ok(())
    }
}
