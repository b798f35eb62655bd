//! solrq CLI binary.

use anyhow::Result;
use solrq::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable with --json.
    // Example: RUST_LOG=solrq=debug solrq kinds
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("solrq=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting solrq CLI");

    let cli = Cli::parse_args();
    cli.execute()?;

    tracing::debug!("solrq CLI completed successfully");
    Ok(())
}
