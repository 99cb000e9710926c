//! Command-line surface: CIK in, per-filing statement artifacts out.

use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use statementkit::{ClientConfig, RunOptions, SecClient, StatementPipeline};

/// Rebuild BS/IS/CFS statement tables from a company's recent 10-K filings.
#[derive(Debug, Parser)]
#[command(name = "statementkit", version, about)]
struct Cli {
    /// Company CIK (digits).
    #[arg(long)]
    cik: String,

    /// Lookback window in years.
    #[arg(long, default_value_t = 5)]
    years: u32,

    /// Maximum number of 10-K filings to process.
    #[arg(long, default_value_t = 5)]
    limit: usize,

    /// Output directory.
    #[arg(long, default_value = "sec_statements_out")]
    out: String,

    /// User-Agent with contact info, e.g. "app (email@domain)".
    #[arg(long, env = "SEC_UA")]
    user_agent: String,

    /// Include 10-K/A amendments.
    #[arg(long)]
    include_amends: bool,

    /// Keep XBRL scaffolding rows like [Abstract].
    #[arg(long)]
    keep_abstract: bool,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 40)]
    timeout: u64,

    /// Minimum interval between requests in seconds.
    #[arg(long, default_value_t = 0.25)]
    min_interval: f64,

    /// Maximum accepted response size in bytes.
    #[arg(long, default_value_t = 25 * 1024 * 1024)]
    max_bytes: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::new(cli.user_agent)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_min_interval(Duration::from_secs_f64(cli.min_interval))
        .with_max_bytes(cli.max_bytes);
    let client = SecClient::new(config)?;

    let options = RunOptions::new()
        .with_years(cli.years)
        .with_limit(cli.limit)
        .with_include_amends(cli.include_amends)
        .with_keep_abstract(cli.keep_abstract);

    let pipeline = StatementPipeline::new(client, options, cli.out);
    let summary = pipeline.run(&cli.cik).await?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
