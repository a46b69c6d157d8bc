// src/main.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use rmf_scrape::utils::{self, AppError};
use rmf_scrape::extractors::fund::{self, FundExtractor};
use rmf_scrape::mcp::{self, McpClient, McpClientConfig};
use rmf_scrape::smoke::{self, SuiteKind};
use rmf_scrape::storage;

const DEFAULT_INPUT: &str = "docs/RMF-Fund-Comparison.md";
const DEFAULT_CSV_OUTPUT: &str = "docs/rmf-funds.csv";
const DEFAULT_MD_OUTPUT: &str = "docs/rmf-funds.md";
const DEFAULT_EXPECTED_MIN: usize = 400;
const DEFAULT_DEBUG_DIR: &str = "output/debug";

/// RMF fund table scraper and MCP smoke-test runner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract fund records from the comparison document and write CSV/Markdown reports
    Parse(ParseArgs),
    /// Call the MCP tool endpoint and print the answers for inspection
    Smoke(SmokeArgs),
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// Source document with the HTML fund tables
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// CSV output path
    #[arg(long, default_value = DEFAULT_CSV_OUTPUT)]
    csv_output: PathBuf,

    /// Markdown output path
    #[arg(long, default_value = DEFAULT_MD_OUTPUT)]
    md_output: PathBuf,

    /// Warn when fewer records than this are extracted
    #[arg(long, default_value_t = DEFAULT_EXPECTED_MIN)]
    expected_min: usize,

    /// Debug mode - save an annotated copy of the input and a skip report
    #[arg(short, long)]
    debug: bool,

    /// Where debug output goes
    #[arg(long, default_value = DEFAULT_DEBUG_DIR)]
    debug_dir: PathBuf,
}

impl Default for ParseArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            csv_output: PathBuf::from(DEFAULT_CSV_OUTPUT),
            md_output: PathBuf::from(DEFAULT_MD_OUTPUT),
            expected_min: DEFAULT_EXPECTED_MIN,
            debug: false,
            debug_dir: PathBuf::from(DEFAULT_DEBUG_DIR),
        }
    }
}

#[derive(Args, Debug)]
struct SmokeArgs {
    /// Which question set to run
    #[arg(short, long, value_enum, default_value_t = SuiteKind::Bilingual)]
    suite: SuiteKind,

    /// MCP tools/call endpoint
    #[arg(short, long, env = "RMF_MCP_URL", default_value = mcp::DEFAULT_MCP_URL)]
    url: String,

    /// URL polled before the suite starts (defaults to the endpoint's origin)
    #[arg(long)]
    probe_url: Option<String>,

    /// Per-call timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Readiness attempts before giving up
    #[arg(long, default_value_t = 20)]
    wait_attempts: u32,

    /// Pause between readiness attempts, in milliseconds
    #[arg(long, default_value_t = 1000)]
    wait_interval_ms: u64,

    /// Skip the readiness check
    #[arg(long)]
    no_wait: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let cli = Cli::parse();
    tracing::debug!("Starting with args: {:?}", cli);

    match cli.command.unwrap_or_else(|| Command::Parse(ParseArgs::default())) {
        Command::Parse(args) => run_parse(&args),
        Command::Smoke(args) => run_smoke(&args).await,
    }
}

fn run_parse(args: &ParseArgs) -> Result<(), AppError> {
    tracing::info!("Parsing RMF funds from: {}", args.input.display());
    let document = fund::read_document(&args.input)?;

    let extractor = FundExtractor::new();
    let report = extractor.extract_with_report(&document);
    tracing::info!(
        "Extracted {} funds from {} rows ({} skipped)",
        report.records.len(),
        report.rows_seen(),
        report.skipped.len()
    );
    if report.anchor_fallbacks > 0 {
        tracing::warn!("{} records used cell 0 as their anchor; check them by hand", report.anchor_fallbacks);
    }

    if report.records.len() < args.expected_min {
        tracing::warn!(
            "Expected at least {} funds, but only found {}",
            args.expected_min,
            report.records.len()
        );
    }

    if args.debug {
        match utils::html_debug::write_extraction_debug(&document, &report, &args.debug_dir) {
            Ok((html_path, report_path)) => {
                tracing::info!("Debug output: {} and {}", html_path.display(), report_path.display())
            }
            Err(e) => tracing::warn!("Failed to write debug output: {}", e),
        }
    }

    // Write outputs
    let csv_path = storage::write_csv(&report.records, &args.csv_output)?;
    let md_path = storage::write_markdown(&report.records, &args.md_output)?;

    match (csv_path, md_path) {
        (Some(csv_path), Some(md_path)) => {
            tracing::info!("All files created successfully: {} and {}", csv_path.display(), md_path.display());
        }
        _ => tracing::warn!("No output files were written"),
    }
    Ok(())
}

async fn run_smoke(args: &SmokeArgs) -> Result<(), AppError> {
    if args.wait_attempts == 0 && !args.no_wait {
        return Err(AppError::Config("--wait-attempts must be at least 1 (or pass --no-wait)".to_string()));
    }

    let client = McpClient::new(McpClientConfig {
        endpoint: args.url.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
    })?;

    if !args.no_wait {
        let probe_url = match &args.probe_url {
            Some(url) => url.clone(),
            None => mcp::default_probe_url(&args.url)?,
        };
        tracing::info!("Waiting for server to be ready at {}", probe_url);
        client
            .wait_until_ready(&probe_url, args.wait_attempts, Duration::from_millis(args.wait_interval_ms))
            .await?;
    }

    smoke::run_suite(args.suite, &client).await;
    Ok(())
}
