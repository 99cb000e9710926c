//! # statementkit - financial statements out of SEC EDGAR 10-K filings
//!
//! statementkit walks a company's EDGAR submission history, selects its
//! recent 10-K filings, locates the rendered report for each primary
//! financial statement (balance sheet, income statement, cash flow), and
//! reconstructs the statement table as it was presented to investors: the
//! cells, the column headers, and the per-row indentation hierarchy.
//!
//! ## Features
//!
//! - **Rate-limited HTTP client** - complies with SEC.gov fair-access rules,
//!   retries transient failures with exponential backoff, caps response sizes
//! - **Filing selection** - walks the submissions index and filters recent
//!   10-K (and optionally 10-K/A) filings
//! - **Report picking** - scores `FilingSummary.xml` reports per statement
//!   kind to find the right `R<k>.htm` page
//! - **Table reconstruction** - selects the dominant table on a page,
//!   stitches page-break continuations, expands row/column spans, merges
//!   multi-row headers, and drops XBRL scaffolding
//! - **Indent recovery** - reads four independent HTML indentation signals,
//!   or infers a stable hierarchy from statement structure when the HTML
//!   carries none
//! - **Artifacts** - per-statement CSV and JSON plus a per-company manifest
//!
//! ## Basic usage
//!
//! ```no_run
//! use statementkit::{ClientConfig, RunOptions, SecClient, StatementPipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // The SEC requires a real user agent with contact information.
//!     let client = SecClient::new(ClientConfig::new("my_app/1.0 (me@example.com)"))?;
//!     let pipeline = StatementPipeline::new(client, RunOptions::new(), "sec_statements_out");
//!
//!     let summary = pipeline.run("320193").await?;
//!     println!("wrote {} filings under {}", summary.processed, summary.out.display());
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod filings;
mod hierarchy;
mod output;
mod picker;
mod pipeline;
mod summary;
mod traits;

pub mod parsing;

pub use config::{
    ClientConfig, DEFAULT_MAX_BYTES, DEFAULT_MIN_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS, RunOptions,
    SecUrls,
};
pub use crate::core::SecClient;
pub use error::{Result, StatementError};
pub use filings::{
    Filing, FilingRecord, Submission, accession_nodash, cik_int, normalize_cik, pick_10ks,
};
pub use hierarchy::{IndentMode, filter_scaffolding, infer_indent_levels, resolve_indent};
pub use output::{
    FilingEntry, Manifest, OutputPaths, PickedReport, ReportInfo, StatementArtifact, safe_join,
};
pub use picker::{StatementKind, pick_report};
pub use pipeline::{RunSummary, StatementPipeline, extract_statement};
pub use summary::{Report, parse_reports};
pub use traits::{FilingOperations, SummaryOperations};

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
