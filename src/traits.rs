//! Trait definitions organizing the EDGAR operations the pipeline consumes.
//!
//! Grouping the client's remote operations behind traits keeps the seams
//! visible and makes alternative implementations (mocks, caches) possible in
//! tests. Users typically call the methods directly on
//! [`SecClient`](crate::SecClient).

use async_trait::async_trait;

use super::error::Result;
use super::filings::{FilingRecord, Submission};

/// Operations against the SEC submissions index.
#[async_trait]
pub trait FilingOperations {
    /// Retrieves the submissions payload for a zero-padded CIK.
    async fn submissions(&self, cik10: &str) -> Result<Submission>;

    /// Walks the full submissions index (recent table plus page files) into a
    /// flat list of filing records.
    async fn gather_filings(&self, cik10: &str) -> Result<Vec<FilingRecord>>;
}

/// Operations against a single filing's archive directory.
#[async_trait]
pub trait SummaryOperations {
    /// Locates and fetches `FilingSummary.xml` under the filing's base URL,
    /// returning the XML body and the URL it was found at.
    async fn fetch_filing_summary(&self, base_dir: &str) -> Result<(String, String)>;
}
