//! Company submission history and 10-K selection.
//!
//! The SEC submissions endpoint (`/submissions/CIK##########.json`) represents
//! a company's filing history as *parallel arrays* (`form[i]`, `filingDate[i]`,
//! `accessionNumber[i]`, ...) plus references to additional page files for
//! older history. This module walks the index into a flat list of
//! [`FilingRecord`]s and filters that list down to the recent 10-K filings the
//! pipeline should process.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashSet;

use super::core::SecClient;
use super::error::{Result, StatementError};
use super::traits::FilingOperations;

/// A company's submissions payload.
///
/// Only the filing-history portion is modeled; entity metadata is not needed
/// for statement extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub filings: FilingsData,
}

/// Filing history container: the "recent" table plus older page files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilingsData {
    #[serde(default)]
    pub recent: RecentFilings,

    #[serde(default)]
    pub files: Vec<FilingPage>,
}

/// Reference to an additional submissions page (older filings).
#[derive(Debug, Clone, Deserialize)]
pub struct FilingPage {
    pub name: String,
}

/// Parallel-array filing table, as served both in `filings.recent` and at the
/// top level of additional page files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentFilings {
    #[serde(default)]
    pub form: Vec<String>,

    #[serde(rename = "filingDate", default)]
    pub filing_date: Vec<String>,

    /// May be absent entirely; individual entries may be empty strings.
    #[serde(rename = "reportDate", default)]
    pub report_date: Option<Vec<String>>,

    #[serde(rename = "accessionNumber", default)]
    pub accession_number: Vec<String>,
}

/// One row of the submissions index, still in wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingRecord {
    pub form: String,
    pub filing_date: String,
    pub report_date: Option<String>,
    pub accession_number: String,
}

/// A selected filing with parsed dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filing {
    /// Form type, e.g. `10-K` or `10-K/A`.
    pub form: String,

    /// Date the filing was submitted.
    pub filing_date: NaiveDate,

    /// Fiscal period end, when the index provides one.
    pub report_date: Option<NaiveDate>,

    /// EDGAR accession number (`NNNNNNNNNN-NN-NNNNNN`).
    pub accession: String,
}

/// Normalizes a CIK: strips non-digits and zero-pads to 10 characters.
///
/// # Errors
///
/// Returns `ConfigError` when no digits remain.
pub fn normalize_cik(cik: &str) -> Result<String> {
    let digits: String = cik.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(StatementError::ConfigError(
            "CIK must contain digits".to_string(),
        ));
    }
    Ok(format!("{digits:0>10}"))
}

/// Strips leading zeros from a ten-digit CIK for archive URLs.
pub fn cik_int(cik10: &str) -> String {
    let trimmed = cik10.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Removes the dashes from an accession number.
pub fn accession_nodash(accession: &str) -> String {
    accession.replace('-', "")
}

/// Zips the parallel arrays of one submissions page into rows.
///
/// The arrays are truncated to their minimum common length. A missing
/// `reportDate` array does not suppress rows; the rows just carry `None`.
fn zip_records(recent: &RecentFilings) -> Vec<FilingRecord> {
    let mut n = recent
        .form
        .len()
        .min(recent.filing_date.len())
        .min(recent.accession_number.len());
    if let Some(rdates) = &recent.report_date {
        n = n.min(rdates.len());
    }

    (0..n)
        .map(|i| FilingRecord {
            form: recent.form[i].clone(),
            filing_date: recent.filing_date[i].clone(),
            report_date: recent
                .report_date
                .as_ref()
                .map(|v| v[i].clone())
                .filter(|s| !s.is_empty()),
            accession_number: recent.accession_number[i].clone(),
        })
        .collect()
}

fn parse_ymd(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Filters the flat index down to recent 10-K filings.
///
/// Keeps `10-K` (and `10-K/A` when `include_amends` is set) filed within the
/// lookback window, sorts by filing date descending (stable, so the index
/// order breaks ties), deduplicates by accession number, and truncates to
/// `limit`.
pub fn pick_10ks(
    records: &[FilingRecord],
    years: u32,
    limit: usize,
    include_amends: bool,
) -> Vec<Filing> {
    let cutoff = Utc::now().date_naive()
        - Duration::seconds((f64::from(years) * 365.25 * 86_400.0) as i64);

    let mut filings: Vec<Filing> = records
        .iter()
        .filter_map(|r| {
            let form = r.form.trim();
            let form_ok = form == "10-K" || (include_amends && form == "10-K/A");
            if !form_ok {
                return None;
            }
            let filing_date = parse_ymd(&r.filing_date)?;
            if filing_date < cutoff {
                return None;
            }
            let accession = r.accession_number.trim();
            if accession.is_empty() {
                return None;
            }
            Some(Filing {
                form: form.to_string(),
                filing_date,
                report_date: r.report_date.as_deref().and_then(parse_ymd),
                accession: accession.to_string(),
            })
        })
        .collect();

    filings.sort_by(|a, b| b.filing_date.cmp(&a.filing_date));

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for f in filings {
        if !seen.insert(f.accession.clone()) {
            continue;
        }
        out.push(f);
        if out.len() >= limit {
            break;
        }
    }
    out
}

#[async_trait]
impl FilingOperations for SecClient {
    /// Retrieves the submissions payload for a zero-padded CIK.
    async fn submissions(&self, cik10: &str) -> Result<Submission> {
        let url = format!("{}/CIK{}.json", self.submissions_url(), cik10);
        self.get_json(&url).await
    }

    /// Walks the submissions index (the recent table plus every additional
    /// page file) into a flat list of filing records.
    async fn gather_filings(&self, cik10: &str) -> Result<Vec<FilingRecord>> {
        let base = self.submissions(cik10).await?;
        let mut records = zip_records(&base.filings.recent);

        for page in &base.filings.files {
            if page.name.is_empty() {
                continue;
            }
            let url = format!("{}/{}", self.submissions_url(), page.name);
            let extra: RecentFilings = self.get_json(&url).await?;
            records.extend(zip_records(&extra));
        }

        tracing::info!("Gathered {} filings for CIK {}", records.len(), cik10);
        Ok(records)
    }
}
