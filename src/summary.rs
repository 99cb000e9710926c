//! `FilingSummary.xml` retrieval and report-manifest parsing.
//!
//! Every rendered EDGAR filing carries a `FilingSummary.xml` listing its
//! reports and their HTML filenames (`R<k>.htm`). The file name's case varies
//! across filer agents, so the loader tries the canonical name, the lowercase
//! variant, and finally scans the filing directory's `index.json` for a
//! case-insensitive match.

use async_trait::async_trait;
use serde::Deserialize;

use super::core::SecClient;
use super::error::{Result, StatementError};
use super::traits::SummaryOperations;

/// A report within a filing, as described by `FilingSummary.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub short_name: String,
    pub long_name: String,
    /// HTML filename, reduced to its basename (conventionally `R<k>.htm`).
    pub html_file: String,
    pub report_type: String,
}

#[derive(Debug, Deserialize)]
struct FilingSummaryDoc {
    #[serde(rename = "MyReports")]
    my_reports: Option<MyReports>,
}

#[derive(Debug, Default, Deserialize)]
struct MyReports {
    #[serde(rename = "Report", default)]
    report: Vec<ReportXml>,
}

#[derive(Debug, Deserialize)]
struct ReportXml {
    #[serde(rename = "ShortName")]
    short_name: Option<String>,
    #[serde(rename = "LongName")]
    long_name: Option<String>,
    #[serde(rename = "HtmlFileName")]
    html_file_name: Option<String>,
    #[serde(rename = "ReportType")]
    report_type: Option<String>,
}

/// Directory listing wrapper for EDGAR `index.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryResponse {
    pub directory: Directory,
}

/// Filing directory payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub item: Vec<DirectoryItem>,
}

/// A file entry inside a filing directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryItem {
    pub name: String,
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Parses the report list out of a `FilingSummary.xml` body.
///
/// Reports without an HTML filename (XML-only renderings) are skipped.
pub fn parse_reports(filing_summary_xml: &str) -> Result<Vec<Report>> {
    let doc: FilingSummaryDoc = quick_xml::de::from_str(filing_summary_xml)?;
    let reports = doc
        .my_reports
        .unwrap_or_default()
        .report
        .into_iter()
        .filter_map(|r| {
            let html = r.html_file_name?;
            let html = html.trim();
            if html.is_empty() {
                return None;
            }
            Some(Report {
                short_name: r.short_name.unwrap_or_default().trim().to_string(),
                long_name: r.long_name.unwrap_or_default().trim().to_string(),
                html_file: basename(html).to_string(),
                report_type: r.report_type.unwrap_or_default().trim().to_string(),
            })
        })
        .collect();
    Ok(reports)
}

#[async_trait]
impl SummaryOperations for SecClient {
    /// Locates and fetches `FilingSummary.xml` for a filing.
    ///
    /// Tries the canonical and lowercase names at `base_dir`, accepting the
    /// first 200 whose body contains `<FilingSummary`. Falls back to the
    /// directory `index.json`, scanning items case-insensitively. Returns the
    /// XML body and the URL it was fetched from.
    ///
    /// # Errors
    ///
    /// `StatementError::NotFound` when every path is exhausted.
    async fn fetch_filing_summary(&self, base_dir: &str) -> Result<(String, String)> {
        for name in ["FilingSummary.xml", "filingsummary.xml"] {
            let url = format!("{base_dir}/{name}");
            let (code, body) = self.get_text(&url).await?;
            if code == 200 && body.contains("<FilingSummary") {
                return Ok((body, url));
            }
        }

        let index_url = format!("{base_dir}/index.json");
        let (code, bytes) = self.get_bytes(&index_url).await?;
        if code != 200 {
            tracing::warn!("index.json unavailable under {}", base_dir);
            return Err(StatementError::NotFound);
        }
        let idx: DirectoryResponse = serde_json::from_slice(&bytes)?;

        let candidate = idx
            .directory
            .item
            .iter()
            .find(|it| it.name.eq_ignore_ascii_case("filingsummary.xml"))
            .map(|it| it.name.clone())
            .ok_or(StatementError::NotFound)?;

        let url = format!("{base_dir}/{candidate}");
        let (code, body) = self.get_text(&url).await?;
        if code != 200 {
            return Err(StatementError::NotFound);
        }
        Ok((body, url))
    }
}
