//! Per-CIK orchestration: submissions → 10-K selection → per-filing statement
//! extraction → artifacts.
//!
//! One run processes a single company. Failures inside a filing (a missing
//! report, an unparseable page, an oversized response) are recorded as error
//! strings on that filing's manifest entry and the run moves on; the run
//! itself only fails when the submissions index is unreachable or the
//! manifest cannot be written. Artifacts within a filing are produced in the
//! fixed order FilingSummary → BS → IS → CFS.

use chrono::{SecondsFormat, Utc};
use scraper::Html;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::config::RunOptions;
use super::core::SecClient;
use super::error::{Result, StatementError};
use super::filings::{Filing, accession_nodash, cik_int, normalize_cik, pick_10ks};
use super::hierarchy::{IndentMode, filter_scaffolding, resolve_indent};
use super::output::{
    FilingEntry, Manifest, OutputPaths, PickedReport, ReportInfo, StatementArtifact, write_csv,
    write_json, write_text,
};
use super::parsing::{TableGrid, select_and_stitch};
use super::picker::{StatementKind, pick_report};
use super::summary::{Report, parse_reports};
use super::traits::{FilingOperations, SummaryOperations};

/// Outcome of a run: where artifacts were written and how many filings were
/// processed (including filings that only produced errors).
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub out: PathBuf,
    pub processed: usize,
}

/// The extraction pipeline for one output root.
#[derive(Debug, Clone)]
pub struct StatementPipeline {
    client: SecClient,
    options: RunOptions,
    out_root: PathBuf,
}

/// Parses one report page into a filtered grid with resolved indent levels.
///
/// Returns `None` when no usable table exists on the page. A grid that ends
/// up empty after scaffolding removal is still a valid (empty) statement.
pub fn extract_statement(
    html: &str,
    kind: StatementKind,
    keep_abstract: bool,
) -> Option<(TableGrid, Vec<u32>, IndentMode)> {
    let doc = Html::parse_document(html);
    let grid = select_and_stitch(&doc);
    if grid.is_empty() {
        return None;
    }
    let grid = filter_scaffolding(grid, keep_abstract);
    let (indent, mode) = resolve_indent(&grid, kind);
    Some((grid, indent, mode))
}

impl StatementPipeline {
    pub fn new(client: SecClient, options: RunOptions, out_root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            options,
            out_root: out_root.into(),
        }
    }

    /// Runs the full extraction for one company.
    ///
    /// # Errors
    ///
    /// Fails when the CIK is invalid, the submissions index cannot be
    /// fetched, no 10-K falls inside the lookback window, or the manifest
    /// cannot be written. Per-filing problems are recorded in the manifest
    /// instead of failing the run.
    pub async fn run(&self, cik: &str) -> Result<RunSummary> {
        let cik10 = normalize_cik(cik)?;

        let records = self.client.gather_filings(&cik10).await?;
        let filings = pick_10ks(
            &records,
            self.options.years,
            self.options.limit,
            self.options.include_amends,
        );
        if filings.is_empty() {
            return Err(StatementError::ParseFailure(
                "no matching 10-K filings found in the requested window".to_string(),
            ));
        }

        let out_dir = self.out_root.join(&cik10);
        fs::create_dir_all(&out_dir)?;

        let cik_i = cik_int(&cik10);
        let mut manifest = Manifest {
            cik: cik10.clone(),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            filings: Vec::new(),
        };

        for filing in &filings {
            tracing::info!(
                "Processing {} {} filed {}",
                filing.form,
                filing.accession,
                filing.filing_date
            );
            let entry = self
                .process_filing(&cik10, &cik_i, filing, &out_dir)
                .await;
            manifest.filings.push(entry);
        }

        write_json(&out_dir, Path::new("manifest.json"), &manifest)?;

        Ok(RunSummary {
            out: out_dir,
            processed: manifest.filings.len(),
        })
    }

    async fn process_filing(
        &self,
        cik10: &str,
        cik_i: &str,
        filing: &Filing,
        out_dir: &Path,
    ) -> FilingEntry {
        let base_url = format!(
            "{}/{}/{}",
            self.client.archives_url(),
            cik_i,
            accession_nodash(&filing.accession)
        );

        let mut entry = FilingEntry {
            accession_number: filing.accession.clone(),
            form: filing.form.clone(),
            filing_date: filing.filing_date.to_string(),
            report_date: filing.report_date.map(|d| d.to_string()),
            base_url: base_url.clone(),
            filing_summary_url: None,
            reports_picked: Default::default(),
            outputs: Default::default(),
            errors: Vec::new(),
        };

        let filing_rel = PathBuf::from(&filing.accession);

        let summary_xml = match self.client.fetch_filing_summary(&base_url).await {
            Ok((xml, url)) => {
                entry.filing_summary_url = Some(url);
                xml
            }
            Err(e) => {
                entry.errors.push(format!("FilingSummary: {e}"));
                return entry;
            }
        };

        if let Err(e) = write_text(out_dir, &filing_rel.join("FilingSummary.xml"), &summary_xml) {
            entry.errors.push(format!("FilingSummary: {e}"));
            return entry;
        }

        let reports = match parse_reports(&summary_xml) {
            Ok(reports) => reports,
            Err(e) => {
                entry.errors.push(format!("FilingSummary: {e}"));
                return entry;
            }
        };

        for kind in StatementKind::ALL {
            self.process_statement(cik10, filing, kind, &reports, &base_url, out_dir, &mut entry)
                .await;
        }

        entry
    }

    /// Extracts and writes one statement, recording any failure on the entry.
    #[allow(clippy::too_many_arguments)]
    async fn process_statement(
        &self,
        cik10: &str,
        filing: &Filing,
        kind: StatementKind,
        reports: &[Report],
        base_url: &str,
        out_dir: &Path,
        entry: &mut FilingEntry,
    ) {
        let tag = kind.tag();

        let Some(report) = pick_report(reports, kind) else {
            entry
                .errors
                .push(format!("{tag}: report not found in FilingSummary.xml"));
            return;
        };

        let report_url = format!("{base_url}/{}", report.html_file);
        let (code, html) = match self.client.get_text(&report_url).await {
            Ok(v) => v,
            Err(e) => {
                entry.errors.push(format!("{tag}: {e}"));
                return;
            }
        };
        if code != 200 {
            entry
                .errors
                .push(format!("{tag}: HTTP {code} for {}", report.html_file));
            return;
        }

        let filing_rel = PathBuf::from(&filing.accession);
        if let Err(e) = write_text(out_dir, &filing_rel.join(&report.html_file), &html) {
            entry.errors.push(format!("{tag}: {e}"));
            return;
        }

        let Some((grid, indent, mode)) =
            extract_statement(&html, kind, self.options.keep_abstract)
        else {
            entry.errors.push(format!(
                "{tag}: could not parse statement tables from {}",
                report.html_file
            ));
            return;
        };

        let stem = kind.file_stem();
        let csv_rel = filing_rel.join(format!("{stem}.csv"));
        let json_rel = filing_rel.join(format!("{stem}.json"));

        let artifact = StatementArtifact {
            cik: cik10.to_string(),
            accession_number: filing.accession.clone(),
            statement: tag.to_string(),
            source_url: report_url.clone(),
            report: ReportInfo {
                short: report.short_name.clone(),
                long: report.long_name.clone(),
                html: report.html_file.clone(),
                report_type: report.report_type.clone(),
            },
            indent_mode: mode.as_str().to_string(),
            indent,
            rows: grid.rows,
            row_meta: grid.meta,
        };

        let csv_path = match write_csv(out_dir, &csv_rel, &artifact.rows) {
            Ok(p) => p,
            Err(e) => {
                entry.errors.push(format!("{tag}: {e}"));
                return;
            }
        };
        let json_path = match write_json(out_dir, &json_rel, &artifact) {
            Ok(p) => p,
            Err(e) => {
                entry.errors.push(format!("{tag}: {e}"));
                return;
            }
        };

        entry.reports_picked.insert(
            tag.to_string(),
            PickedReport {
                short: report.short_name.clone(),
                long: report.long_name.clone(),
                file: report.html_file.clone(),
                report_type: report.report_type.clone(),
                url: report_url,
            },
        );
        entry.outputs.insert(
            tag.to_string(),
            OutputPaths {
                csv: csv_path.display().to_string(),
                json: json_path.display().to_string(),
            },
        );
        tracing::info!("Wrote {} statement for {}", tag, filing.accession);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_statement_none_on_tableless_page() {
        assert!(extract_statement("<html><body><p>hi</p></body></html>", StatementKind::BalanceSheet, false).is_none());
    }

    #[test]
    fn test_extract_statement_parallel_vectors() {
        let html = r#"<table>
            <tr><td>Balance Sheet</td><td>2024</td><td>2023</td></tr>
            <tr><td>Cash</td><td>1,000</td><td>900</td></tr>
            <tr><td>Receivables</td><td>500</td><td>400</td></tr>
            <tr><td>Inventory</td><td>70</td><td>60</td></tr>
            <tr><td>Goodwill</td><td>30</td><td>30</td></tr>
            <tr><td>Total assets</td><td>1,600</td><td>1,390</td></tr>
        </table>"#;
        let (grid, indent, mode) =
            extract_statement(html, StatementKind::BalanceSheet, false).unwrap();
        assert_eq!(grid.rows.len(), indent.len());
        assert_eq!(grid.rows.len(), grid.meta.len());
        assert_eq!(mode, IndentMode::Inferred);
        assert_eq!(indent[0], 0);
    }
}
