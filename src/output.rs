//! On-disk artifacts: per-statement CSV/JSON, raw sources, and the company
//! manifest.
//!
//! Every write goes through a path-escape guard: the relative path may not
//! contain parent or root components, and after parent directories are
//! created the resolved location must still live under the output root (which
//! also catches symlink tricks). Files are written with their full payload in
//! one call, so an interrupted run never leaves a torn artifact.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use super::error::{Result, StatementError};
use super::parsing::RowMeta;

/// Joins `rel` under `root`, refusing traversal components.
pub fn safe_join(root: &Path, rel: &Path) -> Result<PathBuf> {
    for component in rel.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(StatementError::PathEscape(rel.display().to_string()));
            }
        }
    }
    Ok(root.join(rel))
}

/// Writes text under the root, creating parent directories eagerly.
///
/// After the parents exist their canonical form is checked against the
/// canonical root, so a symlinked subdirectory cannot redirect the write
/// outside the root.
pub fn write_text(root: &Path, rel: &Path, text: &str) -> Result<PathBuf> {
    let path = safe_join(root, rel)?;

    let parent = path.parent().unwrap_or(root);
    fs::create_dir_all(parent)?;

    let canon_root = root.canonicalize()?;
    let canon_parent = parent.canonicalize()?;
    if canon_parent != canon_root && !canon_parent.starts_with(&canon_root) {
        return Err(StatementError::PathEscape(rel.display().to_string()));
    }

    fs::write(&path, text)?;
    Ok(path)
}

/// Writes rows as CSV under the root.
pub fn write_csv(root: &Path, rel: &Path, rows: &[Vec<String>]) -> Result<PathBuf> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    write_text(root, rel, &String::from_utf8_lossy(&buf))
}

/// Serializes a value as pretty JSON under the root.
pub fn write_json<T: Serialize>(root: &Path, rel: &Path, value: &T) -> Result<PathBuf> {
    let text = serde_json::to_string_pretty(value)?;
    write_text(root, rel, &text)
}

/// Identifying fields of the picked report, embedded in statement artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct ReportInfo {
    pub short: String,
    pub long: String,
    pub html: String,
    #[serde(rename = "type")]
    pub report_type: String,
}

/// The per-statement JSON artifact.
#[derive(Debug, Clone, Serialize)]
pub struct StatementArtifact {
    pub cik: String,

    #[serde(rename = "accessionNumber")]
    pub accession_number: String,

    /// Statement tag: `BS`, `IS`, or `CFS`.
    pub statement: String,

    #[serde(rename = "sourceUrl")]
    pub source_url: String,

    pub report: ReportInfo,

    /// `"from_html"` or `"inferred"`.
    pub indent_mode: String,

    /// Per-row indent levels, aligned with `rows`.
    pub indent: Vec<u32>,

    pub rows: Vec<Vec<String>>,

    pub row_meta: Vec<RowMeta>,
}

/// Picked-report summary inside a manifest filing entry.
#[derive(Debug, Clone, Serialize)]
pub struct PickedReport {
    pub short: String,
    pub long: String,
    pub file: String,
    #[serde(rename = "type")]
    pub report_type: String,
    pub url: String,
}

/// Output file locations for one extracted statement.
#[derive(Debug, Clone, Serialize)]
pub struct OutputPaths {
    pub csv: String,
    pub json: String,
}

/// One filing's entry in the company manifest.
#[derive(Debug, Clone, Serialize)]
pub struct FilingEntry {
    #[serde(rename = "accessionNumber")]
    pub accession_number: String,

    pub form: String,

    #[serde(rename = "filingDate")]
    pub filing_date: String,

    #[serde(rename = "reportDate")]
    pub report_date: Option<String>,

    #[serde(rename = "baseUrl")]
    pub base_url: String,

    #[serde(rename = "filingSummaryUrl", skip_serializing_if = "Option::is_none")]
    pub filing_summary_url: Option<String>,

    #[serde(rename = "reportsPicked")]
    pub reports_picked: BTreeMap<String, PickedReport>,

    pub outputs: BTreeMap<String, OutputPaths>,

    pub errors: Vec<String>,
}

/// The per-CIK manifest listing every processed filing.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub cik: String,

    #[serde(rename = "generatedAt")]
    pub generated_at: String,

    pub filings: Vec<FilingEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_join_accepts_descendants() {
        let root = Path::new("/out");
        assert_eq!(
            safe_join(root, Path::new("a/b.txt")).unwrap(),
            PathBuf::from("/out/a/b.txt")
        );
        assert!(safe_join(root, Path::new("./a.txt")).is_ok());
    }

    #[test]
    fn test_safe_join_rejects_traversal() {
        let root = Path::new("/out");
        assert!(matches!(
            safe_join(root, Path::new("../escape.txt")),
            Err(StatementError::PathEscape(_))
        ));
        assert!(matches!(
            safe_join(root, Path::new("a/../../escape.txt")),
            Err(StatementError::PathEscape(_))
        ));
        assert!(matches!(
            safe_join(root, Path::new("/absolute.txt")),
            Err(StatementError::PathEscape(_))
        ));
    }

    #[test]
    fn test_write_text_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_text(dir.path(), Path::new("a/b/file.txt"), "hello").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn test_write_text_refuses_escape() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_text(dir.path(), Path::new("../sneaky.txt"), "x").is_err());
    }

    #[test]
    fn test_write_csv_round_trips_commas() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![
            vec!["Cash".to_string(), "1,000".to_string()],
            vec!["Total".to_string(), "1,000".to_string()],
        ];
        let path = write_csv(dir.path(), Path::new("t.csv"), &rows).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("\"1,000\""));
    }

    #[test]
    fn test_statement_artifact_json_shape() {
        let artifact = StatementArtifact {
            cik: "0000320193".to_string(),
            accession_number: "0000320193-24-000123".to_string(),
            statement: "BS".to_string(),
            source_url: "https://example.test/R2.htm".to_string(),
            report: ReportInfo {
                short: "Balance Sheet".to_string(),
                long: "Consolidated Balance Sheet".to_string(),
                html: "R2.htm".to_string(),
                report_type: "Sheet".to_string(),
            },
            indent_mode: "from_html".to_string(),
            indent: vec![0, 1],
            rows: vec![
                vec!["Statement".to_string(), "2024".to_string()],
                vec!["Cash".to_string(), "100".to_string()],
            ],
            row_meta: vec![RowMeta::default(), RowMeta::default()],
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&artifact).unwrap()).unwrap();
        assert_eq!(json["accessionNumber"], "0000320193-24-000123");
        assert_eq!(json["report"]["type"], "Sheet");
        assert_eq!(json["indent_mode"], "from_html");
        assert_eq!(json["row_meta"][0]["scaffold"], false);
        assert!(json["row_meta"][0]["concepts"].is_array());
    }
}
