//! Row hierarchy: scaffolding removal and indent-level resolution.
//!
//! After stitching, a statement grid still contains XBRL scaffolding rows
//! (`Assets [Abstract]`, axis/member groupings) and carries indentation only
//! as raw pixels. This module drops the scaffolding, quantizes pixels into
//! levels, and, when the HTML carried no indentation at all, infers a
//! stable hierarchy from statement-specific section cues.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::parsing::TableGrid;
use super::parsing::indent::PX_PER_LEVEL;
use super::parsing::text::values_blank;
use super::picker::StatementKind;

/// `[Abstract]` / `[Line Items]` / `[Table]` / `[Axis]` / `[Member]` label
/// suffixes.
static SCAFFOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[(abstract|line items|table|axis|member)\]\s*$").unwrap());

static CFS_MAJOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(operating|investing|financing)\s+activities:\s*$").unwrap());
static CFS_ADJUST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^adjustments\b").unwrap());
static CFS_CHANGES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^changes in\b").unwrap());

/// How the indent vector of a statement was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentMode {
    /// Quantized from HTML pixel signals.
    FromHtml,
    /// Derived from statement-specific section rules.
    Inferred,
}

impl IndentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FromHtml => "from_html",
            Self::Inferred => "inferred",
        }
    }
}

/// Removes XBRL scaffolding rows and stamps the scaffold flag.
///
/// A row is scaffolding when its label carries one of the bracketed suffixes
/// or one of its concepts ends in `Abstract`. Rows with an empty label are
/// always dropped; scaffolding rows whose value columns are all blank are
/// dropped unless `keep_abstract` is set. Surviving rows keep their flag so
/// downstream consumers can still tell them apart.
pub fn filter_scaffolding(grid: TableGrid, keep_abstract: bool) -> TableGrid {
    let mut out = TableGrid::default();

    for ((row, indent_px), mut meta) in grid
        .rows
        .into_iter()
        .zip(grid.indent_px)
        .zip(grid.meta)
    {
        let label = row[0].trim();
        if label.is_empty() {
            continue;
        }

        let by_label = SCAFFOLD_RE.is_match(label);
        let by_concept = meta
            .concepts
            .iter()
            .any(|c| c.to_lowercase().ends_with("abstract"));
        let scaffold = by_label || by_concept;

        if !keep_abstract && scaffold && values_blank(&row) {
            continue;
        }

        meta.scaffold = scaffold;
        out.rows.push(row);
        out.indent_px.push(indent_px);
        out.meta.push(meta);
    }

    out
}

/// Resolves per-row indent levels for a filtered grid.
///
/// When every HTML-derived pixel is zero the page carried no indentation and
/// the levels are inferred; otherwise each pixel value is quantized at
/// [`PX_PER_LEVEL`] per step.
pub fn resolve_indent(grid: &TableGrid, kind: StatementKind) -> (Vec<u32>, IndentMode) {
    if grid.indent_px.iter().all(|&px| px == 0) {
        (infer_indent_levels(&grid.rows, kind), IndentMode::Inferred)
    } else {
        let levels = grid
            .indent_px
            .iter()
            .map(|&px| (f64::from(px) / PX_PER_LEVEL).round() as u32)
            .collect();
        (levels, IndentMode::FromHtml)
    }
}

/// Infers indent levels from section cues when HTML carries none.
///
/// Row 0 (the header) is level 0. For cash flow statements a small state
/// machine tracks the `… activities:` / `Adjustments …` / `Changes in …`
/// nesting; balance sheets and income statements read as section headers at
/// level 0 with data rows at level 1.
pub fn infer_indent_levels(rows: &[Vec<String>], kind: StatementKind) -> Vec<u32> {
    let mut levels = vec![0u32; rows.len()];

    let mut in_adjust = false;
    let mut in_changes = false;

    for (i, row) in rows.iter().enumerate() {
        if i == 0 {
            continue;
        }

        let label = row[0].trim();

        if !values_blank(row) {
            levels[i] = match kind {
                StatementKind::CashFlow => {
                    if in_changes {
                        3
                    } else if in_adjust {
                        2
                    } else {
                        1
                    }
                }
                _ => 1,
            };
            continue;
        }

        // Section header: blank value columns.
        match kind {
            StatementKind::CashFlow => {
                if CFS_MAJOR_RE.is_match(label) {
                    in_adjust = false;
                    in_changes = false;
                    levels[i] = 0;
                } else if CFS_ADJUST_RE.is_match(label) {
                    in_adjust = true;
                    in_changes = false;
                    levels[i] = 1;
                } else if CFS_CHANGES_RE.is_match(label) {
                    in_changes = true;
                    levels[i] = if in_adjust { 2 } else { 1 };
                } else {
                    levels[i] = if in_changes {
                        2
                    } else if in_adjust {
                        1
                    } else {
                        0
                    };
                }
            }
            _ => levels[i] = 0,
        }
    }

    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::RowMeta;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(ToString::to_string).collect()
    }

    fn grid_with_concepts(rows: Vec<Vec<String>>, concepts: Vec<Vec<&str>>) -> TableGrid {
        let n = rows.len();
        let mut grid = TableGrid {
            rows,
            indent_px: vec![0; n],
            meta: concepts
                .into_iter()
                .map(|c| RowMeta {
                    concepts: c.into_iter().map(ToString::to_string).collect(),
                    scaffold: false,
                })
                .collect(),
        };
        grid.pad();
        grid
    }

    #[test]
    fn test_scaffold_rows_dropped() {
        let grid = grid_with_concepts(
            vec![
                row(&["Statement", "2024", "2023"]),
                row(&["Assets [Abstract]", "", ""]),
                row(&["Liabilities", "", ""]),
                row(&["Cash", "100", "90"]),
            ],
            vec![vec![], vec![], vec!["us-gaap:LiabilitiesAbstract"], vec![]],
        );
        let filtered = filter_scaffolding(grid, false);
        let labels: Vec<&str> = filtered.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(labels, vec!["Statement", "Cash"]);
        assert!(!filtered.meta[1].scaffold);
    }

    #[test]
    fn test_scaffold_rows_kept_and_flagged_with_keep_abstract() {
        let grid = grid_with_concepts(
            vec![
                row(&["Statement", "2024"]),
                row(&["Assets [Abstract]", ""]),
            ],
            vec![vec![], vec![]],
        );
        let filtered = filter_scaffolding(grid, true);
        assert_eq!(filtered.rows.len(), 2);
        assert!(filtered.meta[1].scaffold);
    }

    #[test]
    fn test_scaffold_with_values_survives() {
        let grid = grid_with_concepts(
            vec![
                row(&["Statement", "2024"]),
                row(&["Assets [Abstract]", "1,000"]),
            ],
            vec![vec![], vec![]],
        );
        let filtered = filter_scaffolding(grid, false);
        assert_eq!(filtered.rows.len(), 2);
        assert!(filtered.meta[1].scaffold);
    }

    #[test]
    fn test_empty_labels_always_dropped() {
        let grid = grid_with_concepts(
            vec![row(&["Statement", "2024"]), row(&["", "1,000"])],
            vec![vec![], vec![]],
        );
        let filtered = filter_scaffolding(grid, true);
        assert_eq!(filtered.rows.len(), 1);
    }

    #[test]
    fn test_resolve_quantizes_pixels() {
        let mut grid = grid_with_concepts(
            vec![
                row(&["Statement", "2024"]),
                row(&["Cash", "100"]),
                row(&["Receivables", "90"]),
            ],
            vec![vec![], vec![], vec![]],
        );
        grid.indent_px = vec![0, 24, 25];
        let (levels, mode) = resolve_indent(&grid, StatementKind::BalanceSheet);
        assert_eq!(mode, IndentMode::FromHtml);
        assert_eq!(levels, vec![0, 2, 2]);
    }

    #[test]
    fn test_resolve_falls_back_to_inference() {
        let grid = grid_with_concepts(
            vec![
                row(&["Statement", "2024"]),
                row(&["Current assets:", ""]),
                row(&["Cash", "100"]),
            ],
            vec![vec![], vec![], vec![]],
        );
        let (levels, mode) = resolve_indent(&grid, StatementKind::BalanceSheet);
        assert_eq!(mode, IndentMode::Inferred);
        assert_eq!(levels, vec![0, 0, 1]);
    }

    #[test]
    fn test_cfs_inference_full_walk() {
        let rows = vec![
            row(&["Statement", "2024"]),
            row(&["Operating activities:", ""]),
            row(&["Net income", "500"]),
            row(&["Adjustments to reconcile net income:", ""]),
            row(&["Depreciation", "80"]),
            row(&["Changes in operating assets and liabilities:", ""]),
            row(&["Accounts receivable", "(20)"]),
            row(&["Investing activities:", ""]),
            row(&["Capital expenditures", "(120)"]),
        ];
        let levels = infer_indent_levels(&rows, StatementKind::CashFlow);
        assert_eq!(levels, vec![0, 0, 1, 1, 2, 2, 3, 0, 1]);
    }

    #[test]
    fn test_cfs_level_three_only_under_changes_context() {
        // No "Changes in" header: nothing reaches level 3.
        let rows = vec![
            row(&["Statement", "2024"]),
            row(&["Operating activities:", ""]),
            row(&["Net income", "500"]),
            row(&["Adjustments to reconcile net income:", ""]),
            row(&["Depreciation", "80"]),
            row(&["Investing activities:", ""]),
            row(&["Capital expenditures", "(120)"]),
        ];
        let levels = infer_indent_levels(&rows, StatementKind::CashFlow);
        assert_eq!(levels, vec![0, 0, 1, 1, 2, 0, 1]);
        assert!(levels.iter().all(|&l| l < 3));
    }

    #[test]
    fn test_bs_headers_zero_data_one() {
        let rows = vec![
            row(&["Statement", "2024"]),
            row(&["Current assets:", ""]),
            row(&["Cash", "100"]),
            row(&["Total current assets", "100"]),
            row(&["Current liabilities:", ""]),
            row(&["Accounts payable", "40"]),
        ];
        let levels = infer_indent_levels(&rows, StatementKind::BalanceSheet);
        assert_eq!(levels, vec![0, 0, 1, 1, 0, 1]);
    }
}
