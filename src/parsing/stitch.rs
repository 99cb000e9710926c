//! Picking the dominant statement table and stitching its continuations.
//!
//! A rendered report page can hold several tables: the statement itself,
//! legend fragments, and sometimes the statement split across two or three
//! tables when it spans page boundaries. Every table is profiled and scored;
//! the best one becomes the primary, and tables *after* it in document order
//! are appended while they keep the primary's shape. Repeated column headers
//! at the top of a continuation are elided by signature match, and the final
//! grid gets its multi-row header collapsed into one.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use super::indent::build_css_indent_map;
use super::table::{TableGrid, extract_table_rows};
use super::text::{has_year, is_numericish, row_has_header_hint};

static TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());

/// Maximum continuation tables appended after the primary.
const MAX_CONTINUATIONS: usize = 3;

/// Row-count contribution to the table score saturates here.
const ROW_SCORE_CAP: i64 = 220;

/// Shape summary of an extracted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableProfile {
    pub col_count: usize,
    pub numeric_cells: i64,
    pub year_cells: i64,
    pub nonempty_cells: i64,
}

/// Profiles a table's cells: width, numeric-ish count, year count, non-empty
/// count.
pub fn table_profile(rows: &[Vec<String>]) -> TableProfile {
    let mut profile = TableProfile {
        col_count: rows.iter().map(Vec::len).max().unwrap_or(0),
        numeric_cells: 0,
        year_cells: 0,
        nonempty_cells: 0,
    };
    for row in rows {
        for cell in row {
            let t = cell.replace('\u{a0}', " ");
            let t = t.trim();
            if t.is_empty() {
                continue;
            }
            profile.nonempty_cells += 1;
            if is_numericish(t) {
                profile.numeric_cells += 1;
            }
            if has_year(t) {
                profile.year_cells += 1;
            }
        }
    }
    profile
}

/// Scores a table: `3·numeric + 2·years + min(rows, 220)`, with a −500
/// penalty for tables too narrow or too sparse to be a statement.
pub fn score_table(profile: &TableProfile, row_count: usize) -> i64 {
    let mut score =
        profile.numeric_cells * 3 + profile.year_cells * 2 + (row_count as i64).min(ROW_SCORE_CAP);
    if profile.col_count < 2 || profile.nonempty_cells < 12 {
        score -= 500;
    }
    score
}

fn looks_like_continuation(profile: &TableProfile, base: &TableProfile) -> bool {
    profile.col_count == base.col_count
        && profile.nonempty_cells >= 8
        && profile.numeric_cells >= 6.max((base.numeric_cells as f64 * 0.12) as i64)
}

/// Lowercased, pipe-joined row signature used to spot repeated headers.
fn row_signature(row: &[String]) -> String {
    row.iter()
        .map(|c| c.replace('\u{a0}', " ").trim().to_lowercase())
        .collect::<Vec<_>>()
        .join(" | ")
}

struct Candidate {
    grid: TableGrid,
    profile: TableProfile,
    score: i64,
}

/// Extracts the dominant statement table from a report page, stitching
/// continuation tables and collapsing the header block.
///
/// Returns an empty grid when the page holds no usable table.
pub fn select_and_stitch(doc: &Html) -> TableGrid {
    let css_map = build_css_indent_map(doc);

    // Candidates stay in document order; the index into this vec is the
    // document position used for the forward continuation walk.
    let mut candidates: Vec<Candidate> = Vec::new();
    for table in doc.select(&TABLE_SEL) {
        let grid = extract_table_rows(table, &css_map);
        if grid.is_empty() {
            continue;
        }
        let profile = table_profile(&grid.rows);
        let score = score_table(&profile, grid.rows.len());
        candidates.push(Candidate {
            grid,
            profile,
            score,
        });
    }

    if candidates.is_empty() {
        return TableGrid::default();
    }

    let mut best_pos = 0;
    for (i, c) in candidates.iter().enumerate() {
        if c.score > candidates[best_pos].score {
            best_pos = i;
        }
    }

    let base_profile = candidates[best_pos].profile;
    let mut combined = candidates[best_pos].grid.clone();
    let head_sig = combined
        .rows
        .first()
        .map(|r| row_signature(r))
        .unwrap_or_default();

    let stop = (best_pos + 1 + MAX_CONTINUATIONS).min(candidates.len());
    for candidate in &candidates[best_pos + 1..stop] {
        if !looks_like_continuation(&candidate.profile, &base_profile) {
            break;
        }

        // Elide a repeated column header at the top of the continuation.
        let mut drop = 0;
        for (t, row) in candidate.grid.rows.iter().take(3).enumerate() {
            if row_signature(row) == head_sig {
                drop = t + 1;
            }
        }

        combined.rows.extend(candidate.grid.rows[drop..].iter().cloned());
        combined
            .indent_px
            .extend(candidate.grid.indent_px[drop..].iter().copied());
        combined.meta.extend(candidate.grid.meta[drop..].iter().cloned());
    }

    merge_multiline_headers(combined)
}

/// Collapses a multi-row column header into a single row.
///
/// A row belongs to the header block when it has at least one non-empty value
/// cell, none of its value cells is numeric-ish, and it carries a year or a
/// period phrase. The block is bounded to the first 10 rows and only merged
/// when it spans at least 2; merging concatenates per column and keeps the
/// first block row's label, indent, and metadata. Applying the merge twice
/// yields the same grid.
pub fn merge_multiline_headers(mut grid: TableGrid) -> TableGrid {
    if grid.is_empty() {
        return grid;
    }
    grid.pad();

    let mut block_len = 0;
    for row in grid.rows.iter().take(10) {
        let values: Vec<&String> = row[1..].iter().filter(|v| !v.trim().is_empty()).collect();
        if values.is_empty() {
            break;
        }
        if values.iter().any(|v| is_numericish(v)) {
            break;
        }
        if !row_has_header_hint(row) {
            break;
        }
        block_len += 1;
    }

    if block_len < 2 {
        return grid;
    }

    let width = grid.width();
    let mut columns = vec![String::new(); width - 1];
    for row in &grid.rows[..block_len] {
        for (j, col) in columns.iter_mut().enumerate() {
            let part = row[j + 1].trim();
            if !part.is_empty() {
                if col.is_empty() {
                    *col = part.to_string();
                } else {
                    col.push(' ');
                    col.push_str(part);
                }
            }
        }
    }

    let mut merged_row = Vec::with_capacity(width);
    merged_row.push(grid.rows[0][0].clone());
    merged_row.extend(columns);

    let mut rows = vec![merged_row];
    rows.extend(grid.rows[block_len..].iter().cloned());

    let mut indent_px = vec![grid.indent_px.first().copied().unwrap_or(0)];
    indent_px.extend(grid.indent_px[block_len..].iter().copied());

    let mut meta = vec![grid.meta.first().cloned().unwrap_or_default()];
    meta.extend(grid.meta[block_len..].iter().cloned());

    TableGrid {
        rows,
        indent_px,
        meta,
    }
}
