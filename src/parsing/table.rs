//! Walking an HTML table into a rectangular grid of cells.
//!
//! EDGAR statement tables use rowspan/colspan freely, so a naive cell walk
//! produces ragged, misaligned rows. The extractor keeps a column cursor and
//! a carry-down map of pending rowspans, expands colspans by repetition, and
//! pads every row to the table's maximum width. Alongside the cells it
//! records, per row, the label cell's indent pixels and iXBRL concepts.

use scraper::{ElementRef, Selector};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

use super::indent::{extract_concepts, extract_indent_px};

static TR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td, th").unwrap());

/// Per-row metadata carried through to the artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowMeta {
    /// iXBRL concept names found in the label cell, document order.
    pub concepts: Vec<String>,

    /// Whether the row is XBRL scaffolding (set by the scaffolding filter).
    pub scaffold: bool,
}

/// A rectangular statement table: rows of cells plus parallel per-row
/// indent-pixel and metadata vectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableGrid {
    pub rows: Vec<Vec<String>>,
    pub indent_px: Vec<u32>,
    pub meta: Vec<RowMeta>,
}

impl TableGrid {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Maximum row width (0 when empty).
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Pads every row with empty cells up to the maximum width.
    pub fn pad(&mut self) {
        let width = self.width();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }
}

/// Collapsed, NBSP-normalized text of a cell: each text node trimmed, empties
/// dropped, the rest joined with single spaces.
fn cell_text(cell: ElementRef<'_>) -> String {
    let joined = cell
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    joined.replace('\u{a0}', " ")
}

fn span_attr(cell: ElementRef<'_>, name: &str) -> u32 {
    cell.value()
        .attr(name)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(1)
}

/// Appends any rowspan carry-downs pending at the cursor, advancing it.
fn drain_spans(
    span_map: &mut HashMap<usize, (u32, String)>,
    row: &mut Vec<String>,
    col: &mut usize,
) {
    while let Some((remaining, text)) = span_map.get(col).cloned() {
        row.push(text.clone());
        if remaining <= 1 {
            span_map.remove(col);
        } else {
            span_map.insert(*col, (remaining - 1, text));
        }
        *col += 1;
    }
}

/// Extracts one table element into a [`TableGrid`].
///
/// Produces one output row per source `<tr>`, skipping rows whose every cell
/// is empty. `css_map` is the document's class-indent map from
/// [`super::indent::build_css_indent_map`].
pub fn extract_table_rows(table: ElementRef<'_>, css_map: &HashMap<String, f64>) -> TableGrid {
    let mut grid = TableGrid::default();
    let mut span_map: HashMap<usize, (u32, String)> = HashMap::new();

    for tr in table.select(&TR_SEL) {
        let cells: Vec<ElementRef<'_>> = tr.select(&CELL_SEL).collect();
        if cells.is_empty() && span_map.is_empty() {
            continue;
        }

        let mut row: Vec<String> = Vec::new();
        let mut col = 0usize;

        drain_spans(&mut span_map, &mut row, &mut col);

        let indent_px = cells
            .first()
            .map(|c| extract_indent_px(*c, css_map))
            .unwrap_or(0);
        let concepts = cells.first().map(|c| extract_concepts(*c)).unwrap_or_default();

        for cell in &cells {
            drain_spans(&mut span_map, &mut row, &mut col);

            let text = cell_text(*cell);
            let colspan = span_attr(*cell, "colspan").max(1);
            let rowspan = span_attr(*cell, "rowspan");

            for _ in 0..colspan {
                row.push(text.clone());
                if rowspan > 1 {
                    span_map.insert(col, (rowspan - 1, text.clone()));
                }
                col += 1;
            }
        }

        drain_spans(&mut span_map, &mut row, &mut col);

        if row.iter().any(|c| !c.trim().is_empty()) {
            grid.rows.push(row);
            grid.indent_px.push(indent_px);
            grid.meta.push(RowMeta {
                concepts,
                scaffold: false,
            });
        }
    }

    grid.pad();
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn grid_from(html: &str) -> TableGrid {
        let doc = Html::parse_document(html);
        let sel = Selector::parse("table").unwrap();
        let table = doc.select(&sel).next().unwrap();
        extract_table_rows(table, &HashMap::new())
    }

    #[test]
    fn test_simple_rows_padded_to_width() {
        let grid = grid_from(
            "<table>
               <tr><td>Cash</td><td>100</td><td>90</td></tr>
               <tr><td>Total</td><td>100</td></tr>
             </table>",
        );
        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.rows[0], vec!["Cash", "100", "90"]);
        assert_eq!(grid.rows[1], vec!["Total", "100", ""]);
        assert_eq!(grid.indent_px, vec![0, 0]);
        assert_eq!(grid.meta.len(), 2);
    }

    #[test]
    fn test_colspan_repeats_text() {
        let grid = grid_from(
            r#"<table>
                 <tr><td></td><td colspan="2">Year Ended</td></tr>
                 <tr><td>Cash</td><td>1</td><td>2</td></tr>
               </table>"#,
        );
        assert_eq!(grid.rows[0], vec!["", "Year Ended", "Year Ended"]);
    }

    #[test]
    fn test_rowspan_carries_down() {
        let grid = grid_from(
            r#"<table>
                 <tr><td rowspan="2">Assets</td><td>1</td></tr>
                 <tr><td>2</td></tr>
               </table>"#,
        );
        assert_eq!(grid.rows[0], vec!["Assets", "1"]);
        assert_eq!(grid.rows[1], vec!["Assets", "2"]);
    }

    #[test]
    fn test_all_empty_rows_skipped() {
        let grid = grid_from(
            "<table>
               <tr><td> </td><td>\u{a0}</td></tr>
               <tr><td>Cash</td><td>1</td></tr>
             </table>",
        );
        assert_eq!(grid.rows.len(), 1);
        assert_eq!(grid.rows[0][0], "Cash");
    }

    #[test]
    fn test_nbsp_normalized_and_whitespace_collapsed() {
        let grid = grid_from(
            "<table><tr><td>  Total\u{a0}assets \n </td><td>
               <span>1,000</span>
             </td></tr></table>",
        );
        assert_eq!(grid.rows[0], vec!["Total assets", "1,000"]);
    }

    #[test]
    fn test_invalid_span_attributes_default_to_one() {
        let grid = grid_from(
            r#"<table><tr><td colspan="potato" rowspan="">Cash</td><td>1</td></tr></table>"#,
        );
        assert_eq!(grid.rows[0], vec!["Cash", "1"]);
    }

    #[test]
    fn test_parallel_vectors_same_length() {
        let grid = grid_from(
            r#"<table>
                 <tr><td style="padding-left:24px">Cash</td><td>1</td></tr>
                 <tr><td>Receivables</td><td rowspan="2">2</td></tr>
                 <tr><td>Inventory</td></tr>
               </table>"#,
        );
        assert_eq!(grid.rows.len(), grid.indent_px.len());
        assert_eq!(grid.rows.len(), grid.meta.len());
        let width = grid.width();
        assert!(grid.rows.iter().all(|r| r.len() == width));
    }
}
