mod common;

use common::read_fixture;
use statementkit::{IndentMode, StatementKind, extract_statement};

const BALANCE_SHEET_FIXTURE: &str = "reports/R2.htm";
const INCOME_STATEMENT_FIXTURE: &str = "reports/R4.htm";
const CASH_FLOW_FIXTURE: &str = "reports/R7.htm";
const CONTINUATION_FIXTURE: &str = "reports/continuation.htm";
const SCAFFOLD_FIXTURE: &str = "reports/scaffold.htm";

#[test]
fn test_balance_sheet_indent_from_html() {
    let html = read_fixture(BALANCE_SHEET_FIXTURE);
    let (grid, indent, mode) =
        extract_statement(&html, StatementKind::BalanceSheet, false).unwrap();

    assert_eq!(mode, IndentMode::FromHtml);
    assert_eq!(grid.rows.len(), 5);
    // class="pl2" on three rows and an inline padding-left:24px on the last
    // all quantize to level 2
    assert_eq!(indent, vec![0, 2, 2, 2, 2]);
    assert_eq!(grid.rows[1][0], "Cash and cash equivalents");
    assert_eq!(grid.rows[4][0], "Inventories");
}

#[test]
fn test_income_statement_header_merge() {
    let html = read_fixture(INCOME_STATEMENT_FIXTURE);
    let (grid, indent, mode) =
        extract_statement(&html, StatementKind::IncomeStatement, false).unwrap();

    // Two header rows collapse into one
    assert_eq!(grid.rows.len(), 9);
    assert_eq!(grid.rows[0][1], "Years Ended Sep. 28, 2024");
    assert_eq!(grid.rows[0][2], "Years Ended Sep. 30, 2023");
    assert_eq!(
        grid.rows[0][0],
        "CONSOLIDATED STATEMENTS OF OPERATIONS - USD ($) shares in Thousands"
    );

    assert_eq!(mode, IndentMode::Inferred);
    assert_eq!(indent, vec![0, 1, 1, 1, 0, 1, 1, 1, 1]);
    assert_eq!(grid.rows[4][0], "Operating expenses:");
}

#[test]
fn test_cash_flow_inferred_hierarchy() {
    let html = read_fixture(CASH_FLOW_FIXTURE);
    let (grid, indent, mode) = extract_statement(&html, StatementKind::CashFlow, false).unwrap();

    assert_eq!(mode, IndentMode::Inferred);
    let labels: Vec<&str> = grid.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(labels[1], "Operating activities:");
    assert_eq!(labels[9], "Investing activities:");

    assert_eq!(indent, vec![0, 0, 1, 1, 2, 2, 2, 3, 3, 0, 1, 1, 0, 1]);

    // Level 3 appears only for data rows inside the "Changes in" context
    for (i, &level) in indent.iter().enumerate() {
        if level == 3 {
            assert!(labels[i] == "Accounts receivable, net" || labels[i] == "Inventories");
        }
    }
}

#[test]
fn test_continuation_stitching() {
    let html = read_fixture(CONTINUATION_FIXTURE);
    let (grid, indent, _) = extract_statement(&html, StatementKind::BalanceSheet, false).unwrap();

    // 8 primary rows + 5 continuation rows − 1 repeated header
    assert_eq!(grid.rows.len(), 12);
    assert_eq!(indent.len(), 12);

    let header_count = grid
        .rows
        .iter()
        .filter(|r| r[0].contains("CONSOLIDATED BALANCE SHEETS"))
        .count();
    assert_eq!(header_count, 1, "continuation header is elided");

    assert_eq!(grid.rows[7][0], "Total current assets");
    assert_eq!(grid.rows[8][0], "Marketable securities, non-current");
    assert_eq!(grid.rows[11][0], "Total assets");

    let width = grid.rows[0].len();
    assert!(grid.rows.iter().all(|r| r.len() == width));
}

#[test]
fn test_scaffold_rows_dropped_by_default() {
    let html = read_fixture(SCAFFOLD_FIXTURE);
    let (grid, _, _) = extract_statement(&html, StatementKind::BalanceSheet, false).unwrap();

    let labels: Vec<&str> = grid.rows.iter().map(|r| r[0].as_str()).collect();
    assert!(!labels.iter().any(|l| l.contains("[Abstract]")));
    assert!(
        !labels.iter().any(|l| *l == "Current assets"),
        "blank row with an ...Abstract concept is scaffolding too"
    );
    assert_eq!(labels.len(), 5);
    assert!(grid.meta.iter().all(|m| !m.scaffold));
}

#[test]
fn test_scaffold_rows_kept_on_request() {
    let html = read_fixture(SCAFFOLD_FIXTURE);
    let (grid, indent, _) = extract_statement(&html, StatementKind::BalanceSheet, true).unwrap();

    assert_eq!(grid.rows.len(), 7);
    assert!(grid.meta[1].scaffold);
    assert!(grid.meta[2].scaffold);
    assert_eq!(grid.meta[1].concepts, vec!["us-gaap:AssetsAbstract"]);
    assert_eq!(indent.len(), grid.rows.len());
}

#[test]
fn test_rows_indent_meta_stay_parallel() {
    for fixture in [
        BALANCE_SHEET_FIXTURE,
        INCOME_STATEMENT_FIXTURE,
        CASH_FLOW_FIXTURE,
        CONTINUATION_FIXTURE,
        SCAFFOLD_FIXTURE,
    ] {
        let html = read_fixture(fixture);
        let (grid, indent, _) =
            extract_statement(&html, StatementKind::BalanceSheet, false).unwrap();
        assert_eq!(grid.rows.len(), indent.len(), "{fixture}");
        assert_eq!(grid.rows.len(), grid.meta.len(), "{fixture}");
        assert_eq!(indent[0], 0, "{fixture}");

        let width = grid.rows.iter().map(Vec::len).max().unwrap();
        assert!(
            grid.rows.iter().all(|r| r.len() == width),
            "{fixture}: rows padded to uniform width"
        );
    }
}
