//! Choosing the right report for each primary statement.
//!
//! A 10-K's `FilingSummary.xml` lists dozens of reports: statements,
//! parentheticals, footnotes, schedules. The picker scores each report's
//! combined short and long name against per-statement keyword lists and
//! selects the best-scoring candidate. The weights are contracts: two
//! implementations over the same inputs must make identical picks.

use super::summary::Report;

/// The three primary financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// Balance sheet (statement of financial position).
    BalanceSheet,
    /// Income statement (statement of operations / earnings).
    IncomeStatement,
    /// Cash flow statement.
    CashFlow,
}

impl StatementKind {
    /// All kinds, in the fixed per-filing processing order.
    pub const ALL: [Self; 3] = [Self::BalanceSheet, Self::IncomeStatement, Self::CashFlow];

    /// Short tag used in artifacts and error strings (`BS`, `IS`, `CFS`).
    pub fn tag(self) -> &'static str {
        match self {
            Self::BalanceSheet => "BS",
            Self::IncomeStatement => "IS",
            Self::CashFlow => "CFS",
        }
    }

    /// Output filename stem for this statement.
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance_sheet",
            Self::IncomeStatement => "income_statement",
            Self::CashFlow => "cash_flow",
        }
    }

    fn must_terms(self) -> &'static [&'static str] {
        match self {
            Self::BalanceSheet => &[
                "balance sheet",
                "financial position",
                "statement of financial position",
            ],
            Self::IncomeStatement => &[
                "statement of operations",
                "statements of operations",
                "income statement",
                "statements of income",
                "statement of earnings",
                "statements of earnings",
                "results of operations",
            ],
            Self::CashFlow => &["cash flows", "cash flow"],
        }
    }

    fn avoid_terms(self) -> &'static [&'static str] {
        match self {
            Self::BalanceSheet => &[
                "parenthetical",
                "changes in",
                "equity",
                "cash flows",
                "operations",
                "income",
                "earnings",
            ],
            Self::IncomeStatement => &[
                "comprehensive",
                "parenthetical",
                "balance sheet",
                "cash flows",
                "equity",
            ],
            Self::CashFlow => &[
                "parenthetical",
                "balance sheet",
                "operations",
                "income",
                "earnings",
                "equity",
            ],
        }
    }
}

/// Scores a single report for a statement kind.
///
/// `10·|must hits| − 8·|avoid hits|`, plus 1 for an `.htm`/`.html` filename
/// and 1 for a `Sheet`/`Statement` report type.
fn score(report: &Report, kind: StatementKind) -> i32 {
    let text = format!("{} {}", report.short_name, report.long_name).to_lowercase();

    let mut s = 0;
    for m in kind.must_terms() {
        if text.contains(m) {
            s += 10;
        }
    }
    for a in kind.avoid_terms() {
        if text.contains(a) {
            s -= 8;
        }
    }

    let file = report.html_file.to_lowercase();
    if file.ends_with(".htm") || file.ends_with(".html") {
        s += 1;
    }
    let rtype = report.report_type.to_lowercase();
    if rtype == "sheet" || rtype == "statement" {
        s += 1;
    }
    s
}

/// Picks the best report for a statement kind, or `None` when no candidate
/// scores above zero. Ties go to the first-seen report.
pub fn pick_report(reports: &[Report], kind: StatementKind) -> Option<&Report> {
    let mut best: Option<(&Report, i32)> = None;
    for report in reports {
        let s = score(report, kind);
        if best.is_none_or(|(_, bs)| s > bs) {
            best = Some((report, s));
        }
    }
    best.filter(|&(_, s)| s > 0).map(|(r, _)| r)
}
