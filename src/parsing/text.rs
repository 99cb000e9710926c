//! Cell-text recognizers shared across table scoring and header merging.

use regex::Regex;
use std::sync::LazyLock;

/// Matches money-like cells: `34940`, `34,940`, `$ 34,940`, `(4,774)`, `-123`.
static NUMISH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\(?\s*-?\s*\$?\s*\d[\d,]*(\.\d+)?\s*\)?\s*$").unwrap()
});

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

/// Matches a bare calendar year, which reads as a column header rather than a
/// value.
static BARE_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(19|20)\d{2}$").unwrap());

static HEADER_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(months|years)\s+ended\b|\bas\s+of\b|\bended\b").unwrap()
});

/// Normalizes a cell for matching: NBSP to space, trimmed.
fn norm(s: &str) -> String {
    s.replace('\u{a0}', " ").trim().to_string()
}

/// Whether a cell reads as a numeric value or a dash placeholder.
///
/// A bare 4-digit year is not numeric-ish: EDGAR uses those as column
/// headers, and counting them as values would both skew table scores and stop
/// the header merger from absorbing year rows.
pub fn is_numericish(s: &str) -> bool {
    let t = norm(s);
    if t.is_empty() {
        return false;
    }
    if matches!(t.as_str(), "\u{2014}" | "-" | "\u{2013}") {
        return true;
    }
    if BARE_YEAR_RE.is_match(&t) {
        return false;
    }
    NUMISH_RE.is_match(&t)
}

/// Whether a cell contains a 4-digit year (19xx/20xx).
pub fn has_year(s: &str) -> bool {
    YEAR_RE.is_match(s)
}

/// Whether a row reads as a column header: it mentions a year or one of the
/// period phrases (`months ended`, `years ended`, `as of`, `ended`).
pub fn row_has_header_hint(row: &[String]) -> bool {
    let blob = norm(&row.join(" "));
    if blob.is_empty() {
        return false;
    }
    YEAR_RE.is_match(&blob) || HEADER_WORD_RE.is_match(&blob)
}

/// Whether every value column (everything past the label) is blank.
pub fn values_blank(row: &[String]) -> bool {
    row.iter().skip(1).all(|c| c.trim().is_empty())
}

/// Converts a CSS length to pixels: `pt` at 96/72, `em`/`rem` at 16, `px`
/// as-is.
pub fn to_px(val: f64, unit: &str) -> f64 {
    match unit.to_ascii_lowercase().as_str() {
        "pt" => val * (96.0 / 72.0),
        "em" | "rem" => val * 16.0,
        _ => val,
    }
}
