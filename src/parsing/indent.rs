//! Indentation-signal extraction from statement label cells.
//!
//! EDGAR renderers encode row hierarchy in at least four independent ways:
//! inline styles, stylesheet class rules, level-encoding class names, and
//! literal non-breaking-space padding. Each signal yields a pixel estimate;
//! the cell's indent is the *maximum* over all four, never a sum and never
//! the first match.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;

use super::text::to_px;

/// One `.class { padding-left: 12px }`-style rule inside a `<style>` block.
static CSS_RULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\.([A-Za-z0-9_-]+)\s*\{[^}]*?(padding-left|margin-left|text-indent)\s*:\s*([0-9.]+)\s*(px|pt|em|rem)\s*;?[^}]*\}",
    )
    .unwrap()
});

static STYLE_INDENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(padding-left|margin-left|text-indent)\s*:\s*([0-9.]+)\s*(px|pt|em|rem)")
        .unwrap()
});

/// Class names that encode a level directly: `pl2`, `indent-3`, `lvl_1`, ...
static CLASS_LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:pl|padl|indent|lvl|level)[-_]?(\d+)$").unwrap());

static STYLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("style").unwrap());

/// Pixels contributed per level step by level-encoding class names, and the
/// quantization step used when converting pixels back to levels.
pub const PX_PER_LEVEL: f64 = 12.0;

/// Pixels attributed to one leading non-breaking space.
const PX_PER_NBSP: f64 = 4.0;

/// Harvests class-indent rules from every `<style>` element in the document.
///
/// When a class appears in multiple rules, the maximum pixel value wins.
pub fn build_css_indent_map(doc: &Html) -> HashMap<String, f64> {
    let mut map: HashMap<String, f64> = HashMap::new();
    for style in doc.select(&STYLE_SEL) {
        let css: String = style.text().collect::<Vec<_>>().join(" ");
        for caps in CSS_RULE_RE.captures_iter(&css) {
            let class = caps[1].to_string();
            let Ok(num) = caps[3].parse::<f64>() else {
                continue;
            };
            let px = to_px(num, &caps[4]);
            let entry = map.entry(class).or_insert(px);
            if px > *entry {
                *entry = px;
            }
        }
    }
    map
}

fn apply_style(style: &str, best: &mut f64) {
    for caps in STYLE_INDENT_RE.captures_iter(style) {
        if let Ok(num) = caps[2].parse::<f64>() {
            let px = to_px(num, &caps[3]);
            if px > *best {
                *best = px;
            }
        }
    }
}

/// Extracts the indent of a label cell in pixels.
///
/// Signals, all considered, largest taken:
/// 1. inline `padding-left`/`margin-left`/`text-indent` on the cell and every
///    styled descendant;
/// 2. stylesheet rules for the cell's classes (from [`build_css_indent_map`]);
/// 3. level-encoding class names, at [`PX_PER_LEVEL`] px per level;
/// 4. leading U+00A0 characters, at 4 px each.
pub fn extract_indent_px(cell: ElementRef<'_>, css_map: &HashMap<String, f64>) -> u32 {
    let mut best = 0.0_f64;

    for node in cell.descendants() {
        if let Some(el) = ElementRef::wrap(node) {
            if let Some(style) = el.value().attr("style") {
                apply_style(style, &mut best);
            }
        }
    }

    if let Some(classes) = cell.value().attr("class") {
        for class in classes.split_whitespace() {
            if let Some(px) = css_map.get(class) {
                if *px > best {
                    best = *px;
                }
            }
            if let Some(caps) = CLASS_LEVEL_RE.captures(class) {
                if let Ok(level) = caps[1].parse::<f64>() {
                    let px = level * PX_PER_LEVEL;
                    if px > best {
                        best = px;
                    }
                }
            }
        }
    }

    let raw: String = cell.text().collect();
    let mut nbsp = 0u32;
    for c in raw.chars() {
        match c {
            '\u{a0}' => nbsp += 1,
            ' ' => {}
            _ => break,
        }
    }
    if nbsp > 0 {
        let px = f64::from(nbsp) * PX_PER_NBSP;
        if px > best {
            best = px;
        }
    }

    best.round() as u32
}

/// Collects iXBRL concept names from a label cell's descendants.
///
/// EDGAR inline XBRL wraps labels in `ix:nonfraction`/`ix:nonnumeric`
/// elements (the prefix is sometimes dropped); their `name` attribute carries
/// the concept. Document order, de-duplicated.
pub fn extract_concepts(cell: ElementRef<'_>) -> Vec<String> {
    let mut out = Vec::new();
    for node in cell.descendants() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        let tag = el.value().name();
        let is_ix = tag.eq_ignore_ascii_case("ix:nonfraction")
            || tag.eq_ignore_ascii_case("ix:nonnumeric")
            || tag.eq_ignore_ascii_case("nonfraction")
            || tag.eq_ignore_ascii_case("nonnumeric");
        if !is_ix {
            continue;
        }
        if let Some(name) = el.value().attr("name") {
            if !out.iter().any(|c| c == name) {
                out.push(name.to_string());
            }
        }
    }
    out
}
