//! Date-tag year extraction and per-topic year resolution.
//!
//! The parser is a heuristic over Turkish display names. It is lossy on
//! purpose: anything it cannot read contributes no year instead of failing.
//!
//! # Rules
//! - BCE when the folded name contains `m.ö` or `mö`.
//! - Base numeral is the first run of ASCII digits.
//! - `yüzyıl` / `yy` turns the numeral `N` into the century start `(N - 1) * 100`.
//! - BCE negates the result.

use once_cell::sync::Lazy;
use regex::Regex;

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digits regex"));

const BCE_MARKERS: [&str; 2] = ["m.ö", "mö"];
// Compared against folded text, so the dotless `ı` of "yüzyıl" is already `i`.
const CENTURY_MARKERS: [&str; 2] = ["yüzyil", "yy"];

/// Extracts a signed year from a date-tag display name.
///
/// Returns `None` when the name has no digits (including century phrases
/// without a numeral) or the numeral does not fit a signed 64-bit year.
pub fn extract_year(name: &str) -> Option<i64> {
    let numeral: i64 = DIGITS_RE.find(name)?.as_str().parse().ok()?;
    let folded = fold_case(name);

    let year = if CENTURY_MARKERS.iter().any(|marker| folded.contains(marker)) {
        numeral.checked_sub(1)?.checked_mul(100)?
    } else {
        numeral
    };

    if BCE_MARKERS.iter().any(|marker| folded.contains(marker)) {
        Some(-year)
    } else {
        Some(year)
    }
}

/// Picks the effective timeline year of one topic.
///
/// An explicit override always wins and no tag is parsed. Otherwise the
/// earliest year among the parseable date tags is used. `None` means the
/// topic stays off the timeline.
pub fn resolve_year<'a, I>(year_override: Option<i64>, date_tag_names: I) -> Option<i64>
where
    I: IntoIterator<Item = &'a str>,
{
    if year_override.is_some() {
        return year_override;
    }
    date_tag_names.into_iter().filter_map(extract_year).min()
}

fn fold_case(value: &str) -> String {
    let mut folded = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            'ı' | 'I' | 'İ' => folded.push('i'),
            other => folded.extend(other.to_lowercase()),
        }
    }
    folded
}
