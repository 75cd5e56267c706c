//! Slug generation and tag-name normalization.
//!
//! # Responsibility
//! - Turn Turkish display names into URL-safe slugs.
//! - Normalize user-entered tag names before bookkeeping.
//!
//! # Invariants
//! - Slugs only contain `[a-z0-9-]`, never start/end with `-` and never
//!   contain `--`.
//! - Tag deduplication is slug based: two spellings with the same slug are
//!   the same tag.
//! - Two date tags share a slug only if they resolve to the same year.

use crate::model::tag::TagKind;
use crate::timeline::extract_year;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug separator regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Builds a URL slug from a display name.
///
/// Turkish letters are folded to ASCII (`ş -> s`, `ı -> i`, ...), every other
/// run of non-alphanumeric characters becomes a single `-`.
/// Returns an empty string when nothing slug-worthy remains.
pub fn slugify(value: &str) -> String {
    let folded: String = value.chars().flat_map(fold_char).collect();
    let collapsed = NON_SLUG_RE.replace_all(&folded, "-");
    collapsed.trim_matches('-').to_string()
}

/// Returns whether `value` already has canonical slug shape.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty() && slugify(value) == value
}

/// Normalizes one tag display name.
///
/// Trims and collapses inner whitespace. Returns `None` for blank names or
/// names that produce an empty slug (e.g. only punctuation).
pub fn normalize_tag_name(name: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(name.trim(), " ");
    if collapsed.is_empty() || slugify(&collapsed).is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

/// Storage slug of a tag name.
///
/// General tags use [`slugify`]. Date tags with a readable year are keyed by
/// that year (`1700`, `mo-450`): ASCII folding would otherwise merge
/// `MÖ 450` with `MO 450` and drop the BCE marker. Date tags without a year
/// fall back to [`slugify`]; those slugs never contain digits, so they cannot
/// collide with year slugs.
pub fn tag_slug(name: &str, kind: TagKind) -> String {
    match kind {
        TagKind::Date => match extract_year(name) {
            Some(year) if year < 0 => format!("mo-{}", year.unsigned_abs()),
            Some(year) => year.to_string(),
            None => slugify(name),
        },
        TagKind::General => slugify(name),
    }
}

/// Normalizes and deduplicates tag display names of one kind.
///
/// The first spelling of each [`tag_slug`] wins and input order is kept.
pub fn normalize_tag_names<S: AsRef<str>>(names: &[S], kind: TagKind) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for name in names {
        if let Some(normalized) = normalize_tag_name(name.as_ref()) {
            if seen.insert(tag_slug(&normalized, kind)) {
                unique.push(normalized);
            }
        }
    }
    unique
}

fn fold_char(ch: char) -> Vec<char> {
    match ch {
        'ç' | 'Ç' => vec!['c'],
        'ğ' | 'Ğ' => vec!['g'],
        'ı' | 'I' | 'İ' | 'î' | 'Î' => vec!['i'],
        'ö' | 'Ö' => vec!['o'],
        'ş' | 'Ş' => vec!['s'],
        'ü' | 'Ü' | 'û' | 'Û' => vec!['u'],
        'â' | 'Â' => vec!['a'],
        other => other.to_lowercase().collect(),
    }
}
