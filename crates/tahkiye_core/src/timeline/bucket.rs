//! Century bucketing and labels.
//!
//! # Invariants
//! - Bucket key is `floor(year / 100) * 100`; negative years floor toward
//!   negative infinity (`-450 -> -500`, never `-400`).
//! - Output buckets are strictly descending by key.
//! - Items inside a bucket keep their input order.

use std::collections::BTreeMap;

const CENTURY: i64 = 100;

/// Returns the century bucket key of `year`.
pub fn century_key(year: i64) -> i64 {
    year.div_euclid(CENTURY).saturating_mul(CENTURY)
}

/// Human-readable range label of a bucket key.
///
/// `1900 -> "1900 – 1999"`, `-500 -> "M.Ö. 500 – 599"`.
pub fn century_label(key: i64) -> String {
    if key >= 0 {
        format!("{key} – {}", key.saturating_add(CENTURY - 1))
    } else {
        format!(
            "M.Ö. {} – {}",
            key.unsigned_abs(),
            key.saturating_sub(CENTURY - 1).unsigned_abs()
        )
    }
}

/// Groups `(year, item)` pairs by century, most recent century first.
pub fn group_by_century<T, I>(items: I) -> Vec<(i64, Vec<T>)>
where
    I: IntoIterator<Item = (i64, T)>,
{
    let mut buckets: BTreeMap<i64, Vec<T>> = BTreeMap::new();
    for (year, item) in items {
        buckets.entry(century_key(year)).or_default().push(item);
    }
    buckets.into_iter().rev().collect()
}
