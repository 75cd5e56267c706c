//! Timeline HTML view.
//!
//! # Responsibility
//! - Render century sections with one card per topic.
//! - Link cards to topic detail, category search and tag search pages.
//!
//! # Invariants
//! - All user-controlled text is HTML-escaped.
//! - An empty timeline renders an explicit empty state, never an empty page.

use crate::timeline::{CenturyBucket, Timeline, TimelineCard};
use std::fmt::{self, Display, Formatter};

const EMPTY_STATE_TEXT: &str = "Zaman tünelinde gösterilecek konu bulunamadı.";

/// Renders the timeline as an HTML fragment.
pub fn render_timeline(timeline: &Timeline) -> String {
    TimelineHtml(timeline).to_string()
}

/// HTML view of a timeline, written straight into any formatter.
pub struct TimelineHtml<'a>(pub &'a Timeline);

impl Display for TimelineHtml<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let timeline = self.0;
        writeln!(f, "<div class=\"timeline\">")?;
        if timeline.is_empty() {
            writeln!(
                f,
                "  <p class=\"timeline-empty\">{}</p>",
                escape_html(EMPTY_STATE_TEXT)
            )?;
        }
        for bucket in &timeline.buckets {
            write_bucket(f, bucket)?;
        }
        writeln!(f, "</div>")
    }
}

fn write_bucket(f: &mut Formatter<'_>, bucket: &CenturyBucket) -> fmt::Result {
    writeln!(
        f,
        "  <section class=\"timeline-century\" data-century=\"{}\">",
        bucket.key
    )?;
    writeln!(f, "    <h2>{}</h2>", escape_html(&bucket.label))?;
    writeln!(f, "    <ul>")?;
    for card in &bucket.cards {
        write_card(f, card)?;
    }
    writeln!(f, "    </ul>")?;
    writeln!(f, "  </section>")
}

fn write_card(f: &mut Formatter<'_>, card: &TimelineCard) -> fmt::Result {
    writeln!(f, "      <li class=\"timeline-card\">")?;
    writeln!(
        f,
        "        <a class=\"timeline-title\" href=\"/konu/{}\">{}</a>",
        escape_html(&card.slug),
        escape_html(&card.title)
    )?;
    writeln!(
        f,
        "        <span class=\"timeline-year\">{}</span>",
        escape_html(&format_year(card.year))
    )?;
    for category in &card.categories {
        writeln!(
            f,
            "        <a class=\"timeline-category\" href=\"/ara?kategori={}\">{}</a>",
            escape_html(&category.slug),
            escape_html(&category.name)
        )?;
    }
    for tag in &card.tags {
        writeln!(
            f,
            "        <a class=\"timeline-tag\" href=\"/ara?etiket={}\">#{}</a>",
            escape_html(&tag.slug),
            escape_html(&tag.name)
        )?;
    }
    writeln!(f, "      </li>")
}

/// Display form of a signed year: `1923`, `M.Ö. 450`.
pub fn format_year(year: i64) -> String {
    if year < 0 {
        format!("M.Ö. {}", year.unsigned_abs())
    } else {
        year.to_string()
    }
}

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
