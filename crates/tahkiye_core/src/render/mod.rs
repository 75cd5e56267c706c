//! Server-side HTML rendering of derived views.

pub mod timeline_html;

pub use timeline_html::{escape_html, render_timeline, TimelineHtml};
