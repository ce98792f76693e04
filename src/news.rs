//! News items: ordering, selection and headings.
//!
//! Items are listed newest first. The landing page shows the latest few,
//! `news.html` shows all of them under a count heading. Dates are written
//! as quoted ISO-8601 local date-times in `content.toml`:
//!
//! ```toml
//! [[news]]
//! date = "2021-09-14T22:00:00"
//! slug = "freerct_0_1_coming_soon"
//! title = "FreeRCT 0.1 Coming Soon"
//! body = "Expect the **first release 0.1** sometime soon!"
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewsItem {
    pub date: NaiveDateTime,
    /// Anchor id on the page and in `news.html#<slug>` links.
    pub slug: String,
    pub title: String,
    /// Markdown.
    pub body: String,
}

/// All items, newest first. Items with equal dates keep their file order.
pub fn newest_first(items: &[NewsItem]) -> Vec<&NewsItem> {
    let mut sorted: Vec<&NewsItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// The newest `count` items. `None`, or a count beyond the list, yields
/// everything.
pub fn latest(items: &[NewsItem], count: Option<usize>) -> Vec<&NewsItem> {
    let mut sorted = newest_first(items);
    if let Some(n) = count {
        sorted.truncate(n);
    }
    sorted
}

/// `1 news item`, `3 news items`.
pub fn count_heading(count: usize) -> String {
    if count == 1 {
        "1 news item".to_string()
    } else {
        format!("{count} news items")
    }
}

/// Timestamp shown under each item.
pub fn format_timestamp(date: &NaiveDateTime) -> String {
    date.format("%A, %-d %B %Y, %H:%M").to_string()
}
