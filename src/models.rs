//! Data models flowing through the pipeline.
//!
//! - [`RawEntry`]: one item as read from an RSS/Atom feed
//! - [`Article`]: a qualifying entry with its full text, as written to
//!   `input.json`

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A feed item before any relevance filtering.
///
/// Missing text fields are empty strings. `published` is truncated to whole
/// seconds and is `None` when the feed gave no parseable date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub title: String,
    /// Plain-text summary, markup already stripped.
    pub summary: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
}

/// An article that survived filtering and content fetching.
///
/// Serialized as `{title, content, url, source, published}` for the
/// summarization step.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    /// Full text (or the feed summary as fallback), at most 8000 characters.
    pub content: String,
    pub url: String,
    /// Feed domain, lowercased, without a leading `www.`.
    pub source: String,
    /// RFC 3339 UTC timestamp with second precision.
    pub published: String,
}

impl Article {
    pub fn new(
        entry: &RawEntry,
        content: String,
        source: &str,
        published: DateTime<Utc>,
    ) -> Self {
        Self {
            title: entry.title.clone(),
            content,
            url: entry.link.clone(),
            source: source.to_string(),
            published: format_published(published),
        }
    }

    /// Character count of the content, as checked against the length limits.
    pub fn content_chars(&self) -> usize {
        self.content.chars().count()
    }
}

pub fn format_published(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
