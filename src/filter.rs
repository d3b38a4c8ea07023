//! Relevance filter: decides which feed entries are worth fetching.

use crate::config::PipelineConfig;
use crate::models::RawEntry;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use url::Url;

/// Why an entry was not considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoTimestamp,
    Stale,
    FromFuture,
    NoLink,
    InvalidLink,
    NoKeyword,
    UnknownPublication,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::NoTimestamp => "no publication date",
            Rejection::Stale => "outside time window",
            Rejection::FromFuture => "dated in the future",
            Rejection::NoLink => "no link",
            Rejection::InvalidLink => "link is not an absolute http(s) URL",
            Rejection::NoKeyword => "no keyword match",
            Rejection::UnknownPublication => "publication not tracked",
        };
        f.write_str(reason)
    }
}

/// The freshness window `[since, now]` for one run.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindow {
    pub since: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

impl TimeWindow {
    pub fn ending_at(now: DateTime<Utc>, hours: u32) -> Self {
        Self {
            since: now - Duration::hours(i64::from(hours)),
            now,
        }
    }
}

/// Check one entry against the window, keywords and publications.
///
/// Checks run in a fixed order and the first failure wins: timestamp,
/// window, link, keywords, publication.
///
/// # Arguments
///
/// * `entry` - The parsed feed entry
/// * `source` - Domain of the feed the entry came from (see [`source_domain`])
/// * `window` - The `[since, now]` freshness window of this run
/// * `config` - Keyword and publication lists
///
/// # Returns
///
/// The entry's publication time, or the [`Rejection`] explaining why it was
/// skipped.
///
/// # Examples
///
/// ```ignore
/// let window = TimeWindow::ending_at(Utc::now(), 24);
/// match qualify(&entry, "techcrunch.com", &window, &config) {
///     Ok(published) => println!("keep, published {published}"),
///     Err(reason) => println!("skip: {reason}"),
/// }
/// ```
pub fn qualify(
    entry: &RawEntry,
    source: &str,
    window: &TimeWindow,
    config: &PipelineConfig,
) -> Result<DateTime<Utc>, Rejection> {
    let published = entry.published.ok_or(Rejection::NoTimestamp)?;
    if published < window.since {
        return Err(Rejection::Stale);
    }
    if published > window.now {
        return Err(Rejection::FromFuture);
    }
    let link = entry.link.trim();
    if link.is_empty() {
        return Err(Rejection::NoLink);
    }
    if !is_web_link(link) {
        return Err(Rejection::InvalidLink);
    }
    if !matches_keyword(&entry.title, &entry.summary, &config.keywords) {
        return Err(Rejection::NoKeyword);
    }
    if !matches_publication(source, &config.publications) {
        return Err(Rejection::UnknownPublication);
    }
    Ok(published)
}

/// True if `link` is an absolute `http` or `https` URL.
pub fn is_web_link(link: &str) -> bool {
    Url::parse(link).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// True if any keyword appears (case-insensitively) in the title or summary.
pub fn matches_keyword(title: &str, summary: &str, keywords: &[String]) -> bool {
    let title = title.to_lowercase();
    let summary = summary.to_lowercase();
    keywords.iter().any(|kw| {
        let kw = kw.to_lowercase();
        title.contains(&kw) || summary.contains(&kw)
    })
}

/// True if the source domain contains any publication name.
pub fn matches_publication(source: &str, publications: &[String]) -> bool {
    let source = source.to_lowercase();
    publications
        .iter()
        .any(|publication| source.contains(&publication.to_lowercase()))
}

/// Domain an article is attributed to: the feed URL's authority, lowercased,
/// without a leading `www.`.
///
/// ```ignore
/// assert_eq!(source_domain("https://www.cnbc.com/id/1/rss.html"), "cnbc.com");
/// ```
pub fn source_domain(feed_url: &str) -> String {
    let authority = match Url::parse(feed_url) {
        Ok(url) => match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => raw_authority(feed_url).to_string(),
        },
        Err(_) => raw_authority(feed_url).to_string(),
    };
    let authority = authority.to_lowercase();
    match authority.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => authority,
    }
}

fn raw_authority(url: &str) -> &str {
    let after_scheme = url.rsplit("//").next().unwrap_or(url);
    after_scheme.split('/').next().unwrap_or(after_scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn entry(hours_ago: i64) -> RawEntry {
        RawEntry {
            title: "Nvidia reports record quarter".to_string(),
            summary: "Chip demand keeps climbing.".to_string(),
            link: "https://techcrunch.com/nvidia".to_string(),
            published: Some(now() - Duration::hours(hours_ago)),
        }
    }

    #[test]
    fn test_source_domain() {
        assert_eq!(source_domain("https://techcrunch.com/feed/"), "techcrunch.com");
        assert_eq!(
            source_domain("https://www.cnbc.com/id/100003114/device/rss/rss.html"),
            "cnbc.com"
        );
        assert_eq!(source_domain("http://feeds.bbci.co.uk/news/rss.xml"), "feeds.bbci.co.uk");
        assert_eq!(source_domain("https://WWW.TheVerge.com/rss"), "theverge.com");
        assert_eq!(source_domain("http://127.0.0.1:8080/feed"), "127.0.0.1:8080");
    }

    #[test]
    fn test_source_domain_only_strips_leading_www() {
        assert_eq!(source_domain("https://news.www.example.com/rss"), "news.www.example.com");
    }

    #[test]
    fn test_source_domain_unparseable_url() {
        assert_eq!(source_domain("techcrunch.com/feed"), "techcrunch.com");
    }

    #[test]
    fn test_qualifying_entry() {
        let config = PipelineConfig::default();
        let window = TimeWindow::ending_at(now(), 24);
        let published = qualify(&entry(2), "techcrunch.com", &window, &config).unwrap();
        assert_eq!(published, now() - Duration::hours(2));
    }

    #[test]
    fn test_rejections() {
        let config = PipelineConfig::default();
        let window = TimeWindow::ending_at(now(), 24);

        let mut undated = entry(1);
        undated.published = None;
        assert_eq!(
            qualify(&undated, "techcrunch.com", &window, &config),
            Err(Rejection::NoTimestamp)
        );

        assert_eq!(
            qualify(&entry(25), "techcrunch.com", &window, &config),
            Err(Rejection::Stale)
        );
        assert_eq!(
            qualify(&entry(-1), "techcrunch.com", &window, &config),
            Err(Rejection::FromFuture)
        );

        let mut unlinked = entry(1);
        unlinked.link = String::new();
        assert_eq!(
            qualify(&unlinked, "techcrunch.com", &window, &config),
            Err(Rejection::NoLink)
        );

        let mut relative = entry(1);
        relative.link = "/2026/10/16/nvidia".to_string();
        assert_eq!(
            qualify(&relative, "techcrunch.com", &window, &config),
            Err(Rejection::InvalidLink)
        );

        let mut scripted = entry(1);
        scripted.link = "javascript:alert(1)".to_string();
        assert_eq!(
            qualify(&scripted, "techcrunch.com", &window, &config),
            Err(Rejection::InvalidLink)
        );

        let mut off_topic = entry(1);
        off_topic.title = "Local bakery wins prize".to_string();
        off_topic.summary = "Bread was involved.".to_string();
        assert_eq!(
            qualify(&off_topic, "techcrunch.com", &window, &config),
            Err(Rejection::NoKeyword)
        );

        assert_eq!(
            qualify(&entry(1), "example.org", &window, &config),
            Err(Rejection::UnknownPublication)
        );
    }

    #[test]
    fn test_is_web_link() {
        assert!(is_web_link("https://techcrunch.com/story"));
        assert!(is_web_link("http://127.0.0.1:8080/a"));
        assert!(!is_web_link("ftp://example.com/file"));
        assert!(!is_web_link("mailto:news@example.com"));
        assert!(!is_web_link("example.com/story"));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let config = PipelineConfig::default();
        let window = TimeWindow::ending_at(now(), 24);
        assert!(qualify(&entry(24), "techcrunch.com", &window, &config).is_ok());
        assert!(qualify(&entry(0), "techcrunch.com", &window, &config).is_ok());
    }

    #[test]
    fn test_wider_window_accepts_older_entries() {
        let config = PipelineConfig::default();
        let window = TimeWindow::ending_at(now(), 36);
        assert!(qualify(&entry(30), "techcrunch.com", &window, &config).is_ok());
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_and_checks_summary() {
        let keywords = vec!["OpenAI".to_string()];
        assert!(matches_keyword("openai news", "", &keywords));
        assert!(matches_keyword("News", "An OPENAI update", &keywords));
        assert!(!matches_keyword("News", "Nothing here", &keywords));
    }

    #[test]
    fn test_publication_match_is_substring() {
        let publications = vec!["TechCrunch".to_string(), "BBC".to_string()];
        assert!(matches_publication("techcrunch.com", &publications));
        assert!(matches_publication("feeds.bbci.co.uk", &publications));
        assert!(!matches_publication("wsj.com", &publications));
    }
}
