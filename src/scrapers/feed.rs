//! RSS/Atom feed reader.
//!
//! Handles RSS 2.0 and RSS 1.0 (`<item>`) as well as Atom (`<entry>`).
//! Only the fields the pipeline uses are extracted: title, link, summary and
//! publication date.

use crate::error::FeedError;
use crate::models::RawEntry;
use crate::utils::strip_html;
use chrono::{DateTime, SubsecRound, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::Client;
use tracing::{debug, info, instrument};

/// Download a feed and parse its entries.
///
/// # Errors
///
/// Returns [`FeedError::Http`] or [`FeedError::Status`] when the feed cannot be
/// downloaded, [`FeedError::Xml`] on malformed XML and
/// [`FeedError::NoEntries`] when the feed is empty.
#[instrument(level = "info", skip(client))]
pub async fn read_feed(client: &Client, url: &str) -> Result<Vec<RawEntry>, FeedError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Status(status));
    }
    let body = response.text().await?;
    let entries = parse_feed(&body)?;
    info!(count = entries.len(), "Parsed feed entries");
    Ok(entries)
}

/// Fields collected for the item currently being read.
#[derive(Default)]
struct EntryBuilder {
    title: String,
    link: String,
    alternate_link: Option<String>,
    summary: String,
    content: String,
    pub_date: String,
    published: String,
}

impl EntryBuilder {
    fn build(self) -> RawEntry {
        let summary_html = if self.summary.trim().is_empty() {
            self.content
        } else {
            self.summary
        };
        let link = self
            .alternate_link
            .unwrap_or(self.link)
            .trim()
            .to_string();
        let published = parse_timestamp(&self.pub_date).or_else(|| parse_timestamp(&self.published));
        RawEntry {
            title: strip_html(&self.title),
            summary: strip_html(&summary_html),
            link,
            published,
        }
    }

    fn push_text(&mut self, tag: &str, text: &str) {
        let field = match tag {
            "title" => &mut self.title,
            "link" => &mut self.link,
            "description" | "summary" => &mut self.summary,
            "content" | "content:encoded" => &mut self.content,
            "pubDate" => &mut self.pub_date,
            "published" | "dc:date" => &mut self.published,
            _ => return,
        };
        field.push_str(text);
    }

    /// Atom links carry the URL in `href`; prefer `rel="alternate"` (or no
    /// `rel`) over the first link seen.
    fn push_atom_link(&mut self, e: &BytesStart<'_>) {
        let mut href = None;
        let mut rel = None;
        for attr in e.attributes().flatten() {
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_default();
            match attr.key.as_ref() {
                b"href" => href = Some(value),
                b"rel" => rel = Some(value),
                _ => {}
            }
        }
        let Some(href) = href else { return };
        let is_alternate = rel.as_deref().is_none_or(|r| r == "alternate");
        if is_alternate && self.alternate_link.is_none() {
            self.alternate_link = Some(href);
        } else if self.link.is_empty() {
            self.link = href;
        }
    }
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Parse an RSS or Atom document into entries, in document order.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] if the XML is malformed,
/// [`FeedError::Truncated`] if the document ends inside an open element and
/// [`FeedError::NoEntries`] if it contains no items.
pub fn parse_feed(xml: &str) -> Result<Vec<RawEntry>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<EntryBuilder> = None;
    // Element names below the current item, innermost last.
    let mut path: Vec<String> = Vec::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                let name = tag_name(&e);
                match current.as_mut() {
                    None if name == "item" || name == "entry" => {
                        current = Some(EntryBuilder::default());
                        path.clear();
                    }
                    Some(builder) => {
                        if name == "link" && path.is_empty() {
                            builder.push_atom_link(&e);
                        }
                        path.push(name);
                    }
                    None => {}
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(builder) = current.as_mut() {
                    if path.is_empty() && e.name().as_ref() == b"link" {
                        builder.push_atom_link(&e);
                    }
                }
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);
                let name = e.name();
                if path.is_empty() {
                    if matches!(name.as_ref(), b"item" | b"entry") {
                        if let Some(builder) = current.take() {
                            entries.push(builder.build());
                        }
                    }
                } else {
                    path.pop();
                }
            }
            // Only direct children of the item count; nested `<source><title>`
            // or `<image><title>` belong to something else.
            Ok(Event::Text(e)) => {
                if let (Some(builder), [tag]) = (current.as_mut(), path.as_slice()) {
                    let text = e
                        .unescape()
                        .map(|t| t.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                    builder.push_text(tag, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(builder), [tag]) = (current.as_mut(), path.as_slice()) {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    builder.push_text(tag, &text);
                }
            }
            Ok(Event::Eof) if depth > 0 || current.is_some() => {
                return Err(FeedError::Truncated);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Xml(e)),
            _ => {}
        }
    }

    if entries.is_empty() {
        return Err(FeedError::NoEntries);
    }
    debug!(count = entries.len(), "Parsed feed document");
    Ok(entries)
}

/// Parse an RFC 2822 or RFC 3339 date, truncated to whole seconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|ts| ts.with_timezone(&Utc).trunc_subsecs(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>TechCrunch</title>
    <link>https://techcrunch.com</link>
    <item>
      <title>OpenAI launches a developer preview</title>
      <link>https://techcrunch.com/2026/10/16/openai-preview/</link>
      <description><![CDATA[<p>OpenAI said on <b>Thursday</b> it is opening a preview.</p>]]></description>
      <pubDate>Fri, 16 Oct 2026 08:30:00 +0000</pubDate>
    </item>
    <item>
      <title>Tariffs &amp; trade</title>
      <link>https://techcrunch.com/2026/10/16/tariffs/</link>
      <description>Markets react.</description>
    </item>
  </channel>
</rss>"#;

    const SAMPLE_ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>The Verge</title>
  <link rel="self" href="https://www.theverge.com/rss/index.xml"/>
  <entry>
    <title type="html">Microsoft ships Copilot update</title>
    <link rel="replies" href="https://www.theverge.com/comments/1"/>
    <link rel="alternate" type="text/html" href="https://www.theverge.com/2026/10/16/copilot"/>
    <published>2026-10-16T07:15:42.250-04:00</published>
    <updated>2026-10-16T09:00:00-04:00</updated>
    <content type="html">&lt;p&gt;Copilot gets a new mode.&lt;/p&gt;</content>
  </entry>
</feed>"#;

    #[test]
    fn test_parses_rss_items() {
        let entries = parse_feed(SAMPLE_RSS).expect("valid RSS");
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.title, "OpenAI launches a developer preview");
        assert_eq!(first.link, "https://techcrunch.com/2026/10/16/openai-preview/");
        assert_eq!(first.summary, "OpenAI said on Thursday it is opening a preview.");
        assert_eq!(
            first.published,
            Some(Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap())
        );

        let second = &entries[1];
        assert_eq!(second.title, "Tariffs & trade");
        assert_eq!(second.published, None);
    }

    #[test]
    fn test_parses_atom_entries() {
        let entries = parse_feed(SAMPLE_ATOM).expect("valid Atom");
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.title, "Microsoft ships Copilot update");
        assert_eq!(entry.link, "https://www.theverge.com/2026/10/16/copilot");
        assert_eq!(entry.summary, "Copilot gets a new mode.");
        assert_eq!(
            entry.published,
            Some(Utc.with_ymd_and_hms(2026, 10, 16, 11, 15, 42).unwrap())
        );
    }

    #[test]
    fn test_channel_fields_do_not_leak_into_items() {
        let entries = parse_feed(SAMPLE_RSS).unwrap();
        assert!(entries.iter().all(|e| e.title != "TechCrunch"));
    }

    #[test]
    fn test_empty_feed_is_no_entries() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>x</title></channel></rss>"#;
        assert!(matches!(parse_feed(xml), Err(FeedError::NoEntries)));
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        let xml = "<rss><channel><item><title>Broken</link></item></channel></rss>";
        assert!(matches!(parse_feed(xml), Err(FeedError::Xml(_))));
    }

    #[test]
    fn test_nested_atom_source_title_is_ignored() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>
            <title>Real headline</title>
            <link href="https://example.com/a"/>
            <source><title>Upstream Feed Name</title><id>urn:x</id></source>
            <published>2026-10-16T08:30:00Z</published>
        </entry></feed>"#;
        let entries = parse_feed(xml).unwrap();
        assert_eq!(entries[0].title, "Real headline");
        assert_eq!(entries[0].link, "https://example.com/a");
    }

    #[test]
    fn test_nested_rss_image_title_is_ignored() {
        let xml = r#"<rss version="2.0"><channel><item>
            <title>Headline</title>
            <image><title>Logo</title><link>https://example.com/logo.png</link></image>
            <link>https://example.com/story</link>
        </item></channel></rss>"#;
        let entries = parse_feed(xml).unwrap();
        assert_eq!(entries[0].title, "Headline");
        assert_eq!(entries[0].link, "https://example.com/story");
    }

    #[test]
    fn test_truncated_feed_is_rejected() {
        let xml = r#"<rss version="2.0"><channel>
            <item><title>Complete</title><link>https://example.com/1</link></item>
            <item><title>Cut off</title><link>https://exa"#;
        assert!(parse_feed(xml).is_err());

        let unclosed = r#"<rss version="2.0"><channel>
            <item><title>Complete</title><link>https://example.com/1</link></item>"#;
        assert!(matches!(parse_feed(unclosed), Err(FeedError::Truncated)));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap();
        assert_eq!(parse_timestamp("Fri, 16 Oct 2026 08:30:00 GMT"), Some(expected));
        assert_eq!(parse_timestamp("2026-10-16T08:30:00.999Z"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("  "), None);
    }

    #[tokio::test]
    async fn test_read_feed_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_RSS))
            .mount(&server)
            .await;

        let client = Client::new();
        let entries = read_feed(&client, &format!("{}/feed", server.uri()))
            .await
            .expect("feed should load");
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_read_feed_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = Client::new();
        let err = read_feed(&client, &format!("{}/feed", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Status(s) if s.as_u16() == 503));
    }
}
