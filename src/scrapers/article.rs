//! Full-text article fetcher.
//!
//! Downloads the page behind a feed entry and pulls out the body paragraphs.
//! Failure is not fatal: the caller gets a [`ContentOutcome::Fallback`]
//! carrying the feed summary and the reason the page could not be used.

use crate::error::ContentError;
use crate::utils::collapse_whitespace;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

/// Containers tried in order; the first one holding any paragraph text wins.
static CONTAINERS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "[itemprop=articleBody] p",
        "article p",
        "main p",
        "p",
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("valid selector"))
    .collect()
});

/// Result of trying to get the full text of an article.
#[derive(Debug)]
pub enum ContentOutcome {
    /// Text extracted from the article page.
    Extracted(String),
    /// The page could not be used; `summary` is the feed-provided text.
    Fallback {
        summary: String,
        reason: ContentError,
    },
}

/// Fetch the article at `url`, falling back to `summary` on any failure.
#[instrument(level = "info", skip(client, summary))]
pub async fn fetch_content(client: &Client, url: &str, summary: &str) -> ContentOutcome {
    match fetch_article_text(client, url).await {
        Ok(text) => {
            debug!(chars = text.chars().count(), "Extracted article text");
            ContentOutcome::Extracted(text)
        }
        Err(reason) => ContentOutcome::Fallback {
            summary: summary.to_string(),
            reason,
        },
    }
}

async fn fetch_article_text(client: &Client, url: &str) -> Result<String, ContentError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ContentError::Status(status));
    }
    let body = response.text().await?;
    extract_text(&body).ok_or(ContentError::Empty)
}

/// Extract the body text of an HTML page.
///
/// Paragraphs are whitespace-collapsed and joined with blank lines. Returns
/// `None` when the page has no paragraph text at all.
pub fn extract_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    CONTAINERS.iter().find_map(|selector| {
        let paragraphs: Vec<String> = document
            .select(selector)
            .map(|p| collapse_whitespace(&p.text().collect::<String>()))
            .filter(|p| !p.is_empty())
            .collect();
        (!paragraphs.is_empty()).then(|| paragraphs.join("\n\n"))
    })
}
