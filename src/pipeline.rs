//! The fetch → filter → deduplicate → score pipeline.
//!
//! # Flow
//!
//! 1. Read each configured feed in order; failed feeds are logged and skipped
//! 2. Drop entries that are stale, unlinked, off-topic or from untracked
//!    publications
//! 3. Fetch the full text of each remaining entry (feed summary on failure)
//!    and drop anything shorter than the minimum length
//! 4. Stop after `max_candidates` articles, deduplicate, rank, keep the top
//!    `max_results`
//!
//! Everything runs strictly one request at a time.

use crate::config::PipelineConfig;
use crate::dedup::deduplicate;
use crate::filter::{TimeWindow, qualify, source_domain};
use crate::models::{Article, RawEntry};
use crate::scoring::rank;
use crate::scrapers::article::{ContentOutcome, fetch_content};
use crate::scrapers::feed::read_feed;
use crate::utils::truncate_chars;
use chrono::{DateTime, Utc};
use futures::future;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

/// One complete pass of the pipeline over a given time window.
pub trait CurationRun {
    async fn run(&self, window_hours: u32) -> Vec<Article>;
}

/// Run with the primary window; if that yields fewer than `min_articles`,
/// run once more with the fallback window and return that result instead.
///
/// There is exactly one escalation. The second result replaces the first even
/// when it is still short, and the two are never merged.
///
/// # Arguments
///
/// * `runner` - The pass to execute; [`Pipeline`] in production
/// * `config` - Supplies the two window sizes and `min_articles`
///
/// # Returns
///
/// The ranked articles of the last pass that ran.
///
/// # Examples
///
/// ```ignore
/// let pipeline = Pipeline::new(client, PipelineConfig::default());
/// let articles = curate(&pipeline, pipeline.config()).await;
/// ```
#[instrument(level = "info", skip_all)]
pub async fn curate<R: CurationRun>(runner: &R, config: &PipelineConfig) -> Vec<Article> {
    let articles = runner.run(config.time_window_hours).await;
    if articles.len() >= config.min_articles {
        return articles;
    }
    info!(
        found = articles.len(),
        min_articles = config.min_articles,
        window_hours = config.fallback_window_hours,
        "Too few articles; expanding time window"
    );
    runner.run(config.fallback_window_hours).await
}

/// The live pipeline: feeds and articles fetched over HTTP.
#[derive(Debug)]
pub struct Pipeline {
    client: Client,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(client: Client, config: PipelineConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Collect up to `max_candidates` qualifying articles, in discovery order.
    ///
    /// Feeds are read lazily: once the cap is reached no further entries are
    /// fetched and no further feeds are requested.
    #[instrument(level = "info", skip_all, fields(since = %window.since))]
    pub async fn collect_candidates(&self, window: TimeWindow) -> Vec<Article> {
        let client = &self.client;
        let config = &self.config;

        stream::iter(config.feeds.iter())
            .then(move |feed_url| async move {
                info!(url = %feed_url, "Fetching feed");
                match read_feed(client, feed_url).await {
                    Ok(entries) => {
                        let source = source_domain(feed_url);
                        entries
                            .into_iter()
                            .map(|entry| (source.clone(), entry))
                            .collect()
                    }
                    Err(e) => {
                        warn!(url = %feed_url, error = %e, "Skipped feed");
                        Vec::new()
                    }
                }
            })
            .flat_map(stream::iter)
            .filter_map(move |(source, entry)| {
                let verdict = match qualify(&entry, &source, &window, config) {
                    Ok(published) => Some((source, entry, published)),
                    Err(reason) => {
                        debug!(title = %entry.title, %reason, "Entry rejected");
                        None
                    }
                };
                future::ready(verdict)
            })
            .then(move |(source, entry, published)| async move {
                let text = match fetch_content(client, &entry.link, &entry.summary).await {
                    ContentOutcome::Extracted(text) => text,
                    ContentOutcome::Fallback { summary, reason } => {
                        warn!(url = %entry.link, error = %reason, "Failed to scrape article; using feed summary");
                        summary
                    }
                };
                build_article(&entry, text, &source, published, config)
            })
            .filter_map(future::ready)
            .take(config.max_candidates)
            .collect()
            .await
    }
}

impl CurationRun for Pipeline {
    #[instrument(level = "info", skip(self))]
    async fn run(&self, window_hours: u32) -> Vec<Article> {
        let window = TimeWindow::ending_at(Utc::now(), window_hours);
        let candidates = self.collect_candidates(window).await;
        info!(count = candidates.len(), "Collected qualifying articles");

        let unique = deduplicate(candidates, self.config.similarity_threshold);
        info!(count = unique.len(), "Deduplicated articles");

        rank(unique, &self.config.scoring, self.config.max_results)
    }
}

/// Apply the length limits to fetched text and build the output record.
fn build_article(
    entry: &RawEntry,
    text: String,
    source: &str,
    published: DateTime<Utc>,
    config: &PipelineConfig,
) -> Option<Article> {
    let chars = text.chars().count();
    if chars < config.min_content_chars {
        debug!(title = %entry.title, chars, "Content too short; dropping");
        return None;
    }
    let content = truncate_chars(&text, config.max_content_chars).to_string();
    Some(Article::new(entry, content, source, published))
}
