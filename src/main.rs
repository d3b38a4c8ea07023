//! # newsreel
//!
//! Curates a shortlist of tech news for downstream summarization. Reads a
//! fixed set of RSS/Atom feeds, keeps fresh on-topic entries from tracked
//! publications, pulls the full article text, drops near-duplicate stories,
//! ranks what is left by topical signal and writes the top articles to
//! `data/input.json`.
//!
//! ## Usage
//!
//! ```sh
//! newsreel
//! RUST_LOG=debug newsreel --output ./data/input.json
//! ```
//!
//! ## Architecture
//!
//! The pipeline runs strictly in sequence:
//! 1. **Feed Reader**: download and parse each feed ([`scrapers::feed`])
//! 2. **Relevance Filter**: time window, keywords, publications ([`filter`])
//! 3. **Content Fetcher**: full article text, feed summary as fallback
//!    ([`scrapers::article`])
//! 4. **Deduplicator + Ranker**: [`dedup`] then [`scoring`]
//!
//! A run over the last 24 hours that yields fewer than 5 articles is
//! replaced by one run over the last 36 hours.

use clap::Parser;
use std::collections::BTreeSet;
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dedup;
mod error;
mod filter;
mod models;
mod outputs;
mod pipeline;
mod scoring;
mod scrapers;
mod utils;

use cli::Cli;
use config::PipelineConfig;
use models::Article;
use outputs::json;
use pipeline::{Pipeline, curate};
use utils::truncate_for_log;

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newsreel starting up");

    let args = Cli::parse();
    debug!(?args.output, ?args.config, args.timeout_secs, "Parsed CLI arguments");

    let config = PipelineConfig::load(args.config.as_deref()).await?;
    let client = scrapers::http_client(args.timeout())?;
    let pipeline = Pipeline::new(client, config);

    let articles = curate(&pipeline, pipeline.config()).await;

    report(&articles);
    json::write_articles(&articles, &args.output).await?;
    info!(path = %args.output.display(), "Saved input for summarization");

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(())
}

/// Log the final shortlist: one line per article plus source coverage.
fn report(articles: &[Article]) {
    info!(count = articles.len(), "Final articles");
    for article in articles {
        info!(
            title = %truncate_for_log(&article.title, 120),
            published = %article.published,
            source = %article.source,
            chars = article.content_chars(),
            "Selected article"
        );
    }
    let sources: BTreeSet<&str> = articles.iter().map(|a| a.source.as_str()).collect();
    info!(distinct = sources.len(), sources = ?sources, "Source coverage");
}
