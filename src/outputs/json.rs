//! JSON output for the summarization step.
//!
//! The shortlist is written as a pretty-printed JSON array of
//! [`Article`] objects, replacing any previous file.

use crate::error::OutputError;
use crate::models::Article;
use crate::utils::ensure_parent_dir;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Write `articles` to `path`, creating the parent directory if needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_articles(articles: &[Article], path: &Path) -> Result<(), OutputError> {
    ensure_parent_dir(path).await?;
    let json = serde_json::to_string_pretty(articles)?;
    fs::write(path, json).await?;
    info!(count = articles.len(), "Wrote article shortlist");
    Ok(())
}
