//! Error types for each stage of the pipeline.
//!
//! Feed and content errors are recoverable: the pipeline logs them and moves
//! on. Config and output errors are not, and bubble up to `main`.

use reqwest::StatusCode;
use thiserror::Error;

/// Why a feed was skipped.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed returned HTTP {0}")]
    Status(StatusCode),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("feed document ends before its root element is closed")]
    Truncated,

    #[error("feed contains no entries")]
    NoEntries,
}

/// Why the full text of an article could not be used.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("article returned HTTP {0}")]
    Status(StatusCode),

    #[error("no article text found in page")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
