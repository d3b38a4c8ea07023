//! Pipeline configuration.
//!
//! Everything the pipeline needs to decide what to keep lives in
//! [`PipelineConfig`]: the keyword and publication lists, the feed URLs, the
//! scoring keyword sets, and the numeric caps. [`PipelineConfig::default`]
//! holds the built-in lists; a YAML file may override any subset of fields.
//!
//! ```yaml
//! keywords: ["Rust", "WebAssembly"]
//! feeds:
//!   - https://techcrunch.com/feed/
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

const KEYWORDS: &[&str] = &[
    "Github",
    "Anthropic",
    "Cursor",
    "Claude",
    "GPT",
    "OpenAI",
    "AI",
    "AWS",
    "Amazon",
    "Developers",
    "AI Agents",
    "Tariffs",
    "Global Affairs",
    "Microsoft",
    "Nvidia",
    "Technology",
    "Europe",
    "Computers",
    "Google Gemini",
    "RAG",
    "LLMs",
    "xAI",
    "Elon Musk",
    "ChatGPT",
    "Gemini",
    "Mistral",
    "Open Source AI",
];

const PUBLICATIONS: &[&str] = &[
    "TechCrunch",
    "Axios",
    "InformationWeek",
    "Time",
    "SiliconANGLE",
    "CNBC",
    "Quartz",
    "Wall Street Journal",
    "Eurasianet",
    "Fortune",
    "New York Times",
    "CBS News",
    "Politico",
    "Wired",
    "VentureBeat",
    "Bloomberg",
    "The Guardian",
    "BBC",
    "Deadline",
    "The Atlantic",
    "The Verge",
    "Vulture",
    "Reuters",
    "NPR",
    "The Information",
];

const FEEDS: &[&str] = &[
    "https://techcrunch.com/feed/",
    "http://www.axios.com/feeds/feed.rss",
    "https://feeds.feedburner.com/Informationweek-AllStories",
    "https://time.com/feed/",
    "https://siliconangle.com/feed/",
    "https://www.cnbc.com/id/100003114/device/rss/rss.html",
    "https://qz.com/rss",
    "https://www.wsj.com/xml/rss/3_7085.xml",
    "https://eurasianet.org/taxonomy/term/34/all/feed",
    "https://fortune.com/feed/",
    "https://rss.nytimes.com/services/xml/rss/nyt/Movies.xml",
    "https://www.cbsnews.com/latest/rss/",
    "http://rss.nytimes.com/services/xml/rss/nyt/Technology.xml",
    "http://www.politico.com/rss/politicopicks.xml",
    "https://rss.nytimes.com/services/xml/rss/nyt/World.xml",
    "http://feeds.nytimes.com/nyt/rss/HomePage",
    "http://feeds.wired.com/wired/index",
    "https://venturebeat.com/feed/",
    "https://www.bloomberg.com/feeds/bbizdaily.xml",
    "https://www.theguardian.com/world/rss",
    "http://feeds.bbci.co.uk/news/rss.xml",
    "https://deadline.com/feed/",
    "https://www.theatlantic.com/feed/all/",
    "https://www.theverge.com/rss/index.xml",
    "https://www.vulture.com/rss/",
    "https://www.reuters.com/rssFeed/topNews",
    "https://www.npr.org/rss/rss.php",
    "https://www.theinformation.com/rss",
];

const PRIORITY_SOURCES: &[&str] = &[
    "techcrunch.com",
    "cnbc.com",
    "axios.com",
    "siliconangle.com",
    "venturebeat.com",
];

const LAUNCH_KEYWORDS: &[&str] = &[
    "launch",
    "rolls out",
    "announces",
    "introduces",
    "unveils",
    "update",
    "beta",
    "developer preview",
    "api",
    "version",
    "preview",
];

const AI_ENTITY_KEYWORDS: &[&str] = &[
    "openai",
    "github",
    "gemini",
    "copilot",
    "gpt",
    "anthropic",
    "claude",
    "cursor",
    "microsoft",
    "xai",
    "perplexity",
    "deepmind",
    "hugging face",
    "rag",
];

const METRIC_KEYWORDS: &[&str] = &[
    "users", "weekly", "monthly", "million", "billion", "growth", "adoption", "usage",
];

const CONTROVERSY_KEYWORDS: &[&str] = &[
    "accused",
    "lawsuit",
    "ban",
    "block",
    "restrict",
    "scraping",
    "court",
    "investigation",
];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

/// Keyword sets and bonus rules used by [`crate::scoring::score_article`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Sources (exact domain match) that earn [`ScoringRules::source_bonus`].
    pub priority_sources: Vec<String>,
    pub source_bonus: u32,
    pub launch_keywords: Vec<String>,
    pub ai_entity_keywords: Vec<String>,
    pub metric_keywords: Vec<String>,
    pub controversy_keywords: Vec<String>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            priority_sources: owned(PRIORITY_SOURCES),
            source_bonus: 3,
            launch_keywords: owned(LAUNCH_KEYWORDS),
            ai_entity_keywords: owned(AI_ENTITY_KEYWORDS),
            metric_keywords: owned(METRIC_KEYWORDS),
            controversy_keywords: owned(CONTROVERSY_KEYWORDS),
        }
    }
}

impl ScoringRules {
    /// The four keyword families, in scoring order.
    pub fn keyword_sets(&self) -> [&[String]; 4] {
        [
            &self.launch_keywords,
            &self.ai_entity_keywords,
            &self.metric_keywords,
            &self.controversy_keywords,
        ]
    }
}

/// Immutable configuration passed into every pipeline run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// An entry qualifies if any of these appears in its title or summary.
    pub keywords: Vec<String>,
    /// An entry qualifies if its source domain contains any of these.
    pub publications: Vec<String>,
    /// Feed URLs, read in order.
    pub feeds: Vec<String>,
    pub scoring: ScoringRules,
    /// Qualifying articles collected per run before deduplication.
    pub max_candidates: usize,
    /// Articles kept after ranking.
    pub max_results: usize,
    pub min_content_chars: usize,
    pub max_content_chars: usize,
    /// Ratio above which two titles or two bodies count as the same story.
    pub similarity_threshold: f64,
    pub time_window_hours: u32,
    /// Window used for the single re-run when the first run is too thin.
    pub fallback_window_hours: u32,
    /// Fewer results than this triggers the fallback run.
    pub min_articles: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            keywords: owned(KEYWORDS),
            publications: owned(PUBLICATIONS),
            feeds: owned(FEEDS),
            scoring: ScoringRules::default(),
            max_candidates: 20,
            max_results: 15,
            min_content_chars: 100,
            max_content_chars: 8000,
            similarity_threshold: 0.7,
            time_window_hours: 24,
            fallback_window_hours: 36,
            min_articles: 5,
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML document; missing fields keep their defaults.
    pub fn from_yaml(yaml: &str, path: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })
    }

    /// Load the configuration from `path`, or the built-in defaults when no
    /// path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("Using built-in pipeline configuration");
            return Ok(Self::default());
        };
        let shown = path.display().to_string();
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: shown.clone(),
                source,
            })?;
        let config = Self::from_yaml(&yaml, &shown)?;
        info!(
            path = %shown,
            feeds = config.feeds.len(),
            keywords = config.keywords.len(),
            publications = config.publications.len(),
            "Loaded pipeline configuration"
        );
        Ok(config)
    }
}
