use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub use interfaces::defs::{ContentItem, InterestProfile, ItemSink, SourceDescriptor, SourceFilters, SourceKind};

/// Summaries longer than this are cut after HTML stripping.
pub const MAX_SUMMARY_LENGTH: usize = 200;

/// Which acquisition pipeline a run belongs to. Each domain carries its own
/// selectors, structured-metadata types, scoring and ranking rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    #[default]
    News,
    Jobs,
    Events,
}

/// Final ordering applied by the ranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    ScoreDescending,
    NewestFirst,
    Chronological,
}

impl Domain {
    pub fn is_scored(&self) -> bool {
        matches!(self, Domain::Jobs | Domain::Events)
    }

    pub fn ranking(&self) -> Ranking {
        match self {
            Domain::News => Ranking::NewestFirst,
            Domain::Jobs => Ranking::ScoreDescending,
            Domain::Events => Ranking::Chronological,
        }
    }

    /// Label written into `category_or_type` for items of this domain.
    pub fn item_category(&self, source: &SourceDescriptor) -> String {
        match self {
            Domain::News if source.category_or_site.trim().is_empty() => "general".to_string(),
            Domain::News => source.category_or_site.trim().to_string(),
            Domain::Jobs => "job".to_string(),
            Domain::Events => "event".to_string(),
        }
    }

    /// Container selectors for the generic structural strategy, most specific first.
    pub fn container_selectors(&self) -> &'static [&'static str] {
        match self {
            Domain::News => &[
                "article", ".story", ".card", ".teaser", ".news-item", ".post", ".entry",
            ],
            Domain::Jobs => &[
                ".listing-item", ".job-listing", ".job-card", ".posting", "li.result", "article", "[data-job]",
            ],
            Domain::Events => &[".event-card", ".event", "article", ".listing", "[data-event]"],
        }
    }

    /// Whether a JSON-LD `@type` describes content of this domain.
    pub fn accepts_structured_type(&self, ld_type: &str) -> bool {
        match self {
            Domain::News => {
                matches!(
                    ld_type,
                    "Article" | "NewsArticle" | "BlogPosting" | "Report" | "TechArticle" | "ScholarlyArticle"
                ) || ld_type.contains("Article")
                    || ld_type.contains("News")
            }
            Domain::Jobs => ld_type.ends_with("JobPosting"),
            Domain::Events => ld_type.ends_with("Event"),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::News => "news",
            Domain::Jobs => "jobs",
            Domain::Events => "events",
        };
        f.write_str(name)
    }
}

impl FromStr for Domain {
    type Err = AggregatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "news" | "rss" => Ok(Domain::News),
            "jobs" | "job" => Ok(Domain::Jobs),
            "events" | "event" => Ok(Domain::Events),
            other => Err(AggregatorError::General(format!("unknown domain: {other}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_redirects: usize,
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            timeout_seconds: 30,
            max_redirects: 5,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Bounded linear retry: attempt `n` (1-based) that fails waits `base_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub domain: Domain,
    pub max_items_per_source: usize,
    pub worker_pool_size: usize,
    pub retry: RetryPolicy,
}

impl PipelineConfig {
    pub fn for_domain(domain: Domain) -> Self {
        Self {
            domain,
            ..Self::default()
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            domain: Domain::News,
            max_items_per_source: 10,
            worker_pool_size: 6,
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug)]
pub struct ParsedEntry {
    pub guid: Option<String>,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Response body exceeds limit: {size} bytes")]
    BodyTooLarge { size: usize },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid source: {0}")]
    InvalidSource(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
