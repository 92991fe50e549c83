pub mod types;
pub mod traits;
pub mod utils;
pub mod retry;
pub mod fetcher;
pub mod parser;
pub mod extract;
pub mod router;
pub mod filter;
pub mod scoring;
pub mod dedup;
pub mod dispatcher;
pub mod sink;

pub use types::*;
pub use traits::{ContentFetcher, ExtractionStrategy};
pub use retry::{LinearBackoff, RetryController};
pub use fetcher::HttpFetcher;
pub use parser::FeedParser;
pub use extract::{PageContext, StrategyChain};
pub use router::{Route, SiteRoute, SiteRouter};
pub use scoring::{RelevanceScorer, ScoringRule, ScoringRules};
pub use dispatcher::FetchDispatcher;
pub use sink::JsonFileSink;
