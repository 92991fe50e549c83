use crate::extract::PageContext;
use crate::types::{ContentItem, Result};
use async_trait::async_trait;

/// Retrieves the raw payload behind a source URL. One call is one attempt;
/// retrying is the caller's concern.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// One way of turning a parsed page into items.
///
/// Implementations must not fail: an empty vector means "nothing found here"
/// and lets the chain move on to the next strategy.
pub trait ExtractionStrategy: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    fn extract(&self, page: &PageContext<'_>) -> Vec<ContentItem>;
}
