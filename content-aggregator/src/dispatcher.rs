use crate::dedup;
use crate::fetcher::HttpFetcher;
use crate::retry::RetryController;
use crate::router::SiteRouter;
use crate::scoring::RelevanceScorer;
use crate::traits::ContentFetcher;
use crate::types::{
    AggregatorError, ContentItem, FetchConfig, InterestProfile, PipelineConfig, Result, SourceDescriptor, SourceKind,
};
use crate::utils::url;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runs every configured source through fetch, extraction and scoring on a
/// bounded pool of workers, then hands the collected batches to the merger.
#[derive(Clone)]
pub struct FetchDispatcher {
    fetcher: Arc<dyn ContentFetcher>,
    router: Arc<SiteRouter>,
    retry: RetryController,
    scorer: Option<Arc<RelevanceScorer>>,
    config: PipelineConfig,
}

impl FetchDispatcher {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        router: Arc<SiteRouter>,
        config: PipelineConfig,
        profile: &InterestProfile,
    ) -> Self {
        Self {
            fetcher,
            router,
            retry: RetryController::new(config.retry),
            scorer: RelevanceScorer::for_domain(config.domain, profile).map(Arc::new),
            config,
        }
    }

    /// Dispatcher backed by a real HTTP client and the default site table.
    pub fn with_http(fetch_config: FetchConfig, config: PipelineConfig, profile: &InterestProfile) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(fetch_config)?);
        Ok(Self::new(fetcher, Arc::new(SiteRouter::new()), config, profile))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self, sources: &[SourceDescriptor]) -> Vec<ContentItem> {
        if sources.is_empty() {
            info!("No sources configured");
            return Vec::new();
        }
        let workers = self.config.worker_pool_size.max(1);
        info!(
            "Fetching {} {} sources with {} workers",
            sources.len(),
            self.config.domain,
            workers
        );

        // One slot per source; a worker is spawned only when the pool has room.
        let mut slots: Vec<(usize, Vec<ContentItem>)> = stream::iter(sources.iter().cloned().enumerate())
            .map(|(index, source)| {
                let worker = self.clone();
                async move {
                    let url = source.url.clone();
                    let items = match tokio::spawn(async move { worker.fetch_source(&source).await }).await {
                        Ok(items) => items,
                        Err(e) => {
                            warn!("Worker for {} aborted: {}", url, e);
                            Vec::new()
                        }
                    };
                    (index, items)
                }
            })
            .buffer_unordered(workers)
            .collect()
            .await;

        slots.sort_by_key(|(index, _)| *index);
        let contributing = slots.iter().filter(|(_, items)| !items.is_empty()).count();
        let batches: Vec<Vec<ContentItem>> = slots.into_iter().map(|(_, items)| items).collect();

        let merged = dedup::merge(batches, self.config.domain.ranking());
        info!(
            "Collected {} items from {}/{} sources",
            merged.len(),
            contributing,
            sources.len()
        );
        merged
    }

    /// Everything that happens to one source. Never fails: problems are
    /// logged and the source contributes nothing.
    pub async fn fetch_source(&self, source: &SourceDescriptor) -> Vec<ContentItem> {
        if let Err(e) = validate_source(source) {
            warn!("Skipping source: {}", e);
            return Vec::new();
        }

        let route = self.router.route(source);
        debug!("Routing {} via {}", source.url, route.describe());

        let fetcher = &self.fetcher;
        let target = source.url.trim();
        let Some(raw) = self.retry.execute(target, || fetcher.fetch(target)).await else {
            return Vec::new();
        };

        // Source filters apply during extraction; the cap counts matching items only.
        let mut items = route.extract(&raw, source, self.config.domain, self.config.max_items_per_source);
        if items.is_empty() {
            warn!("No items extracted from {}", source.url);
            return items;
        }

        if let Some(scorer) = &self.scorer {
            for item in &mut items {
                scorer.apply(item);
            }
        }

        info!("Source {} contributed {} items", source.url, items.len());
        items
    }
}

fn validate_source(source: &SourceDescriptor) -> Result<()> {
    let target = source.url.trim();
    if target.is_empty() {
        return Err(AggregatorError::InvalidSource("empty URL".to_string()));
    }
    if !url::is_valid_source_url(target) {
        return Err(AggregatorError::InvalidSource(format!("not an http(s) URL: {}", target)));
    }
    if source.kind == SourceKind::Unknown {
        return Err(AggregatorError::InvalidSource(format!("unsupported source type for {}", target)));
    }
    Ok(())
}
