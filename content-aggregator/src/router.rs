use crate::extract::{
    DatacareerStrategy, GenericStructureStrategy, LinkHeuristicStrategy, LinkedInStrategy, StrategyChain,
    StructuredDataStrategy, WikiCfpStrategy,
};
use crate::parser::FeedParser;
use crate::traits::ExtractionStrategy;
use crate::types::{ContentItem, Domain, SourceDescriptor, SourceKind};

/// A site-specific strategy and how sources are matched to it.
pub struct SiteRoute {
    /// Explicit key a source may carry in `category_or_site`.
    pub key: &'static str,
    /// Host fragment matched against the source URL.
    pub host_pattern: &'static str,
    pub strategy: Box<dyn ExtractionStrategy>,
}

/// How one source's payload will be turned into items.
pub enum Route<'a> {
    Feed(&'a FeedParser),
    Page(StrategyChain<'a>),
}

impl<'a> Route<'a> {
    pub fn describe(&self) -> String {
        match self {
            Route::Feed(_) => "feed".to_string(),
            Route::Page(chain) => chain.strategy_names().join(" -> "),
        }
    }

    pub fn extract(&self, raw: &str, source: &SourceDescriptor, domain: Domain, cap: usize) -> Vec<ContentItem> {
        match self {
            Route::Feed(parser) => parser.extract(raw, source, domain, cap),
            Route::Page(chain) => chain.extract(raw, source, domain, cap),
        }
    }
}

/// Immutable table deciding the extraction path for each source. Built once
/// and shared read-only by all workers.
pub struct SiteRouter {
    feed: FeedParser,
    structured: StructuredDataStrategy,
    generic: GenericStructureStrategy,
    links: LinkHeuristicStrategy,
    sites: Vec<SiteRoute>,
}

impl SiteRouter {
    pub fn new() -> Self {
        Self::with_sites(vec![
            SiteRoute {
                key: "datacareer",
                host_pattern: "datacareer.",
                strategy: Box::new(DatacareerStrategy),
            },
            SiteRoute {
                key: "linkedin",
                host_pattern: "linkedin.com",
                strategy: Box::new(LinkedInStrategy),
            },
            SiteRoute {
                key: "wikicfp",
                host_pattern: "wikicfp.com",
                strategy: Box::new(WikiCfpStrategy),
            },
        ])
    }

    pub fn with_sites(sites: Vec<SiteRoute>) -> Self {
        Self {
            feed: FeedParser::new(),
            structured: StructuredDataStrategy::new(),
            generic: GenericStructureStrategy::new(),
            links: LinkHeuristicStrategy::new(),
            sites,
        }
    }

    /// Explicit site key wins over the URL host.
    pub fn site_for(&self, source: &SourceDescriptor) -> Option<&SiteRoute> {
        let key = source.category_or_site.trim();
        if !key.is_empty() {
            if let Some(site) = self.sites.iter().find(|s| s.key.eq_ignore_ascii_case(key)) {
                return Some(site);
            }
        }
        let host = url::Url::parse(source.url.trim())
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))?;
        self.sites.iter().find(|s| host.contains(s.host_pattern))
    }

    /// Feeds go to the feed parser. Everything else (html and api payloads)
    /// runs the HTML chain with the site strategy slotted in after
    /// structured metadata.
    pub fn route(&self, source: &SourceDescriptor) -> Route<'_> {
        if source.kind == SourceKind::Feed {
            return Route::Feed(&self.feed);
        }

        let mut chain: Vec<&dyn ExtractionStrategy> = vec![&self.structured];
        if let Some(site) = self.site_for(source) {
            chain.push(site.strategy.as_ref());
        }
        chain.push(&self.generic);
        chain.push(&self.links);
        Route::Page(StrategyChain::new(chain))
    }
}

impl Default for SiteRouter {
    fn default() -> Self {
        Self::new()
    }
}
