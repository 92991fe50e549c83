//! HTML extraction strategies and the chain that runs them.
//!
//! A page is parsed once and handed to each strategy in priority order:
//! structured metadata, then the site-specific strategy (when the router found
//! one), then generic container selectors, then the link heuristic. The first
//! strategy producing any item wins and later ones are never consulted.

pub mod generic;
pub mod links;
pub mod sites;
pub mod structured;

pub use generic::GenericStructureStrategy;
pub use links::LinkHeuristicStrategy;
pub use sites::{DatacareerStrategy, LinkedInStrategy, WikiCfpStrategy};
pub use structured::StructuredDataStrategy;

use crate::filter;
use crate::traits::ExtractionStrategy;
use crate::types::{ContentItem, Domain, SourceDescriptor};
use crate::utils::{text, url};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Everything a strategy may look at for one fetched page.
pub struct PageContext<'a> {
    pub document: &'a Html,
    pub source: &'a SourceDescriptor,
    pub domain: Domain,
    pub cap: usize,
    category: String,
}

impl<'a> PageContext<'a> {
    pub fn new(document: &'a Html, source: &'a SourceDescriptor, domain: Domain, cap: usize) -> Self {
        Self {
            document,
            source,
            domain,
            cap,
            category: domain.item_category(source),
        }
    }

    /// Blank item attributed to this page's source.
    pub fn item(&self, title: String, link: String) -> ContentItem {
        ContentItem {
            title,
            url: link,
            source_name: url::source_name(&self.source.url),
            category_or_type: self.category.clone(),
            published_or_date: String::new(),
            summary_or_location: String::new(),
            organization: String::new(),
            score: None,
            match_reasons: Vec::new(),
            card_text: String::new(),
        }
    }

    /// Whether `item` passes the source's filters. Strategies only keep
    /// accepted items, so `cap` counts matches.
    pub fn accepts(&self, item: &ContentItem) -> bool {
        filter::matches(&self.source.filters, item)
    }

    /// Resolve an href found on this page.
    pub fn resolve(&self, href: &str) -> String {
        url::resolve(&self.source.url, href)
    }
}

/// Ordered list of strategies; stops at the first non-empty result.
pub struct StrategyChain<'a> {
    strategies: Vec<&'a dyn ExtractionStrategy>,
}

impl<'a> StrategyChain<'a> {
    pub fn new(strategies: Vec<&'a dyn ExtractionStrategy>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn run(&self, page: &PageContext<'_>) -> Vec<ContentItem> {
        for strategy in &self.strategies {
            let mut items = strategy.extract(page);
            items.retain(|item| !item.title.trim().is_empty() && page.accepts(item));
            items.truncate(page.cap);

            if !items.is_empty() {
                debug!(
                    "Strategy {} produced {} items for {}",
                    strategy.name(),
                    items.len(),
                    page.source.url
                );
                return items;
            }
            debug!("Strategy {} found nothing on {}", strategy.name(), page.source.url);
        }
        Vec::new()
    }

    /// Parse raw HTML and run the chain over it.
    pub fn extract(&self, raw: &str, source: &SourceDescriptor, domain: Domain, cap: usize) -> Vec<ContentItem> {
        let document = Html::parse_document(raw);
        let page = PageContext::new(&document, source, domain, cap);
        self.run(&page)
    }
}

pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            warn!("Invalid selector {:?}: {}", css, e);
            None
        }
    }
}

pub(crate) fn select_first<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    element.select(&sel).next()
}

/// Visible text of an element, whitespace collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    text::collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

pub(crate) fn select_text(element: ElementRef<'_>, css: &str) -> String {
    select_first(element, css).map(element_text).unwrap_or_default()
}

pub(crate) fn href_of(element: ElementRef<'_>) -> Option<&str> {
    element.value().attr("href").map(str::trim).filter(|h| !h.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SourceFilters, SourceKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        name: &'static str,
        count: usize,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(name: &'static str, count: usize) -> Self {
            Self {
                name,
                count,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ExtractionStrategy for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn extract(&self, page: &PageContext<'_>) -> Vec<ContentItem> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (0..self.count)
                .map(|i| page.item(format!("{} item {}", self.name, i), format!("https://example.com/{i}")))
                .collect()
        }
    }

    #[test]
    fn chain_stops_at_first_non_empty_strategy() {
        let empty = Fixed::new("empty", 0);
        let first = Fixed::new("first", 2);
        let never = Fixed::new("never", 5);
        let strategies: Vec<&dyn ExtractionStrategy> = vec![&empty, &first, &never];
        let chain = StrategyChain::new(strategies);
        let source = SourceDescriptor::new("https://example.com", SourceKind::Html);

        let items = chain.extract("<html></html>", &source, Domain::News, 10);

        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.title.starts_with("first")));
        assert_eq!(empty.calls.load(Ordering::SeqCst), 1);
        assert_eq!(never.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn chain_truncates_to_cap() {
        let many = Fixed::new("many", 30);
        let strategies: Vec<&dyn ExtractionStrategy> = vec![&many];
        let chain = StrategyChain::new(strategies);
        let source = SourceDescriptor::new("https://example.com", SourceKind::Html);

        assert_eq!(chain.extract("", &source, Domain::News, 20).len(), 20);
    }

    #[test]
    fn exhausted_chain_returns_empty() {
        let chain = StrategyChain::new(Vec::new());
        let source = SourceDescriptor::new("https://example.com", SourceKind::Html);

        assert!(chain.extract("<p>hi</p>", &source, Domain::Events, 10).is_empty());
    }

    #[test]
    fn chain_drops_items_rejected_by_source_filters() {
        let many = Fixed::new("many", 12);
        let strategies: Vec<&dyn ExtractionStrategy> = vec![&many];
        let chain = StrategyChain::new(strategies);
        let source = SourceDescriptor::new("https://example.com", SourceKind::Html).with_filters(SourceFilters {
            keywords: vec!["item 1".to_string()],
            location: String::new(),
        });

        let titles: Vec<_> = chain
            .extract("", &source, Domain::News, 10)
            .into_iter()
            .map(|i| i.title)
            .collect();

        assert_eq!(titles, vec!["many item 1", "many item 10", "many item 11"]);
    }
}
