use super::{element_text, href_of, select_first, select_text, selector, PageContext};
use crate::traits::ExtractionStrategy;
use crate::types::{ContentItem, Domain};
use crate::utils::text;
use scraper::ElementRef;
use std::collections::HashSet;
use tracing::debug;

/// Titles shorter than this are navigation chrome, not content.
const MIN_TITLE_CHARS: usize = 5;

/// Walks the domain's container selectors in order. The first selector that
/// matches any element on the page is the only one used.
#[derive(Debug, Default)]
pub struct GenericStructureStrategy;

impl GenericStructureStrategy {
    pub fn new() -> Self {
        Self
    }

    fn card(&self, card: ElementRef<'_>, page: &PageContext<'_>) -> Option<ContentItem> {
        let heading = select_first(card, "h1, h2, h3, h4");
        let anchor = heading
            .and_then(|h| select_first(h, "a[href]"))
            .or_else(|| select_first(card, "a[href]"))
            .or_else(|| card.value().attr("href").and(Some(card)));

        let title = heading
            .map(element_text)
            .filter(|t| !t.is_empty())
            .or_else(|| anchor.map(element_text))
            .unwrap_or_default();
        if title.chars().count() < MIN_TITLE_CHARS {
            return None;
        }

        let link = anchor.and_then(href_of).map(|h| page.resolve(h)).unwrap_or_default();
        let mut item = page.item(title, link);
        item.card_text = element_text(card);

        item.published_or_date = select_first(card, "time")
            .map(|t| t.value().attr("datetime").map(str::to_string).unwrap_or_else(|| element_text(t)))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| select_text(card, ".date, .event-date"));

        match page.domain {
            Domain::News => {
                item.summary_or_location = select_first(card, "p")
                    .map(|p| text::summarize(&element_text(p)))
                    .unwrap_or_default();
            }
            Domain::Jobs => {
                item.summary_or_location = select_text(card, ".location, .job-location, address");
                item.organization = select_text(card, ".company, .employer");
            }
            Domain::Events => {
                let location = select_text(card, ".location, .venue, address");
                item.summary_or_location = if location.is_empty() { "TBD".to_string() } else { location };
                item.organization = select_text(card, ".organizer, .host");
            }
        }
        Some(item)
    }
}

impl ExtractionStrategy for GenericStructureStrategy {
    fn name(&self) -> &'static str {
        "generic-structure"
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<ContentItem> {
        for css in page.domain.container_selectors() {
            let Some(sel) = selector(css) else {
                continue;
            };
            let cards: Vec<_> = page.document.select(&sel).collect();
            if cards.is_empty() {
                continue;
            }
            debug!("Selector {:?} matched {} containers on {}", css, cards.len(), page.source.url);

            let mut items = Vec::new();
            let mut seen = HashSet::new();
            for card in cards {
                if items.len() >= page.cap {
                    break;
                }
                let Some(item) = self.card(card, page) else {
                    continue;
                };
                if !item.url.is_empty() && !seen.insert(item.url.clone()) {
                    continue;
                }
                if page.accepts(&item) {
                    items.push(item);
                }
            }
            return items;
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SourceDescriptor, SourceKind};
    use scraper::Html;

    fn run(html: &str, domain: Domain, cap: usize) -> Vec<ContentItem> {
        let document = Html::parse_document(html);
        let source = SourceDescriptor::new("https://example.com/section/", SourceKind::Html);
        let page = PageContext::new(&document, &source, domain, cap);
        GenericStructureStrategy::new().extract(&page)
    }

    #[test]
    fn news_cards_from_first_matching_selector() {
        let html = r#"<main>
            <article><h2><a href="/a">Parliament passes budget</a></h2>
              <time datetime="2025-03-02T09:00:00Z">Mar 2</time><p>Lawmakers approved it.</p></article>
            <article><h2><a href="/b">Ok</a></h2></article>
            <div class="card"><h3><a href="/c">Card never consulted</a></h3></div>
        </main>"#;

        let items = run(html, Domain::News, 10);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Parliament passes budget");
        assert_eq!(items[0].url, "https://example.com/a");
        assert_eq!(items[0].published_or_date, "2025-03-02T09:00:00Z");
        assert_eq!(items[0].summary_or_location, "Lawmakers approved it.");
        assert_eq!(items[0].category_or_type, "general");
    }

    #[test]
    fn event_cards_default_location() {
        let html = r#"<div class="event-card"><h3>Rust Meetup Zurich</h3><a href="/e/1">details</a>
              <span class="date">2025-04-10</span></div>
            <div class="event-card"><h3>Data Night</h3><a href="/e/2">details</a>
              <span class="venue">Impact Hub</span></div>"#;

        let items = run(html, Domain::Events, 10);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].published_or_date, "2025-04-10");
        assert_eq!(items[0].summary_or_location, "TBD");
        assert_eq!(items[1].summary_or_location, "Impact Hub");
        assert_eq!(items[1].url, "https://example.com/e/2");
    }

    #[test]
    fn job_cards_respect_cap() {
        let cards: String = (0..30)
            .map(|i| format!(r#"<div class="job-card"><h3><a href="/j/{i}">Backend Engineer {i}</a></h3><span class="company">Initech</span></div>"#))
            .collect();

        let items = run(&cards, Domain::Jobs, 20);

        assert_eq!(items.len(), 20);
        assert_eq!(items[0].organization, "Initech");
    }

    #[test]
    fn pages_without_containers_yield_nothing() {
        assert!(run("<p>Just text</p>", Domain::News, 10).is_empty());
    }

    #[test]
    fn cards_keep_their_full_text() {
        let html = r#"<div class="job-card"><h3><a href="/j/1">Data Scientist</a></h3>
            <span class="meta">Zurich · Hybrid</span></div>"#;

        let items = run(html, Domain::Jobs, 10);

        assert_eq!(items[0].summary_or_location, "");
        assert_eq!(items[0].card_text, "Data Scientist Zurich · Hybrid");
    }
}
