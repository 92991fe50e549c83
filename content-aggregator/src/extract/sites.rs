//! Strategies for sites whose markup is known and stable enough to target
//! directly. The router picks one of these by host or explicit site key.

use super::{element_text, href_of, select_first, select_text, selector, PageContext};
use crate::traits::ExtractionStrategy;
use crate::types::ContentItem;
use crate::utils::url;
use std::collections::HashSet;

/// datacareer.ch / datacareer.de job listings.
#[derive(Debug, Default)]
pub struct DatacareerStrategy;

impl ExtractionStrategy for DatacareerStrategy {
    fn name(&self) -> &'static str {
        "datacareer"
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<ContentItem> {
        let Some(cards) = selector("article.listing-item") else {
            return Vec::new();
        };
        let source_name = url::extract_domain(&page.source.url).unwrap_or_else(|| "datacareer".to_string());

        let mut items = Vec::new();
        for card in page.document.select(&cards) {
            if items.len() >= page.cap {
                break;
            }
            let Some(title_link) = select_first(card, ".listing-item__title a.link") else {
                continue;
            };
            let title = element_text(title_link);
            if title.is_empty() {
                continue;
            }
            let link = href_of(title_link).map(|h| page.resolve(h)).unwrap_or_default();

            let mut item = page.item(title, link);
            item.source_name = source_name.clone();
            item.organization = select_text(card, ".listing-item__info--item-company");
            item.summary_or_location = select_text(card, ".listing-item__info--item-location");
            item.published_or_date = select_first(card, "time")
                .map(|t| t.value().attr("datetime").map(str::to_string).unwrap_or_else(|| element_text(t)))
                .unwrap_or_default();
            if page.accepts(&item) {
                items.push(item);
            }
        }
        items
    }
}

/// LinkedIn's public guest job search results.
#[derive(Debug, Default)]
pub struct LinkedInStrategy;

impl ExtractionStrategy for LinkedInStrategy {
    fn name(&self) -> &'static str {
        "linkedin"
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<ContentItem> {
        let Some(cards) = selector("li") else {
            return Vec::new();
        };

        let mut items = Vec::new();
        let mut seen = HashSet::new();
        for card in page.document.select(&cards) {
            if items.len() >= page.cap {
                break;
            }
            let title = select_text(card, ".base-search-card__title");
            if title.is_empty() {
                continue;
            }
            // Card links carry per-session tracking parameters.
            let link = select_first(card, "a.base-card__full-link, a.base-search-card__full-link")
                .and_then(href_of)
                .map(|h| url::strip_query(&page.resolve(h)))
                .unwrap_or_default();
            if !link.is_empty() && !seen.insert(link.clone()) {
                continue;
            }

            let mut item = page.item(title, link);
            item.source_name = "LinkedIn".to_string();
            item.organization = select_text(card, ".base-search-card__subtitle");
            item.summary_or_location = select_text(card, ".job-search-card__location");
            item.published_or_date = select_first(card, "time")
                .and_then(|t| t.value().attr("datetime").map(str::to_string))
                .unwrap_or_default();
            if page.accepts(&item) {
                items.push(item);
            }
        }
        items
    }
}

/// WikiCFP call-for-papers tables. Each event spans two rows: the first holds
/// the `showcfp` link and full name, the second its dates and location.
#[derive(Debug, Default)]
pub struct WikiCfpStrategy;

impl ExtractionStrategy for WikiCfpStrategy {
    fn name(&self) -> &'static str {
        "wikicfp"
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<ContentItem> {
        let (Some(row_selector), Some(cells)) = (selector("tr"), selector("td")) else {
            return Vec::new();
        };
        // Layout tables wrap the listing; only innermost rows are entries.
        let rows: Vec<_> = page
            .document
            .select(&row_selector)
            .filter(|row| select_first(*row, "table").is_none())
            .collect();

        let mut items = Vec::new();
        let mut seen = HashSet::new();
        for (i, row) in rows.iter().enumerate() {
            if items.len() >= page.cap {
                break;
            }
            let Some(anchor) = select_first(*row, r#"a[href*="showcfp"]"#) else {
                continue;
            };
            let Some(href) = href_of(anchor) else {
                continue;
            };
            let link = page.resolve(href);
            if !seen.insert(link.clone()) {
                continue;
            }

            let acronym = element_text(anchor);
            let full_name = row
                .select(&cells)
                .map(element_text)
                .find(|t| !t.is_empty() && *t != acronym)
                .unwrap_or_default();
            let title = match (acronym.is_empty(), full_name.is_empty()) {
                (false, false) => format!("{}: {}", acronym, full_name),
                (true, _) => full_name,
                (false, true) => acronym,
            };

            let details: Vec<String> = rows
                .get(i + 1)
                .map(|next| next.select(&cells).map(element_text).collect())
                .unwrap_or_default();

            let mut item = page.item(title, link);
            item.source_name = "WikiCFP".to_string();
            item.published_or_date = details.first().cloned().unwrap_or_default();
            item.summary_or_location = details.get(1).cloned().unwrap_or_default();
            if page.accepts(&item) {
                items.push(item);
            }
        }
        items
    }
}
