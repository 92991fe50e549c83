use super::{element_text, href_of, selector, PageContext};
use crate::traits::ExtractionStrategy;
use crate::types::ContentItem;
use crate::utils::text;
use std::collections::HashSet;

const MIN_LINK_TEXT_CHARS: usize = 15;
const MAX_TITLE_CHARS: usize = 120;

/// Link texts that are site chrome rather than content.
const BLOCKLIST: &[&str] = &[
    "sign in",
    "subscribe",
    "log in",
    "login",
    "cookie",
    "privacy",
    "newsletter",
    "skip to",
];

/// Last resort: any anchor with headline-length text is treated as an item.
#[derive(Debug, Default)]
pub struct LinkHeuristicStrategy;

impl LinkHeuristicStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ExtractionStrategy for LinkHeuristicStrategy {
    fn name(&self) -> &'static str {
        "link-heuristic"
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<ContentItem> {
        let Some(anchors) = selector("a[href]") else {
            return Vec::new();
        };

        let mut items = Vec::new();
        let mut seen = HashSet::new();
        for anchor in page.document.select(&anchors) {
            if items.len() >= page.cap {
                break;
            }
            let label = element_text(anchor);
            if label.chars().count() < MIN_LINK_TEXT_CHARS {
                continue;
            }
            let lowered = label.to_lowercase();
            if BLOCKLIST.iter().any(|word| lowered.contains(word)) {
                continue;
            }
            let Some(link) = href_of(anchor).map(|h| page.resolve(h)).filter(|l| l.starts_with("http")) else {
                continue;
            };
            if link == page.source.url || !seen.insert(link.clone()) {
                continue;
            }
            let item = page.item(text::truncate_chars(&label, MAX_TITLE_CHARS), link);
            if page.accepts(&item) {
                items.push(item);
            }
        }
        items
    }
}
