use crate::filter;
use crate::types::{AggregatorError, ContentItem, Domain, ParsedEntry, ParsedFeed, Result, SourceDescriptor};
use crate::utils::text;
use feed_rs::parser;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// RSS/Atom/JSON Feed parsing. Feed sources bypass the HTML strategy chain
/// and come straight here.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_feed(&self, content: &str) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let mut seen_guids = HashSet::new();
        let mut seen_urls = HashSet::new();
        let mut entries = Vec::new();

        for entry in feed.entries {
            if let Some(parsed_entry) = Self::parse_entry(entry, &mut seen_guids, &mut seen_urls) {
                entries.push(parsed_entry);
            }
        }

        debug!("Parsed feed with {} entries", entries.len());
        Ok(ParsedFeed { title, entries })
    }

    fn parse_entry(
        entry: feed_rs::model::Entry,
        seen_guids: &mut HashSet<String>,
        seen_urls: &mut HashSet<String>,
    ) -> Option<ParsedEntry> {
        let title = entry
            .title
            .map(|t| text::strip_html(&t.content))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string());

        let url = entry.links.first().map(|l| l.href.clone()).unwrap_or_default();

        let guid = if entry.id.is_empty() { None } else { Some(entry.id.clone()) };
        if let Some(ref guid) = guid {
            if !seen_guids.insert(guid.clone()) {
                debug!("Skipping duplicate entry with GUID: {}", guid);
                return None;
            }
        }
        if !url.is_empty() && !seen_urls.insert(url.clone()) {
            debug!("Skipping duplicate entry with URL: {}", url);
            return None;
        }

        // Summary first; full content only when the feed has no summary.
        let description = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body));

        Some(ParsedEntry {
            guid,
            url,
            title,
            description,
            author: entry.authors.first().map(|a| a.name.clone()),
            published_at: entry.published.or(entry.updated),
            tags: entry.categories.into_iter().map(|c| c.term).collect(),
        })
    }

    /// Parse `content` and convert the first `cap` entries passing the source
    /// filters, in feed order.
    /// Unparsable payloads yield an empty list.
    pub fn extract(&self, content: &str, source: &SourceDescriptor, domain: Domain, cap: usize) -> Vec<ContentItem> {
        let parsed = match self.parse_feed(content) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Skipping feed {}: {}", source.url, e);
                return Vec::new();
            }
        };

        let source_name = parsed
            .title
            .as_deref()
            .map(text::collapse_whitespace)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| source.url.clone());
        let category = domain.item_category(source);

        let items: Vec<ContentItem> = parsed
            .entries
            .into_iter()
            .map(|entry| ContentItem {
                title: entry.title,
                url: entry.url,
                source_name: source_name.clone(),
                category_or_type: category.clone(),
                published_or_date: entry.published_at.map(|d| d.to_rfc3339()).unwrap_or_default(),
                summary_or_location: entry.description.as_deref().map(text::summarize).unwrap_or_default(),
                organization: entry.author.unwrap_or_default(),
                score: None,
                match_reasons: Vec::new(),
                card_text: String::new(),
            })
            .filter(|item| filter::matches(&source.filters, item))
            .take(cap)
            .collect();

        info!("Parsed {} items from feed {}", items.len(), source.url);
        items
    }

    pub fn is_valid_feed_content(content: &str) -> bool {
        let content_lower = content.to_lowercase();

        let has_feed_indicators = content_lower.contains("<rss")
            || content_lower.contains("<feed")
            || content_lower.contains("<rdf:rdf")
            || content_lower.contains("<channel");

        has_feed_indicators || content.trim_start().starts_with("{\"version\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SourceFilters, SourceKind};

    fn rss_with(n: usize) -> String {
        let items: String = (1..=n)
            .map(|i| {
                format!(
                    "<item><title>Story {i}</title><link>https://example.com/{i}</link>\
                     <guid>story-{i}</guid><description>&lt;p&gt;Body {i}&lt;/p&gt;</description>\
                     <pubDate>Mon, 01 Jan 2024 10:00:00 GMT</pubDate></item>"
                )
            })
            .collect();
        format!(
            "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>Example News</title>\
             <link>https://example.com</link><description>x</description>{items}</channel></rss>"
        )
    }

    fn feed_source() -> SourceDescriptor {
        SourceDescriptor::new("https://example.com/rss", SourceKind::Feed).with_category("tech")
    }

    #[test]
    fn caps_items_in_feed_order() {
        let items = FeedParser::new().extract(&rss_with(15), &feed_source(), Domain::News, 10);

        assert_eq!(items.len(), 10);
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles.first(), Some(&"Story 1"));
        assert_eq!(titles.last(), Some(&"Story 10"));
        assert!(items.iter().all(|i| i.source_name == "Example News"));
        assert!(items.iter().all(|i| i.category_or_type == "tech"));
    }

    #[test]
    fn keyword_filter_reaches_entries_past_the_cap() {
        let source = feed_source().with_filters(SourceFilters {
            keywords: vec!["story 14".to_string(), "Story 15".to_string()],
            location: String::new(),
        });

        let items = FeedParser::new().extract(&rss_with(15), &source, Domain::News, 10);

        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Story 14", "Story 15"]);
    }

    #[test]
    fn summaries_are_stripped_of_markup() {
        let items = FeedParser::new().extract(&rss_with(1), &feed_source(), Domain::News, 10);
        assert_eq!(items[0].summary_or_location, "Body 1");
        assert!(!items[0].published_or_date.is_empty());
    }

    #[test]
    fn garbage_payload_yields_empty_list() {
        let items = FeedParser::new().extract("<html>not a feed", &feed_source(), Domain::News, 10);
        assert!(items.is_empty());
    }

    #[test]
    fn duplicate_guids_are_skipped() {
        let xml = "<rss version=\"2.0\"><channel><title>T</title>\
                   <item><title>A</title><link>https://e.com/a</link><guid>same</guid></item>\
                   <item><title>B</title><link>https://e.com/b</link><guid>same</guid></item>\
                   </channel></rss>";
        let parsed = FeedParser::new().parse_feed(xml).unwrap();
        assert_eq!(parsed.entries.len(), 1);
    }

    #[test]
    fn detects_feed_payloads() {
        assert!(FeedParser::is_valid_feed_content(&rss_with(1)));
        assert!(!FeedParser::is_valid_feed_content("<html><body></body></html>"));
    }
}
