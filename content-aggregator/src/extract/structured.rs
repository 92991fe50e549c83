use super::{selector, PageContext};
use crate::traits::ExtractionStrategy;
use crate::types::{ContentItem, Domain};
use crate::utils::text;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Reads `application/ld+json` blocks and keeps objects whose `@type`
/// belongs to the page's domain (articles, job postings or events).
#[derive(Debug, Default)]
pub struct StructuredDataStrategy;

impl StructuredDataStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ExtractionStrategy for StructuredDataStrategy {
    fn name(&self) -> &'static str {
        "structured-metadata"
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<ContentItem> {
        let Some(script_selector) = selector(r#"script[type="application/ld+json"]"#) else {
            return Vec::new();
        };

        let mut items = Vec::new();
        let mut seen = HashSet::new();

        for script in page.document.select(&script_selector) {
            let raw: String = script.text().collect();
            let value: Value = match serde_json::from_str(raw.trim()) {
                Ok(value) => value,
                Err(e) => {
                    debug!("Skipping malformed JSON-LD block on {}: {}", page.source.url, e);
                    continue;
                }
            };

            for object in flatten(&value) {
                if items.len() >= page.cap {
                    return items;
                }
                if !ld_types(object).iter().any(|t| page.domain.accepts_structured_type(t)) {
                    continue;
                }
                if let Some(item) = to_item(object, page) {
                    if page.accepts(&item) && seen.insert(item.url.clone()) {
                        items.push(item);
                    }
                }
            }
        }

        items
    }
}

/// Top-level arrays, `@graph` containers and `ItemList` entries all hold
/// candidate objects.
fn flatten(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(values) => values.iter().flat_map(flatten).collect(),
        Value::Object(map) => {
            if let Some(Value::Array(graph)) = map.get("@graph") {
                return graph.iter().flat_map(flatten).collect();
            }
            if let Some(Value::Array(elements)) = map.get("itemListElement") {
                return elements
                    .iter()
                    .flat_map(|element| flatten(element.get("item").unwrap_or(element)))
                    .collect();
            }
            vec![value]
        }
        _ => Vec::new(),
    }
}

fn ld_types(object: &Value) -> Vec<&str> {
    match object.get("@type") {
        Some(Value::String(t)) => vec![t.as_str()],
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn string_field(object: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .filter_map(Value::as_str)
        .map(text::strip_html)
        .find(|s| !s.is_empty())
}

/// `"Acme"`, `{"name": "Acme"}` or a list of either.
fn name_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(text::collapse_whitespace(s)).filter(|s| !s.is_empty()),
        Value::Object(_) => string_field(value, &["name"]),
        Value::Array(values) => values.iter().find_map(name_of),
        _ => None,
    }
}

fn address_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(text::collapse_whitespace(s)).filter(|s| !s.is_empty()),
        Value::Object(_) => string_field(value, &["addressLocality", "streetAddress", "name"]),
        Value::Array(values) => values.iter().find_map(address_of),
        _ => None,
    }
}

fn location_of(object: &Value, domain: Domain) -> Option<String> {
    match domain {
        Domain::Jobs => {
            let location = object.get("jobLocation")?;
            let location = match location {
                Value::Array(values) => values.first()?,
                other => other,
            };
            location.get("address").and_then(address_of).or_else(|| address_of(location))
        }
        Domain::Events => {
            let location = object.get("location")?;
            match location {
                Value::Object(_) => string_field(location, &["name"])
                    .or_else(|| location.get("address").and_then(address_of)),
                other => address_of(other),
            }
        }
        Domain::News => None,
    }
}

fn to_item(object: &Value, page: &PageContext<'_>) -> Option<ContentItem> {
    let title = string_field(object, &["headline", "name", "title"])?;
    let link = string_field(object, &["url", "@id"])
        .map(|href| page.resolve(&href))
        .filter(|link| !link.is_empty())?;

    let mut item = page.item(title, link);
    item.published_or_date = string_field(object, &["datePublished", "startDate", "datePosted"]).unwrap_or_default();
    item.organization = ["publisher", "organizer", "hiringOrganization", "author"]
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(name_of)
        .unwrap_or_default();
    item.summary_or_location = match page.domain {
        Domain::News => string_field(object, &["description"])
            .map(|d| text::summarize(&d))
            .unwrap_or_default(),
        domain => location_of(object, domain).unwrap_or_default(),
    };
    Some(item)
}
