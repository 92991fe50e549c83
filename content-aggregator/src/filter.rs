use crate::types::{ContentItem, SourceFilters};
use crate::utils::text;

/// Whether `item` passes a source's location and keyword filters.
/// Empty filters accept everything.
pub fn matches(filters: &SourceFilters, item: &ContentItem) -> bool {
    let location = filters.location.trim();
    let location_ok = location.is_empty()
        || text::contains_ci(&item.summary_or_location, location)
        || text::contains_ci(&item.title, location)
        || text::contains_ci(&item.organization, location);

    location_ok
        && (filters.keywords.is_empty()
            || filters
                .keywords
                .iter()
                .any(|k| text::contains_ci(&item.title, k) || text::contains_ci(&item.summary_or_location, k)))
}
