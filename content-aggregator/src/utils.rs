/// Text processing utilities
pub mod text {
    use crate::types::MAX_SUMMARY_LENGTH;
    use scraper::Html;

    /// Collapse runs of whitespace into single spaces and trim the ends.
    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Dedup key for titles: case-folded with internal whitespace collapsed.
    pub fn normalize_title(title: &str) -> String {
        collapse_whitespace(&title.to_lowercase())
    }

    /// Strip tags and decode entities, leaving collapsed plain text.
    pub fn strip_html(html: &str) -> String {
        if !html.contains('<') && !html.contains('&') {
            return collapse_whitespace(html);
        }
        let fragment = Html::parse_fragment(html);
        let text: String = fragment.root_element().text().collect();
        collapse_whitespace(&text)
    }

    /// Cut to at most `max_chars` characters without splitting a code point.
    pub fn truncate_chars(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((idx, _)) => text[..idx].trim_end().to_string(),
            None => text.to_string(),
        }
    }

    /// Plain-text summary capped at `MAX_SUMMARY_LENGTH`.
    pub fn summarize(html: &str) -> String {
        truncate_chars(&strip_html(html), MAX_SUMMARY_LENGTH)
    }

    /// Case-insensitive substring match. Empty needles never match.
    pub fn contains_ci(haystack: &str, needle: &str) -> bool {
        let needle = needle.trim();
        !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// URL utilities
pub mod url {
    use url::Url;

    /// Validate that a source URL is absolute http(s).
    pub fn is_valid_source_url(url_str: &str) -> bool {
        match Url::parse(url_str.trim()) {
            Ok(url) => url.scheme() == "http" || url.scheme() == "https",
            Err(_) => false,
        }
    }

    /// Extract host from URL, without a leading `www.`
    pub fn extract_domain(url_str: &str) -> Option<String> {
        let url = Url::parse(url_str).ok()?;
        let host = url.host_str()?;
        Some(host.trim_start_matches("www.").to_string())
    }

    /// Human-friendly source name: `https://www.nytimes.com/...` -> `Nytimes`.
    pub fn source_name(url_str: &str) -> String {
        let Some(domain) = extract_domain(url_str) else {
            return url_str.to_string();
        };
        let label = domain.split('.').next().unwrap_or(&domain);
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
            None => domain.clone(),
        }
    }

    /// Resolve `href` against the page it was found on. Absolute links pass
    /// through; unresolvable ones become empty.
    pub fn resolve(base: &str, href: &str) -> String {
        let href = href.trim();
        if href.is_empty() {
            return String::new();
        }
        if href.starts_with("http://") || href.starts_with("https://") {
            return href.to_string();
        }
        Url::parse(base)
            .and_then(|b| b.join(href))
            .map(|u| u.to_string())
            .unwrap_or_default()
    }

    /// Drop query string and fragment (tracking parameters on job links).
    pub fn strip_query(link: &str) -> String {
        link.split(['?', '#']).next().unwrap_or(link).to_string()
    }
}

/// Time utilities
pub mod time {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    /// Best-effort parse of the date strings feeds and listings carry.
    /// Anything unparsable sorts as "missing".
    pub fn parse_loose(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(naive.and_utc());
            }
        }
        for fmt in ["%Y-%m-%d", "%d.%m.%Y", "%b %d, %Y", "%B %d, %Y", "%d %B %Y", "%d %b %Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
                return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
            }
        }
        // Ranges such as "Jun 1, 2025 - Jun 3, 2025" sort by their start.
        match raw.split_once(" - ") {
            Some((start, _)) => parse_loose(start),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_title_folds_case_and_whitespace() {
        assert_eq!(text::normalize_title(" Senior  Engineer "), "senior engineer");
        assert_eq!(text::normalize_title("senior\tengineer\n"), "senior engineer");
    }

    #[test]
    fn strip_html_decodes_entities() {
        assert_eq!(text::strip_html("<p>Fish &amp; <b>chips</b></p>"), "Fish & chips");
        assert_eq!(text::strip_html("plain   text"), "plain text");
    }

    #[test]
    fn summarize_caps_length() {
        let long = "word ".repeat(100);
        assert!(text::summarize(&long).chars().count() <= crate::types::MAX_SUMMARY_LENGTH);
    }

    #[test]
    fn contains_ci_ignores_empty_needles() {
        assert!(text::contains_ci("Data Scientist – Fintech", "data scientist"));
        assert!(!text::contains_ci("anything", "  "));
    }

    #[test]
    fn source_name_is_title_cased_first_label() {
        assert_eq!(url::source_name("https://www.nytimes.com/section/world"), "Nytimes");
        assert_eq!(url::source_name("https://heise.de/news"), "Heise");
    }

    #[test]
    fn resolve_joins_relative_links() {
        assert_eq!(
            url::resolve("https://example.com/news/", "/story/1"),
            "https://example.com/story/1"
        );
        assert_eq!(url::resolve("https://example.com/", "https://other.org/x"), "https://other.org/x");
        assert_eq!(url::resolve("not a url", "/x"), "");
    }

    #[test]
    fn strip_query_drops_tracking() {
        assert_eq!(
            url::strip_query("https://ch.linkedin.com/jobs/view/123?refId=abc&trk=x"),
            "https://ch.linkedin.com/jobs/view/123"
        );
    }

    #[test]
    fn parse_loose_handles_common_formats() {
        assert!(time::parse_loose("2025-03-01T10:00:00Z").is_some());
        assert!(time::parse_loose("Sat, 01 Mar 2025 10:00:00 GMT").is_some());
        assert!(time::parse_loose("2025-03-01").is_some());
        assert_eq!(
            time::parse_loose("Jun 1, 2025 - Jun 3, 2025"),
            time::parse_loose("2025-06-01")
        );
        assert!(time::parse_loose("next tuesday").is_none());
        assert!(time::parse_loose("").is_none());
    }
}
