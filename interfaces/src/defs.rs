use serde::{Deserialize, Serialize};

/// How the payload behind a source URL should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[serde(alias = "rss", alias = "atom")]
    Feed,
    #[default]
    Html,
    Api,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFilters {
    #[serde(default, alias = "filter_keywords")]
    pub keywords: Vec<String>,
    #[serde(default, alias = "location_filter")]
    pub location: String,
}

impl SourceFilters {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.location.trim().is_empty()
    }
}

/// One configured content origin. Supplied by the configuration loader and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: SourceKind,
    #[serde(default, alias = "category", alias = "site")]
    pub category_or_site: String,
    #[serde(default)]
    pub filters: SourceFilters,
}

impl SourceDescriptor {
    pub fn new(url: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            url: url.into(),
            kind,
            category_or_site: String::new(),
            filters: SourceFilters::default(),
        }
    }

    pub fn with_category(mut self, category_or_site: impl Into<String>) -> Self {
        self.category_or_site = category_or_site.into();
        self
    }

    pub fn with_filters(mut self, filters: SourceFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// A normalized item as handed to the rendering step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub title: String,
    pub url: String,
    pub source_name: String,
    pub category_or_type: String,
    #[serde(default)]
    pub published_or_date: String,
    #[serde(default)]
    pub summary_or_location: String,
    /// Company or organizer, when the source exposes one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub organization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_reasons: Vec<String>,
    /// Full text of the listing card the item came from. Read by scoring only.
    #[serde(skip)]
    pub card_text: String,
}

/// Keyword lists the relevance scorer matches against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestProfile {
    #[serde(default, alias = "target_roles", alias = "topics")]
    pub roles: Vec<String>,
    #[serde(default, alias = "target_locations")]
    pub locations: Vec<String>,
    #[serde(default, alias = "preferred_companies", alias = "organizers")]
    pub entities: Vec<String>,
}

// Sinks receive the complete, ranked collection of one run and replace
// whatever they held before.
pub trait ItemSink {
    fn write_items(&self, items: &[ContentItem]) -> std::io::Result<()>;
}
