use crate::types::{ContentItem, Domain, InterestProfile};
use crate::utils::text;

/// One weighted group of interest keywords. Only the first matching keyword
/// counts, so a rule contributes its weight once or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRule {
    pub label: &'static str,
    pub keywords: Vec<String>,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRules {
    pub base: f64,
    pub rules: Vec<ScoringRule>,
}

impl ScoringRules {
    pub fn jobs(profile: &InterestProfile) -> Self {
        Self {
            base: 0.3,
            rules: vec![
                ScoringRule {
                    label: "role",
                    keywords: profile.roles.clone(),
                    weight: 0.3,
                },
                ScoringRule {
                    label: "location",
                    keywords: profile.locations.clone(),
                    weight: 0.2,
                },
                ScoringRule {
                    label: "company",
                    keywords: profile.entities.clone(),
                    weight: 0.2,
                },
            ],
        }
    }

    pub fn events(profile: &InterestProfile) -> Self {
        Self {
            base: 0.3,
            rules: vec![
                ScoringRule {
                    label: "topic",
                    keywords: profile.roles.clone(),
                    weight: 0.4,
                },
                ScoringRule {
                    label: "location",
                    keywords: profile.locations.clone(),
                    weight: 0.2,
                },
                ScoringRule {
                    label: "organizer",
                    keywords: profile.entities.clone(),
                    weight: 0.2,
                },
            ],
        }
    }

    /// News is never scored.
    pub fn for_domain(domain: Domain, profile: &InterestProfile) -> Option<Self> {
        match domain {
            Domain::News => None,
            Domain::Jobs => Some(Self::jobs(profile)),
            Domain::Events => Some(Self::events(profile)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    rules: ScoringRules,
}

impl RelevanceScorer {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn for_domain(domain: Domain, profile: &InterestProfile) -> Option<Self> {
        ScoringRules::for_domain(domain, profile).map(Self::new)
    }

    /// Score in `[0, 1]`, rounded to two decimals, plus a `"label: keyword"`
    /// reason for each rule that matched against title and body combined.
    pub fn score(&self, title: &str, body: &str) -> (f64, Vec<String>) {
        let combined = format!("{} {}", title, body);
        let mut total = self.rules.base;
        let mut reasons = Vec::new();

        for rule in &self.rules.rules {
            if let Some(keyword) = rule.keywords.iter().find(|k| text::contains_ci(&combined, k)) {
                total += rule.weight;
                reasons.push(format!("{}: {}", rule.label, keyword.trim()));
            }
        }

        let clamped = total.clamp(0.0, 1.0);
        ((clamped * 100.0).round() / 100.0, reasons)
    }

    /// Scores an item against its listed fields and, when present, the full
    /// card text it was extracted from.
    pub fn apply(&self, item: &mut ContentItem) {
        let body = format!("{} {} {}", item.summary_or_location, item.organization, item.card_text);
        let (score, reasons) = self.score(&item.title, &body);
        item.score = Some(score);
        item.match_reasons = reasons;
    }
}
