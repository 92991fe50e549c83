use crate::types::{ContentItem, Ranking};
use crate::utils::{text, time};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Merge per-source batches into one ranked list.
///
/// Items collide on their normalized title. The survivor is the one with the
/// strictly higher score; equal scores keep whichever came first, so callers
/// must pass batches in source order for the result to be reproducible.
pub fn merge(batches: Vec<Vec<ContentItem>>, ranking: Ranking) -> Vec<ContentItem> {
    let mut order: Vec<String> = Vec::new();
    let mut best: HashMap<String, ContentItem> = HashMap::new();
    let mut superseded = 0usize;

    for item in batches.into_iter().flatten() {
        let key = text::normalize_title(&item.title);
        if key.is_empty() {
            continue;
        }
        match best.get_mut(&key) {
            None => {
                order.push(key.clone());
                best.insert(key, item);
            }
            Some(existing) => {
                if score_key(&item) > score_key(existing) {
                    *existing = item;
                }
                superseded += 1;
            }
        }
    }

    let mut merged: Vec<ContentItem> = order.into_iter().filter_map(|key| best.remove(&key)).collect();
    rank(&mut merged, ranking);

    debug!("Merged {} items ({} duplicates dropped)", merged.len(), superseded);
    merged
}

/// Stable total ordering. Missing scores and dates compare lowest; ties fall
/// back to the normalized title, then the URL.
pub fn rank(items: &mut [ContentItem], ranking: Ranking) {
    match ranking {
        Ranking::ScoreDescending => items.sort_by(|a, b| score_key(b).total_cmp(&score_key(a)).then_with(|| tie_break(a, b))),
        Ranking::NewestFirst => items.sort_by(|a, b| date_key(b).cmp(&date_key(a)).then_with(|| tie_break(a, b))),
        Ranking::Chronological => items.sort_by(|a, b| date_key(a).cmp(&date_key(b)).then_with(|| tie_break(a, b))),
    }
}

fn score_key(item: &ContentItem) -> f64 {
    item.score.unwrap_or(f64::NEG_INFINITY)
}

fn date_key(item: &ContentItem) -> Option<DateTime<Utc>> {
    time::parse_loose(&item.published_or_date)
}

fn tie_break(a: &ContentItem, b: &ContentItem) -> Ordering {
    text::normalize_title(&a.title)
        .cmp(&text::normalize_title(&b.title))
        .then_with(|| a.url.cmp(&b.url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(title: &str, score: Option<f64>, date: &str) -> ContentItem {
        ContentItem {
            title: title.to_string(),
            url: format!("https://example.com/{}", title.trim().replace(' ', "-")),
            source_name: "Example".to_string(),
            category_or_type: "job".to_string(),
            published_or_date: date.to_string(),
            summary_or_location: String::new(),
            organization: String::new(),
            score,
            match_reasons: Vec::new(),
            card_text: String::new(),
        }
    }

    #[test]
    fn higher_score_wins_title_collision() {
        let merged = merge(
            vec![
                vec![item(" Senior  Engineer ", Some(0.6), "")],
                vec![item("senior engineer", Some(0.9), "")],
            ],
            Ranking::ScoreDescending,
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].score, Some(0.9));
        assert_eq!(merged[0].title, "senior engineer");
    }

    #[test]
    fn equal_scores_keep_first_seen() {
        let mut first = item("Data Engineer", Some(0.5), "");
        first.source_name = "First".to_string();
        let mut second = item("data engineer", Some(0.5), "");
        second.source_name = "Second".to_string();

        let merged = merge(vec![vec![first], vec![second]], Ranking::ScoreDescending);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source_name, "First");
    }

    #[test]
    fn news_sorted_newest_first_with_undated_last() {
        let merged = merge(
            vec![vec![
                item("Older story", None, "2025-01-01T00:00:00Z"),
                item("Undated story", None, ""),
                item("Newest story", None, "Mon, 03 Mar 2025 10:00:00 GMT"),
            ]],
            Ranking::NewestFirst,
        );

        let titles: Vec<_> = merged.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Newest story", "Older story", "Undated story"]);
    }

    #[test]
    fn events_sorted_chronologically() {
        let merged = merge(
            vec![
                vec![item("Late meetup", Some(0.3), "2025-09-01")],
                vec![item("Early meetup", Some(0.9), "2025-02-01")],
            ],
            Ranking::Chronological,
        );

        assert_eq!(merged[0].title, "Early meetup");
    }

    #[test]
    fn unscored_items_rank_below_scored() {
        let merged = merge(
            vec![vec![item("Unscored role", None, ""), item("Scored role", Some(0.3), "")]],
            Ranking::ScoreDescending,
        );
        assert_eq!(merged[0].title, "Scored role");
    }

    #[test]
    fn merging_output_again_is_a_no_op() {
        let batches = vec![
            vec![item("B job", Some(0.5), ""), item("A job", Some(0.5), ""), item("b  JOB", Some(0.7), "")],
            vec![item("C job", Some(0.9), ""), item("Blank", None, "")],
        ];

        let once = merge(batches, Ranking::ScoreDescending);
        let twice = merge(vec![once.clone(), once.clone()], Ranking::ScoreDescending);

        assert_eq!(once, twice);
        assert_eq!(once.len(), 4);
    }

    #[test]
    fn blank_titles_are_dropped() {
        let merged = merge(vec![vec![item("   ", Some(1.0), "")]], Ranking::ScoreDescending);
        assert!(merged.is_empty());
    }
}
