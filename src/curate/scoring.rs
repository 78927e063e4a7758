// src/curate/scoring.rs
//! Impact scoring: a keyword/occurrence/length/recency heuristic for
//! newsworthiness. Pure except for the recency factor, which is computed
//! against the `now` the caller passes in.

use chrono::{DateTime, Utc};

use crate::curate::config::CurationConfig;
use crate::ingest::types::CanonicalRecord;

/// Each extra sighting of the same story across sources.
const OCCURRENCE_BONUS: f64 = 2.0;
/// Articles with real body text get a small nudge.
const LENGTH_BONUS: f64 = 1.0;
const LENGTH_BONUS_MIN_CHARS: usize = 300;
/// Fresh news beats stale news: <=1 day and <=3 days.
const RECENCY_BONUS_FRESH: f64 = 2.0;
const RECENCY_BONUS_RECENT: f64 = 1.0;

/// Score one record over `title + " " + content`, lowercased.
///
/// Monotonic in every factor: more matched keywords, more occurrences, a
/// longer body, or a fresher timestamp never lower the score. A missing or
/// unparseable timestamp simply contributes nothing.
pub fn impact_score(record: &CanonicalRecord, config: &CurationConfig, now: DateTime<Utc>) -> f64 {
    let text = format!(
        "{} {}",
        record.candidate.title, record.candidate.content
    )
    .to_lowercase();

    let mut score = 0.0;

    // A keyword counts once, at full weight, no matter how often it repeats.
    for (keyword, weight) in &config.impact_weights {
        if text.contains(keyword.as_str()) {
            score += f64::from(*weight);
        }
    }

    score += f64::from(record.occurrences) * OCCURRENCE_BONUS;

    if record.candidate.content.chars().count() > LENGTH_BONUS_MIN_CHARS {
        score += LENGTH_BONUS;
    }

    if let Some(published) = record.candidate.published_at {
        let days_old = (now - published).num_days();
        if days_old <= 1 {
            score += RECENCY_BONUS_FRESH;
        } else if days_old <= 3 {
            score += RECENCY_BONUS_RECENT;
        }
    }

    score
}
