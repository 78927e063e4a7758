// tests/curation_e2e.rs
//! Full pass: raw candidates -> dedup -> score/classify -> two-tier select.

use biotech_news_curator::{
    curate_candidates, dedupe_candidates, select, Candidate, CurationConfig,
};
use chrono::{Duration, Utc};

fn cand(title: &str, url: &str, content: &str, hours_old: i64) -> Candidate {
    Candidate {
        title: title.into(),
        url: url.into(),
        published_at: Some(Utc::now() - Duration::hours(hours_old)),
        content: content.into(),
        source: None,
    }
}

#[test]
fn duplicates_boost_occurrence_and_therefore_score() {
    let now = Utc::now();
    let cfg = CurationConfig::embedded();

    let candidates = vec![
        // The same story from three feeds.
        cand(
            "CAR-T approval announced",
            "https://a.com/cart",
            "The fda granted approval for the new therapy.",
            2,
        ),
        cand(
            "CAR-T approval announced",
            "https://a.com/cart?utm_source=feed",
            "The fda granted approval for the new therapy.",
            3,
        ),
        cand(
            "Breaking: CAR-T approval announced",
            "https://b.com/cart-mirror",
            "Mirror copy of the announcement.",
            4,
        ),
        // A single-sighting story with similar keyword weight.
        cand(
            "Novel diagnostic biomarker found",
            "https://c.com/biomarker",
            "A novel biomarker for early detection.",
            2,
        ),
    ];

    let (records, stats) = dedupe_candidates(&candidates);
    assert_eq!(stats.duplicates, 2);
    // The mirror is flagged as a title duplicate but keys on its own URL,
    // so it keeps a record of its own with a single sighting.
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].occurrences, 2);
    assert_eq!(records[1].occurrences, 1);

    let result = select(&records, 600, &cfg, now);
    // Two sightings plus the richer keyword text lead the ranking.
    assert_eq!(
        result.main_stories[0].record.candidate.url,
        "https://a.com/cart"
    );
    assert_eq!(result.main_stories.len(), 3);
    assert!(result.quick_hits.is_empty());
    assert_eq!(result.estimated_duration_secs, 540);
}

#[test]
fn engine_is_total_on_degenerate_candidates() {
    let cfg = CurationConfig::embedded();
    let candidates = vec![
        Candidate {
            title: String::new(),
            url: String::new(),
            published_at: None,
            content: String::new(),
            source: None,
        },
        cand("Real story", "https://a.com/1", "tumor data", 1),
    ];

    let (records, _) = dedupe_candidates(&candidates);
    assert_eq!(records.len(), 2);

    // Empty-everything record scores on occurrence alone and classifies as
    // general; nothing panics and the selection still comes back ordered.
    let result = select(&records, 600, &cfg, Utc::now());
    assert_eq!(result.main_stories.len() + result.quick_hits.len(), 2);
}

#[test]
fn configured_similarity_threshold_reaches_the_detector() {
    // These titles sit around ratio 0.80: below the default 0.85, above a
    // configured 0.75.
    let a = cand("aaaaaaaaaaaaaaaabbbb", "https://x.com/1", "a", 1);
    let b = cand("aaaaaaaaaaaaaaaacccc", "https://y.com/2", "b", 1);

    let default_cfg = CurationConfig::embedded();
    let (_, stats) = curate_candidates(&[a.clone(), b.clone()], 600, &default_cfg, Utc::now());
    assert_eq!(stats.duplicates, 0);

    let loose_cfg = CurationConfig::from_toml_str("[dedup]\nsimilarity_threshold = 0.75\n").unwrap();
    let (_, stats) = curate_candidates(&[a, b], 600, &loose_cfg, Utc::now());
    assert_eq!(stats.duplicates, 1);
}

#[test]
fn empty_candidate_list_yields_empty_selection() {
    let cfg = CurationConfig::embedded();
    let (records, stats) = dedupe_candidates(&[]);
    assert_eq!(stats.total, 0);

    let result = select(&records, 600, &cfg, Utc::now());
    assert!(result.is_empty());
    assert_eq!(result.estimated_duration_secs, 0);
}
