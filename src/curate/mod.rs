// src/curate/mod.rs
//! Curation selector: scores and classifies every canonical record, then
//! greedily fills the two digest tiers under topic-diversity caps.
//!
//! The tier caps are a fixed episode format; the target duration shapes only
//! the reported time allocation, never the caps themselves.

pub mod config;
pub mod scoring;
pub mod topics;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::curate::config::CurationConfig;
use crate::curate::scoring::impact_score;
use crate::curate::topics::classify_topic;
use crate::ingest::types::CanonicalRecord;

/// A canonical record with its derived score and topic.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredArticle {
    pub record: CanonicalRecord,
    pub impact_score: f64,
    pub topic: String,
}

/// Reporting-time split of the target duration: 60% main stories, 30% quick
/// hits, 10% analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAllocation {
    pub main_secs: u32,
    pub quick_secs: u32,
    pub analysis_secs: u32,
}

impl TimeAllocation {
    pub fn for_target(target_duration_secs: u32) -> Self {
        Self {
            main_secs: target_duration_secs * 6 / 10,
            quick_secs: target_duration_secs * 3 / 10,
            analysis_secs: target_duration_secs / 10,
        }
    }
}

/// The two ordered output tiers plus the running duration estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    pub main_stories: Vec<ScoredArticle>,
    pub quick_hits: Vec<ScoredArticle>,
    pub estimated_duration_secs: u32,
    pub allocation: TimeAllocation,
}

impl SelectionResult {
    pub fn is_empty(&self) -> bool {
        self.main_stories.is_empty() && self.quick_hits.is_empty()
    }

    /// All selected articles, main tier first.
    pub fn selected(&self) -> impl Iterator<Item = &ScoredArticle> {
        self.main_stories.iter().chain(self.quick_hits.iter())
    }
}

/// Score, classify, sort, and fill both tiers.
///
/// Both tiers come back internally sorted by descending score (the sort is
/// stable, so equal scores keep first-seen order), and are disjoint: a
/// record accepted into the main tier is never reconsidered for quick hits.
pub fn select(
    records: &[CanonicalRecord],
    target_duration_secs: u32,
    config: &CurationConfig,
    now: DateTime<Utc>,
) -> SelectionResult {
    let mut scored: Vec<ScoredArticle> = records
        .iter()
        .map(|record| ScoredArticle {
            impact_score: impact_score(record, config, now),
            topic: classify_topic(record, config),
            record: record.clone(),
        })
        .collect();

    // Stable: equal scores preserve first-seen order.
    scored.sort_by(|a, b| {
        b.impact_score
            .partial_cmp(&a.impact_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let sel = &config.selection;
    let mut topic_coverage: HashMap<String, usize> = HashMap::new();
    let mut estimated_duration_secs = 0u32;

    // Main tier: walk the top of the ranking; a record passed over here is
    // not reconsidered for this tier.
    let mut main_stories: Vec<ScoredArticle> = Vec::new();
    for article in scored.iter().take(sel.main_story_pool) {
        if main_stories.len() >= sel.main_story_cap {
            break;
        }
        let covered = topic_coverage.get(&article.topic).copied().unwrap_or(0);
        if covered < sel.main_topic_cap {
            main_stories.push(article.clone());
            *topic_coverage.entry(article.topic.clone()).or_insert(0) += 1;
            estimated_duration_secs += sel.main_story_secs;
        }
    }

    // Quick-hit tier: the next slice of the ranking, minus anything already
    // taken; the topic cap here counts both tiers combined.
    let mut quick_hits: Vec<ScoredArticle> = Vec::new();
    let taken: Vec<usize> = main_stories.iter().map(|a| a.record.first_seen).collect();
    for article in scored
        .iter()
        .filter(|a| !taken.contains(&a.record.first_seen))
        .take(sel.quick_hit_pool)
    {
        if quick_hits.len() >= sel.quick_hit_cap {
            break;
        }
        let covered = topic_coverage.get(&article.topic).copied().unwrap_or(0);
        if covered < sel.combined_topic_cap {
            quick_hits.push(article.clone());
            *topic_coverage.entry(article.topic.clone()).or_insert(0) += 1;
            estimated_duration_secs += sel.quick_hit_secs;
        }
    }

    tracing::info!(
        main_stories = main_stories.len(),
        quick_hits = quick_hits.len(),
        estimated_secs = estimated_duration_secs,
        "selection complete"
    );

    SelectionResult {
        main_stories,
        quick_hits,
        estimated_duration_secs,
        allocation: TimeAllocation::for_target(target_duration_secs),
    }
}
