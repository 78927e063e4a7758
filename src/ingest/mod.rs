// src/ingest/mod.rs
pub mod dedup;
pub mod normalize;
pub mod types;

use std::collections::BTreeMap;

use crate::ingest::dedup::DedupIndex;
use crate::ingest::types::{Candidate, CanonicalRecord};

/// Counters for one dedup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupStats {
    pub total: usize,
    pub duplicates: usize,
    pub unique: usize,
}

/// Run the duplicate detector over a candidate list, one candidate at a
/// time, and return the canonical records in first-seen order.
///
/// The index lives and dies inside this call; nothing is persisted between
/// runs. An empty input is not an error, it just yields no records.
pub fn dedupe_candidates(candidates: &[Candidate]) -> (Vec<CanonicalRecord>, DedupStats) {
    dedupe_candidates_with_threshold(candidates, dedup::DEFAULT_SIMILARITY_THRESHOLD)
}

/// Same pass with an explicit fuzzy-title threshold (from config).
pub fn dedupe_candidates_with_threshold(
    candidates: &[Candidate],
    similarity_threshold: f64,
) -> (Vec<CanonicalRecord>, DedupStats) {
    let mut index = DedupIndex::with_threshold(similarity_threshold);
    let mut stats = DedupStats::default();

    for candidate in candidates {
        stats.total += 1;
        if index.observe(candidate).is_duplicate() {
            stats.duplicates += 1;
        }
    }

    let records = index.into_records();
    stats.unique = records.len();

    tracing::info!(
        total = stats.total,
        duplicates = stats.duplicates,
        unique = stats.unique,
        "dedup pass complete"
    );
    for (occurrences, count) in occurrence_histogram(&records) {
        tracing::debug!(occurrences, articles = count, "occurrence bucket");
    }

    (records, stats)
}

/// Occurrence-count distribution, ordered by count (for run reports).
pub fn occurrence_histogram(records: &[CanonicalRecord]) -> BTreeMap<u32, usize> {
    let mut hist = BTreeMap::new();
    for rec in records {
        *hist.entry(rec.occurrences).or_insert(0) += 1;
    }
    hist
}
