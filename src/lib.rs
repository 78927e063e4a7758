// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod curate;
pub mod ingest;
pub mod report;

// ---- Re-exports for stable public API ----
pub use crate::curate::config::CurationConfig;
pub use crate::curate::{select, ScoredArticle, SelectionResult, TimeAllocation};
pub use crate::ingest::dedup::{similarity_ratio, Classification, DedupIndex, DuplicateSignal};
pub use crate::ingest::types::{Candidate, CanonicalKey, CanonicalRecord};
pub use crate::ingest::{dedupe_candidates, dedupe_candidates_with_threshold, DedupStats};

use chrono::{DateTime, Utc};

/// One-call engine run: deduplicate with the configured fuzzy threshold,
/// then score, classify, and fill both digest tiers.
///
/// The detector's output feeds the selector directly, so every canonical
/// record is scored exactly once. Total on any candidate list, including
/// the empty one.
pub fn curate_candidates(
    candidates: &[Candidate],
    target_duration_secs: u32,
    config: &CurationConfig,
    now: DateTime<Utc>,
) -> (SelectionResult, DedupStats) {
    let (records, stats) =
        dedupe_candidates_with_threshold(candidates, config.dedup.similarity_threshold);
    let selection = select(&records, target_duration_secs, config, now);
    (selection, stats)
}
