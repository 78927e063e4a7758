// src/ingest/dedup.rs
//! Multi-signal duplicate detection with occurrence tracking.
//!
//! `DedupIndex` is per-run state: constructed empty, fed one candidate at a
//! time, discarded at the end of the run. Duplicate rules are evaluated in
//! the fixed order of [`RULE_ORDER`], first match wins. Regardless of the
//! verdict, every candidate is folded into its canonical record, so
//! occurrence counts stay accurate for downstream scoring.

use std::collections::{HashMap, HashSet};

use crate::ingest::normalize::{content_fingerprint, normalize_title, normalize_url};
use crate::ingest::types::{Candidate, CanonicalKey, CanonicalRecord};

/// Two normalized titles at or above this ratio are the same story.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// The duplicate signals, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateSignal {
    Url,
    Title,
    ContentHash,
    SimilarTitle,
}

/// Explicit rule chain; keep the priority auditable in one place.
pub const RULE_ORDER: [DuplicateSignal; 4] = [
    DuplicateSignal::Url,
    DuplicateSignal::Title,
    DuplicateSignal::ContentHash,
    DuplicateSignal::SimilarTitle,
];

/// Verdict for one candidate: which rule fired (if any) and the canonical
/// key derived from the candidate's own fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub signal: Option<DuplicateSignal>,
    pub key: CanonicalKey,
}

impl Classification {
    pub fn is_duplicate(&self) -> bool {
        self.signal.is_some()
    }
}

/// Normalized signals computed once per candidate.
struct Signals {
    url: String,
    title: String,
    fingerprint: Option<String>,
}

impl Signals {
    fn of(candidate: &Candidate) -> Self {
        Self {
            url: normalize_url(&candidate.url),
            title: normalize_title(&candidate.title),
            fingerprint: content_fingerprint(&candidate.content),
        }
    }
}

/// Per-run index of previously seen signals plus the canonical record map.
#[derive(Debug)]
pub struct DedupIndex {
    seen_urls: HashSet<String>,
    seen_titles: HashSet<String>,
    seen_fingerprints: HashSet<String>,
    records: Vec<CanonicalRecord>,
    by_key: HashMap<CanonicalKey, usize>,
    similarity_threshold: f64,
}

impl Default for DedupIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_SIMILARITY_THRESHOLD)
    }

    pub fn with_threshold(similarity_threshold: f64) -> Self {
        Self {
            seen_urls: HashSet::new(),
            seen_titles: HashSet::new(),
            seen_fingerprints: HashSet::new(),
            records: Vec::new(),
            by_key: HashMap::new(),
            similarity_threshold,
        }
    }

    /// Classify a candidate against everything seen so far. New candidates
    /// register their signals; duplicates leave the seen sets untouched.
    pub fn classify(&mut self, candidate: &Candidate) -> Classification {
        let signals = Signals::of(candidate);
        let key = CanonicalKey::for_candidate(candidate);

        for rule in RULE_ORDER {
            if self.rule_matches(rule, &signals) {
                return Classification {
                    signal: Some(rule),
                    key,
                };
            }
        }

        if !signals.url.is_empty() {
            self.seen_urls.insert(signals.url);
        }
        if !signals.title.is_empty() {
            self.seen_titles.insert(signals.title);
        }
        if let Some(fp) = signals.fingerprint {
            self.seen_fingerprints.insert(fp);
        }

        Classification { signal: None, key }
    }

    fn rule_matches(&self, rule: DuplicateSignal, signals: &Signals) -> bool {
        match rule {
            DuplicateSignal::Url => {
                !signals.url.is_empty() && self.seen_urls.contains(&signals.url)
            }
            DuplicateSignal::Title => {
                !signals.title.is_empty() && self.seen_titles.contains(&signals.title)
            }
            DuplicateSignal::ContentHash => signals
                .fingerprint
                .as_ref()
                .is_some_and(|fp| self.seen_fingerprints.contains(fp)),
            // O(seen titles) scan per candidate; fine for runs of low
            // hundreds, not for unbounded streams.
            DuplicateSignal::SimilarTitle => {
                !signals.title.is_empty()
                    && self
                        .seen_titles
                        .iter()
                        .any(|seen| similarity_ratio(&signals.title, seen) >= self.similarity_threshold)
            }
        }
    }

    /// Fold a candidate into its canonical record: first sighting stores the
    /// candidate as the frozen representative, later sightings only bump the
    /// occurrence count.
    pub fn track(&mut self, candidate: &Candidate, key: CanonicalKey) {
        match self.by_key.get(&key) {
            Some(&idx) => {
                self.records[idx].occurrences += 1;
            }
            None => {
                let first_seen = self.records.len();
                self.by_key.insert(key.clone(), first_seen);
                self.records.push(CanonicalRecord {
                    key,
                    candidate: candidate.clone(),
                    occurrences: 1,
                    first_seen,
                });
            }
        }
    }

    /// Per-candidate entry point: classify, then track under the derived key.
    pub fn observe(&mut self, candidate: &Candidate) -> Classification {
        let classification = self.classify(candidate);
        self.track(candidate, classification.key.clone());
        classification
    }

    /// Canonical records in first-seen order.
    pub fn into_records(self) -> Vec<CanonicalRecord> {
        self.records
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Symmetric similarity of two strings in `[0, 1]`:
/// `2 * LCS(a, b) / (|a| + |b|)` over chars. Empty input on either side
/// yields 0.0.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Single-row LCS DP; titles are short so O(|a|*|b|) is cheap.
    let mut row = vec![0usize; b.len() + 1];
    for ca in &a {
        let mut prev_diag = 0;
        for (j, cb) in b.iter().enumerate() {
            let up = row[j + 1];
            row[j + 1] = if ca == cb {
                prev_diag + 1
            } else {
                up.max(row[j])
            };
            prev_diag = up;
        }
    }
    let lcs = row[b.len()];
    (2.0 * lcs as f64) / ((a.len() + b.len()) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(title: &str, url: &str, content: &str) -> Candidate {
        Candidate {
            title: title.into(),
            url: url.into(),
            published_at: None,
            content: content.into(),
            source: None,
        }
    }

    #[test]
    fn identical_candidate_twice_yields_one_record_with_two_occurrences() {
        let mut index = DedupIndex::new();
        let c = cand("CAR-T wins approval", "https://x.com/a", "body");

        let first = index.observe(&c);
        let second = index.observe(&c);

        assert!(!first.is_duplicate());
        assert_eq!(second.signal, Some(DuplicateSignal::Url));
        assert_eq!(index.len(), 1);
        assert_eq!(index.records()[0].occurrences, 2);
    }

    #[test]
    fn url_rule_fires_before_title_rule() {
        let mut index = DedupIndex::new();
        index.observe(&cand("Title one", "https://x.com/a", "body a"));

        // Same URL, same title: URL wins by priority.
        let c = index.observe(&cand("Title one", "https://x.com/a/", "body b"));
        assert_eq!(c.signal, Some(DuplicateSignal::Url));
    }

    #[test]
    fn title_match_is_exact_after_normalization() {
        let mut index = DedupIndex::new();
        index.observe(&cand("Gene therapy milestone", "https://x.com/a", "a"));

        let c = index.observe(&cand(
            "BREAKING: Gene Therapy Milestone",
            "https://y.com/b",
            "b",
        ));
        assert_eq!(c.signal, Some(DuplicateSignal::Title));
    }

    #[test]
    fn content_hash_rule_catches_republished_body() {
        let mut index = DedupIndex::new();
        index.observe(&cand("First headline", "https://x.com/a", "Same   body text"));

        let c = index.observe(&cand("Totally different", "https://y.com/b", "same body TEXT"));
        assert_eq!(c.signal, Some(DuplicateSignal::ContentHash));
    }

    #[test]
    fn fuzzy_rule_uses_inclusive_threshold() {
        // 17 shared chars of 20 total on each side: ratio = 2*17/40 = 0.85.
        let a = "aaaaaaaaaaaaaaaaabbb";
        let b = "aaaaaaaaaaaaaaaaaccc";
        assert!((similarity_ratio(a, b) - 0.85).abs() < 1e-12);

        let mut index = DedupIndex::new();
        index.observe(&cand(a, "https://x.com/a", "a"));
        let c = index.observe(&cand(b, "https://y.com/b", "b"));
        assert_eq!(c.signal, Some(DuplicateSignal::SimilarTitle));

        // One matching char fewer: 2*16/40 = 0.80 < 0.85 -> new.
        let mut index = DedupIndex::new();
        index.observe(&cand("aaaaaaaaaaaaaaaabbbb", "https://x.com/a", "a"));
        let c = index.observe(&cand("aaaaaaaaaaaaaaaacccc", "https://y.com/b", "b"));
        assert_eq!(c.signal, None);
    }

    #[test]
    fn similarity_ratio_is_symmetric() {
        let a = "crispr base editing advances";
        let b = "crispr base editing advanced";
        assert_eq!(similarity_ratio(a, b), similarity_ratio(b, a));
        assert!(similarity_ratio(a, b) > 0.9);
    }

    #[test]
    fn duplicate_with_new_key_still_gets_its_own_record() {
        // Fuzzy-duplicate with a distinct URL: flagged duplicate, but its own
        // canonical key was never seen, so tracking creates a fresh record.
        let mut index = DedupIndex::new();
        index.observe(&cand("antibody platform raises series b", "https://x.com/a", "a"));
        let c = index.observe(&cand("antibody platform raises series c", "https://y.com/b", "b"));
        assert_eq!(c.signal, Some(DuplicateSignal::SimilarTitle));
        assert_eq!(index.len(), 2);
        assert_eq!(index.records()[1].occurrences, 1);
    }

    #[test]
    fn empty_candidates_dedupe_only_on_exact_structural_equality() {
        let mut index = DedupIndex::new();
        let a = index.observe(&cand("", "", ""));
        let b = index.observe(&cand("", "", ""));
        assert!(!a.is_duplicate());
        // No registered signal can match, so even an identical empty
        // candidate is "new" -- but it folds into the same fallback record.
        assert!(!b.is_duplicate());
        assert_eq!(index.len(), 1);
        assert_eq!(index.records()[0].occurrences, 2);
    }

    #[test]
    fn representative_is_frozen_at_first_sighting() {
        let mut index = DedupIndex::new();
        index.observe(&cand("Original headline", "https://x.com/a", "first body"));
        index.observe(&cand("Changed headline", "https://x.com/a?utm=1", "second body"));

        let rec = &index.records()[0];
        assert_eq!(rec.candidate.title, "Original headline");
        assert_eq!(rec.occurrences, 2);
    }
}
