// src/curate/topics.rs
//! Keyword-vote topic classification over a fixed, ordered category set.

use crate::curate::config::CurationConfig;
use crate::ingest::types::CanonicalRecord;

/// Label for articles no category claims.
pub const GENERAL_TOPIC: &str = "general";

/// Classify a record into the category with the most keyword hits in
/// `title + " " + content` (case-insensitive substring matches).
///
/// Ties go to the earlier-declared category; zero hits everywhere yields
/// [`GENERAL_TOPIC`]. Deterministic for a fixed config.
pub fn classify_topic(record: &CanonicalRecord, config: &CurationConfig) -> String {
    let text = format!(
        "{} {}",
        record.candidate.title, record.candidate.content
    )
    .to_lowercase();

    let mut best: Option<(&str, usize)> = None;
    for category in &config.topics {
        let hits = category
            .keywords
            .iter()
            .filter(|kw| text.contains(kw.as_str()))
            .count();
        if hits == 0 {
            continue;
        }
        // Strictly-greater keeps the first-declared winner on ties.
        if best.is_none_or(|(_, best_hits)| hits > best_hits) {
            best = Some((category.name.as_str(), hits));
        }
    }

    best.map(|(name, _)| name.to_string())
        .unwrap_or_else(|| GENERAL_TOPIC.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::{Candidate, CanonicalKey};

    fn record(title: &str, content: &str) -> CanonicalRecord {
        CanonicalRecord {
            key: CanonicalKey::Title(title.to_lowercase()),
            candidate: Candidate {
                title: title.into(),
                url: String::new(),
                published_at: None,
                content: content.into(),
                source: None,
            },
            occurrences: 1,
            first_seen: 0,
        }
    }

    #[test]
    fn majority_vote_wins() {
        let cfg = CurationConfig::embedded();
        // Two cancer keywords vs one genetics keyword.
        let r = record("Tumor profiling in oncology", "a gene panel readout");
        assert_eq!(classify_topic(&r, &cfg), "cancer");
    }

    #[test]
    fn ties_break_by_declaration_order() {
        let cfg = CurationConfig::embedded();
        // One therapeutics keyword ("drug"), one cancer keyword ("tumor");
        // therapeutics is declared first.
        let r = record("Drug shrinks tumor", "");
        assert_eq!(classify_topic(&r, &cfg), "therapeutics");
    }

    #[test]
    fn zero_hits_fall_back_to_general() {
        let cfg = CurationConfig::embedded();
        let r = record("Quarterly housekeeping note", "office relocation");
        assert_eq!(classify_topic(&r, &cfg), GENERAL_TOPIC);
    }

    #[test]
    fn classification_is_deterministic() {
        let cfg = CurationConfig::embedded();
        let r = record("CRISPR screen maps the genome", "dna repair pathways");
        let a = classify_topic(&r, &cfg);
        let b = classify_topic(&r, &cfg);
        assert_eq!(a, b);
        assert_eq!(a, "genetics");
    }
}
