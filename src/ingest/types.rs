// src/ingest/types.rs
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::ingest::normalize::{content_fingerprint, normalize_title, normalize_url};

/// One article candidate as handed over by the feed layer.
/// Immutable once constructed; the dedup stage never rewrites its fields.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub content: String,
    pub source: Option<String>,
}

/// The signal that named a canonical record at first sighting.
///
/// `Fallback` carries a structural digest of the whole candidate and only
/// ever matches another fallback key by exact equality; it participates in
/// no fuzzy or cross-signal matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CanonicalKey {
    Url(String),
    Title(String),
    Content(String),
    Fallback(String),
}

impl CanonicalKey {
    /// Key preference chain: normalized URL, then normalized title, then
    /// content fingerprint, then a structural digest of every field.
    pub fn for_candidate(candidate: &Candidate) -> Self {
        let url = normalize_url(&candidate.url);
        if !url.is_empty() {
            return CanonicalKey::Url(url);
        }
        let title = normalize_title(&candidate.title);
        if !title.is_empty() {
            return CanonicalKey::Title(title);
        }
        if let Some(fp) = content_fingerprint(&candidate.content) {
            return CanonicalKey::Content(fp);
        }
        CanonicalKey::Fallback(structural_digest(candidate))
    }
}

/// Hex digest over all candidate fields, for candidates with no usable
/// URL, title, or content. 16 bytes of SHA-256 is plenty for identity.
fn structural_digest(candidate: &Candidate) -> String {
    let mut hasher = Sha256::new();
    hasher.update(candidate.title.as_bytes());
    hasher.update([0u8]);
    hasher.update(candidate.url.as_bytes());
    hasher.update([0u8]);
    hasher.update(candidate.content.as_bytes());
    hasher.update([0u8]);
    if let Some(src) = &candidate.source {
        hasher.update(src.as_bytes());
    }
    hasher.update([0u8]);
    if let Some(ts) = candidate.published_at {
        hasher.update(ts.timestamp().to_be_bytes());
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(32);
    for b in digest.iter().take(16) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Stored representative for one canonical key.
///
/// The candidate is frozen at first sighting ("first-seen wins"); only
/// `occurrences` mutates afterwards.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CanonicalRecord {
    pub key: CanonicalKey,
    pub candidate: Candidate,
    pub occurrences: u32,
    pub first_seen: usize,
}
