// src/ingest/normalize.rs
//! Pure text-normalization primitives feeding the duplicate detector.
//!
//! Everything here is deterministic and stateless; `normalize_url` and
//! `normalize_title` are idempotent, so signals can be re-normalized safely.

use once_cell::sync::OnceCell;
use regex::Regex;
use sha2::{Digest, Sha256};

/// Title noise markers removed wherever they occur, not only as prefixes.
const TITLE_NOISE: [&str; 4] = ["breaking news:", "breaking:", "exclusive news:", "exclusive:"];

/// Normalize a URL for duplicate detection: drop the query string and
/// fragment, strip trailing slashes, lowercase. Empty input stays empty.
pub fn normalize_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    let mut u = url;
    if let Some(pos) = u.find('?') {
        u = &u[..pos];
    }
    if let Some(pos) = u.find('#') {
        u = &u[..pos];
    }
    u.trim_end_matches('/').to_lowercase()
}

/// Normalize a title for duplicate detection: lowercase, remove noise
/// markers, trim surrounding whitespace.
pub fn normalize_title(title: &str) -> String {
    let mut t = title.to_lowercase();
    for marker in TITLE_NOISE {
        if t.contains(marker) {
            t = t.replace(marker, "");
        }
    }
    t.trim().to_string()
}

/// 128-bit hex fingerprint of normalized content, or `None` for empty
/// content. Identity check only; collisions are an accepted negligible risk.
pub fn content_fingerprint(content: &str) -> Option<String> {
    if content.is_empty() {
        return None;
    }
    let folded = content
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if folded.is_empty() {
        return None;
    }

    let mut hasher = Sha256::new();
    hasher.update(folded.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(32);
    for b in digest.iter().take(16) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    Some(out)
}

/// Clean feed content down to plain text: strip HTML tags, decode entities,
/// collapse whitespace. Used when building candidates from file input.
pub fn clean_content(s: &str) -> String {
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    let out = re_tags.replace_all(s, "");

    let out = html_escape::decode_html_entities(&out).to_string();

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_drops_query_fragment_and_trailing_slash() {
        assert_eq!(
            normalize_url("https://News.Example.com/story/?utm_source=rss#top"),
            "https://news.example.com/story"
        );
        assert_eq!(normalize_url(""), "");
    }

    #[test]
    fn url_is_idempotent() {
        let once = normalize_url("HTTPS://a.B/c/?x=1");
        assert_eq!(normalize_url(&once), once);
    }

    #[test]
    fn title_strips_noise_markers_anywhere() {
        assert_eq!(normalize_title("BREAKING: Gene therapy wins"), "gene therapy wins");
        // Markers go away even when they are not the prefix.
        assert_eq!(
            normalize_title("Breaking News: Exclusive: trial results"),
            "trial results"
        );
    }

    #[test]
    fn title_is_idempotent() {
        let once = normalize_title("  Breaking News: Breaking: CRISPR milestone  ");
        assert_eq!(normalize_title(&once), once);
    }

    #[test]
    fn fingerprint_ignores_case_and_whitespace_runs() {
        let a = content_fingerprint("A new   antibody\n\tplatform").unwrap();
        let b = content_fingerprint("a new antibody platform").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32); // 16 bytes hex
    }

    #[test]
    fn fingerprint_of_empty_is_none() {
        assert_eq!(content_fingerprint(""), None);
        assert_eq!(content_fingerprint("   \n "), None);
    }

    #[test]
    fn clean_content_strips_tags_and_entities() {
        let s = "<p>Cells &amp; <b>genes</b></p>\n  lab  update";
        assert_eq!(clean_content(s), "Cells & genes lab update");
    }
}
