// src/report/reader.rs
//! Reader for the record-oriented article text format shared with the
//! collaborator tools. A file is an optional metadata section, the literal
//! `ARTICLE DETAILS` marker, then article blocks:
//!
//! ```text
//! Article 1
//! ------------------------------
//! Title: ...
//! URL: ...
//! Source: ...
//! Published: 2025-08-18 09:30:00
//! Occurrences: 2
//! Content Length: 512 characters
//! Content: ... continuation lines ...
//! ============================================================
//! ```
//!
//! Raw summary files carry no marker; then the whole file is article blocks.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fs;
use std::path::Path;

use crate::ingest::types::{Candidate, CanonicalKey, CanonicalRecord};

/// Section marker separating report metadata from article blocks.
pub const ARTICLE_DETAILS_MARKER: &str = "ARTICLE DETAILS";
/// Timestamp format of the `Published:` field.
pub const PUBLISHED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SEPARATOR_DASHES: &str = "------------------------------";

/// One parsed article block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleEntry {
    pub number: u32,
    pub title: String,
    pub url: String,
    pub source: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub occurrences: u32,
    pub content: String,
}

/// Parse an articles file from disk.
pub fn read_articles_file(path: &Path) -> Result<Vec<ArticleEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading articles file {}", path.display()))?;
    let entries = parse_articles(&content);
    tracing::info!(
        count = entries.len(),
        file = %path.display(),
        "parsed articles file"
    );
    Ok(entries)
}

/// Parse article blocks out of file content. Everything before the
/// `ARTICLE DETAILS` marker is report metadata and skipped; without a
/// marker, parsing starts at the top.
pub fn parse_articles(content: &str) -> Vec<ArticleEntry> {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines
        .iter()
        .position(|l| l.trim().starts_with(ARTICLE_DETAILS_MARKER))
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut entries = Vec::new();
    let mut current: Option<ArticleEntry> = None;

    let mut i = start;
    while i < lines.len() {
        let line = lines[i].trim();

        // Block header: "Article <N>" followed by the dashed separator.
        if line.starts_with("Article ")
            && lines
                .get(i + 1)
                .is_some_and(|next| next.contains(SEPARATOR_DASHES))
        {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            let mut entry = ArticleEntry {
                occurrences: 1,
                ..Default::default()
            };
            if let Some(num) = line.split_whitespace().nth(1) {
                entry.number = num.parse().unwrap_or(0);
            }
            current = Some(entry);
            i += 2;
            continue;
        }

        if let Some(entry) = current.as_mut() {
            if let Some(rest) = line.strip_prefix("Title: ") {
                entry.title = rest.to_string();
            } else if let Some(rest) = line.strip_prefix("URL: ") {
                entry.url = rest.to_string();
            } else if let Some(rest) = line.strip_prefix("Source: ") {
                entry.source = Some(rest.to_string());
            } else if let Some(rest) = line.strip_prefix("Published: ") {
                entry.published_at = parse_published(rest, entry.number);
            } else if let Some(rest) = line.strip_prefix("Occurrences: ") {
                entry.occurrences = rest.parse().unwrap_or(1);
            } else if line.strip_prefix("Content Length: ").is_some() {
                // Derived field; recomputed from content on write.
            } else if let Some(rest) = line.strip_prefix("Content: ") {
                // Content may span lines until the next `=` divider.
                let mut content = rest.to_string();
                let mut j = i + 1;
                while j < lines.len() && !lines[j].trim().starts_with('=') {
                    let cont = lines[j].trim();
                    if !cont.is_empty() {
                        content.push(' ');
                        content.push_str(cont);
                    }
                    j += 1;
                }
                entry.content = content;
                i = j - 1;
            }
        }

        i += 1;
    }

    if let Some(entry) = current.take() {
        entries.push(entry);
    }
    entries
}

/// Malformed timestamps degrade to `None`; the article is kept.
fn parse_published(s: &str, article_number: u32) -> Option<DateTime<Utc>> {
    match NaiveDateTime::parse_from_str(s.trim(), PUBLISHED_FORMAT) {
        Ok(naive) => Some(naive.and_utc()),
        Err(_) => {
            tracing::warn!(
                article = article_number,
                value = s,
                "could not parse published date"
            );
            None
        }
    }
}

/// Keep entries published within the inclusive `[start, end]` day range.
/// Entries without a parseable date drop out of a date-filtered view.
pub fn filter_by_date_range(
    entries: Vec<ArticleEntry>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<ArticleEntry> {
    entries
        .into_iter()
        .filter(|e| {
            e.published_at
                .map(|ts| {
                    let day = ts.date_naive();
                    start <= day && day <= end
                })
                .unwrap_or(false)
        })
        .collect()
}

/// Turn parsed entries into canonical records for the selector, preserving
/// file order as first-seen order and the occurrence counts from the file.
pub fn to_records(entries: &[ArticleEntry]) -> Vec<CanonicalRecord> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let candidate = Candidate {
                title: e.title.clone(),
                url: e.url.clone(),
                published_at: e.published_at,
                content: e.content.clone(),
                source: e.source.clone(),
            };
            CanonicalRecord {
                key: CanonicalKey::for_candidate(&candidate),
                candidate,
                occurrences: e.occurrences.max(1),
                first_seen: i,
            }
        })
        .collect()
}
