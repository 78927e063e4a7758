// src/report/writer.rs
//! Writers for the two human-readable outputs: the filtered-articles report
//! (metadata header + article blocks) and the digest script. Template text
//! only; summary generation stays extractive.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::curate::{ScoredArticle, SelectionResult};
use crate::report::reader::{ArticleEntry, ARTICLE_DETAILS_MARKER, PUBLISHED_FORMAT};

const WIDE_DIVIDER: &str = "============================================================";

/// Summary facts about a filtered article set, for the report header.
#[derive(Debug, Clone, Default)]
pub struct ReportMetadata {
    pub total_articles: usize,
    pub actual_date_range: Option<(NaiveDate, NaiveDate)>,
    pub unique_sources: usize,
    pub top_sources: Vec<(String, usize)>,
    pub occurrence_distribution: Vec<(u32, usize)>,
    pub avg_content_length: usize,
    pub peak_publishing_hour: Option<(u32, usize)>,
}

impl ReportMetadata {
    pub fn from_entries(entries: &[ArticleEntry]) -> Self {
        let mut dates: Vec<NaiveDate> = entries
            .iter()
            .filter_map(|e| e.published_at.map(|ts| ts.date_naive()))
            .collect();
        dates.sort();
        let actual_date_range = match (dates.first(), dates.last()) {
            (Some(&min), Some(&max)) => Some((min, max)),
            _ => None,
        };

        let mut source_counts: HashMap<String, usize> = HashMap::new();
        for e in entries {
            let domain = source_domain(e);
            *source_counts.entry(domain).or_insert(0) += 1;
        }
        let unique_sources = source_counts.len();
        let mut top_sources: Vec<(String, usize)> = source_counts.into_iter().collect();
        top_sources.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_sources.truncate(5);

        let mut occ: HashMap<u32, usize> = HashMap::new();
        for e in entries {
            *occ.entry(e.occurrences).or_insert(0) += 1;
        }
        let mut occurrence_distribution: Vec<(u32, usize)> = occ.into_iter().collect();
        occurrence_distribution.sort_by_key(|&(k, _)| k);

        let avg_content_length = if entries.is_empty() {
            0
        } else {
            entries.iter().map(|e| e.content.chars().count()).sum::<usize>() / entries.len()
        };

        let mut hours: HashMap<u32, usize> = HashMap::new();
        for e in entries {
            if let Some(ts) = e.published_at {
                use chrono::Timelike;
                *hours.entry(ts.hour()).or_insert(0) += 1;
            }
        }
        let peak_publishing_hour = hours
            .into_iter()
            .max_by_key(|&(hour, count)| (count, std::cmp::Reverse(hour)));

        Self {
            total_articles: entries.len(),
            actual_date_range,
            unique_sources,
            top_sources,
            occurrence_distribution,
            avg_content_length,
            peak_publishing_hour,
        }
    }
}

/// Source label for one entry: the explicit `Source:` field, else the URL
/// host, else `"unknown"`.
fn source_domain(entry: &ArticleEntry) -> String {
    if let Some(src) = &entry.source {
        if !src.is_empty() {
            return src.to_lowercase();
        }
    }
    url::Url::parse(&entry.url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Render the filtered-articles report: metadata header, `ARTICLE DETAILS`
/// marker, then one block per entry with 60-char `=` dividers.
pub fn render_filtered_report(
    entries: &[ArticleEntry],
    requested_range: Option<(NaiveDate, NaiveDate)>,
    generated_at: DateTime<Utc>,
) -> String {
    let meta = ReportMetadata::from_entries(entries);
    let mut out = String::new();

    let _ = writeln!(out, "FILTERED ARTICLES - METADATA REPORT");
    let _ = writeln!(out, "{WIDE_DIVIDER}\n");

    let _ = writeln!(out, "QUERY INFORMATION:");
    let _ = writeln!(out, "--------------------");
    if let Some((start, end)) = requested_range {
        let _ = writeln!(out, "Date Range Requested: {start} to {end}");
    }
    if let Some((min, max)) = meta.actual_date_range {
        let _ = writeln!(out, "Actual Date Range: {min} to {max}");
    }
    let _ = writeln!(out, "Total Articles Found: {}", meta.total_articles);
    let _ = writeln!(
        out,
        "Generated At: {}\n",
        generated_at.format(PUBLISHED_FORMAT)
    );

    let _ = writeln!(out, "SOURCE ANALYSIS:");
    let _ = writeln!(out, "---------------");
    let _ = writeln!(out, "Unique Sources: {}", meta.unique_sources);
    let _ = writeln!(out, "Top Sources:");
    for (domain, count) in &meta.top_sources {
        let _ = writeln!(out, "  - {domain}: {count} articles");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "CONTENT ANALYSIS:");
    let _ = writeln!(out, "----------------");
    let _ = writeln!(
        out,
        "Average Content Length: {} characters",
        meta.avg_content_length
    );
    if let Some((hour, count)) = meta.peak_publishing_hour {
        let _ = writeln!(out, "Peak Publishing Hour: {hour:02}:00 ({count} articles)");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "OCCURRENCE DISTRIBUTION:");
    let _ = writeln!(out, "-----------------------");
    for (occurrences, count) in &meta.occurrence_distribution {
        let _ = writeln!(out, "  {occurrences} occurrence(s): {count} articles");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{WIDE_DIVIDER}");
    let _ = writeln!(out, "{ARTICLE_DETAILS_MARKER}");
    let _ = writeln!(out, "{WIDE_DIVIDER}\n");

    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, "Article {}", i + 1);
        let _ = writeln!(out, "------------------------------");
        let _ = writeln!(out, "Title: {}", entry.title);
        let _ = writeln!(out, "URL: {}", entry.url);
        let _ = writeln!(out, "Source: {}", source_domain(entry));
        if let Some(ts) = entry.published_at {
            let _ = writeln!(out, "Published: {}", ts.format(PUBLISHED_FORMAT));
        }
        let _ = writeln!(out, "Occurrences: {}", entry.occurrences);
        let _ = writeln!(
            out,
            "Content Length: {} characters",
            entry.content.chars().count()
        );
        let _ = writeln!(out, "Content: {}", entry.content);
        let _ = writeln!(out, "\n{WIDE_DIVIDER}\n");
    }

    out
}

/// Render the digest script: opener, main stories with detailed summaries,
/// quick hits with one-liners, a trends paragraph, and the source roll-up.
pub fn render_digest_script(selection: &SelectionResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== BIOTECH WEEKLY DIGEST ===\n");
    let _ = writeln!(
        out,
        "Welcome to this week's biotech news roundup, covering the latest \
         developments from breakthrough discoveries to industry updates.\n"
    );
    let _ = writeln!(
        out,
        "Planned pacing: {}s main stories, {}s quick hits, {}s analysis \
         (estimated {}s selected).\n",
        selection.allocation.main_secs,
        selection.allocation.quick_secs,
        selection.allocation.analysis_secs,
        selection.estimated_duration_secs
    );

    let _ = writeln!(out, "=== MAIN STORIES ===\n");
    for (i, article) in selection.main_stories.iter().enumerate() {
        let _ = writeln!(out, "Story {}: {}", i + 1, article.record.candidate.title);
        let _ = writeln!(out, "{}\n", detailed_summary(&article.record.candidate.content));
        let _ = writeln!(out, "---\n");
    }

    if !selection.quick_hits.is_empty() {
        let _ = writeln!(out, "=== QUICK HITS ===\n");
        let _ = writeln!(out, "Now for some quick updates from around the biotech world:\n");
        for article in &selection.quick_hits {
            let _ = writeln!(out, "- {}", article.record.candidate.title);
            let _ = writeln!(out, "  {}\n", brief_summary(&article.record.candidate.content));
        }
    }

    let _ = writeln!(out, "=== TRENDS & INSIGHTS ===\n");
    let _ = writeln!(out, "{}\n", trends_paragraph(selection));
    let _ = writeln!(
        out,
        "That wraps up this week's biotech news. Thanks for listening.\n"
    );

    out.push_str(&sources_summary(selection));
    out
}

/// First two sentences, or a word-boundary prefix for unpunctuated content.
fn detailed_summary(content: &str) -> String {
    let sentences: Vec<&str> = content
        .split(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    match sentences.len() {
        0 => String::new(),
        1 => truncate_at_word(content, 200),
        _ => {
            let mut s = String::new();
            s.push_str(sentences[0].trim_end_matches('.'));
            s.push_str(". ");
            s.push_str(sentences[1].trim_end_matches('.'));
            s.push('.');
            s
        }
    }
}

/// First sentence, trimmed to a sane length and closed with punctuation.
fn brief_summary(content: &str) -> String {
    let first = content.split(". ").next().unwrap_or("").trim();
    if first.is_empty() {
        return String::new();
    }
    let mut s = truncate_at_word(first, 200);
    if !s.ends_with(['.', '!', '?']) {
        s.push('.');
    }
    s
}

/// Cut at a word boundary at or below `max` chars, closing with a period.
fn truncate_at_word(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        let mut s = text.to_string();
        if !s.ends_with(['.', '!', '?']) {
            s.push('.');
        }
        return s;
    }
    let prefix: String = text.chars().take(max).collect();
    let cut = prefix.rsplit_once(' ').map(|(head, _)| head).unwrap_or(&prefix);
    let mut s = cut.trim_end_matches([',', ';', ':']).to_string();
    if !s.ends_with(['.', '!', '?']) {
        s.push('.');
    }
    s
}

fn trends_paragraph(selection: &SelectionResult) -> String {
    let mut topic_counts: HashMap<&str, usize> = HashMap::new();
    for article in selection.selected() {
        *topic_counts.entry(article.topic.as_str()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = topic_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut text = String::from("Looking at this week's developments, ");
    match ranked.as_slice() {
        [] => {
            text.push_str("the feed was quiet with nothing meeting the selection bar.");
            return text;
        }
        [(main, _)] => {
            let _ = write!(
                text,
                "the focus has been on {}, showing a concentrated effort in this area. ",
                main.replace('_', " ")
            );
        }
        [(main, _), (second, _), ..] => {
            let _ = write!(
                text,
                "the focus has been on {}, followed by {}. ",
                main.replace('_', " "),
                second.replace('_', " ")
            );
        }
    }

    let unique_sources = unique_source_count(selection);
    let _ = write!(
        text,
        "We're seeing coverage from {unique_sources} different sources, indicating broad \
         industry interest in these developments."
    );
    text
}

fn unique_source_count(selection: &SelectionResult) -> usize {
    let mut sources: Vec<String> = selection.selected().map(article_source).collect();
    sources.sort();
    sources.dedup();
    sources.len()
}

fn article_source(article: &ScoredArticle) -> String {
    article
        .record
        .candidate
        .source
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| {
            url::Url::parse(&article.record.candidate.url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
        })
        .unwrap_or_else(|| "unknown".to_string())
        .to_lowercase()
}

fn sources_summary(selection: &SelectionResult) -> String {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;
    for article in selection.selected() {
        *counts.entry(article_source(article)).or_insert(0) += 1;
        total += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut out = String::new();
    let _ = writeln!(out, "=== SOURCES SUMMARY ===\n");
    let _ = writeln!(out, "This digest was compiled from the following sources:\n");
    for (source, count) in &ranked {
        let plural = if *count > 1 { "s" } else { "" };
        let _ = writeln!(out, "- {source}: {count} article{plural}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Total sources: {}", ranked.len());
    let _ = writeln!(out, "Total articles: {total}");
    out
}

/// Write a rendered report to disk.
pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(file = %path.display(), "report written");
    Ok(())
}
