// src/report/mod.rs
//! Boundary text format shared with the collaborator tools: the article
//! block reader, date-range filtering, and the report/digest writers.

pub mod reader;
pub mod writer;

pub use reader::{
    filter_by_date_range, parse_articles, read_articles_file, to_records, ArticleEntry,
};
pub use writer::{
    render_digest_script, render_filtered_report, write_text_file, ReportMetadata,
};
