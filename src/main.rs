//! Biotech News Curator — Binary Entrypoint
//! Batch CLI over the curation engine: `filter` narrows an articles file to
//! a date range and rewrites it with a metadata report; `digest` runs the
//! scoring/selection pass and emits the episode script.

use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use biotech_news_curator::curate::config::CurationConfig;
use biotech_news_curator::curate::select;
use biotech_news_curator::report::{
    filter_by_date_range, read_articles_file, render_digest_script, render_filtered_report,
    to_records, write_text_file,
};

#[derive(Parser)]
#[command(
    name = "biotech-news-curator",
    about = "Curate deduplicated article sets into a time-budgeted digest"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter an articles file by date range and write a metadata report.
    Filter {
        /// Start date, inclusive (YYYY-MM-DD).
        start_date: NaiveDate,
        /// End date, inclusive (YYYY-MM-DD).
        end_date: NaiveDate,
        /// Input articles file.
        #[arg(short, long, default_value = "articles_summary.txt")]
        input: PathBuf,
        /// Output report file.
        #[arg(short, long, default_value = "filtered_articles.txt")]
        output: PathBuf,
    },
    /// Select main stories and quick hits, then write the digest script.
    Digest {
        /// Input articles file (raw summary or filtered report).
        #[arg(short, long, default_value = "filtered_articles.txt")]
        input: PathBuf,
        /// Output script file.
        #[arg(short, long, default_value = "digest_script.txt")]
        output: PathBuf,
        /// Target episode duration in seconds.
        #[arg(short, long, default_value_t = 600)]
        duration: u32,
    },
}

fn main() -> Result<()> {
    // Load .env in local/dev; no-op elsewhere. Enables CURATION_CONFIG_PATH.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Filter {
            start_date,
            end_date,
            input,
            output,
        } => run_filter(start_date, end_date, &input, &output),
        Command::Digest {
            input,
            output,
            duration,
        } => run_digest(&input, &output, duration),
    }
}

fn run_filter(
    start_date: NaiveDate,
    end_date: NaiveDate,
    input: &std::path::Path,
    output: &std::path::Path,
) -> Result<()> {
    if start_date > end_date {
        bail!("start date must be before or equal to end date");
    }

    let entries = read_articles_file(input)?;
    let kept = filter_by_date_range(entries, start_date, end_date);
    tracing::info!(
        kept = kept.len(),
        from = %start_date,
        to = %end_date,
        "date-range filter applied"
    );

    let report = render_filtered_report(&kept, Some((start_date, end_date)), Utc::now());
    write_text_file(output, &report)
}

fn run_digest(input: &std::path::Path, output: &std::path::Path, duration: u32) -> Result<()> {
    let config = CurationConfig::load_default()?;
    let entries = read_articles_file(input)?;
    let records = to_records(&entries);

    let selection = select(&records, duration, &config, Utc::now());
    if selection.is_empty() {
        tracing::warn!("no articles selected; writing an empty digest");
    }

    let script = render_digest_script(&selection);
    write_text_file(output, &script)
}
