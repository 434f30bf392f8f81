//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches and reconciles the sources
//! - renders the HTML page to stdout

use chrono::{Local, NaiveDateTime};
use clap::Parser;

use crate::cli::Cli;
use crate::data::{Fetch, HttpFetcher, SourceUrls};
use crate::domain::OverviewConfig;
use crate::error::AppError;
use crate::report::{Captions, Language, ValueFormat, render_html};

pub mod pipeline;

/// Entry point for the `corona-overview` binary.
pub fn run() -> Result<(), AppError> {
    crate::logging::init_tracing_subscriber();
    let cli = Cli::parse();
    let urls = SourceUrls::from_env();
    let fetcher = HttpFetcher::new()?;

    if let Some(html) = render_page(cli, &urls, &fetcher, Local::now().naive_local())? {
        println!("{html}");
    }
    Ok(())
}

/// Build the HTML page for `cli`; `None` when no regions were given (nothing is fetched).
///
/// `now` is the generation timestamp and, without `--today`, supplies the reference date.
pub fn render_page(
    cli: Cli,
    urls: &SourceUrls,
    fetcher: &dyn Fetch,
    now: NaiveDateTime,
) -> Result<Option<String>, AppError> {
    if cli.regions.is_empty() {
        eprintln!("no locations given");
        return Ok(None);
    }

    let today = cli.today.unwrap_or_else(|| now.date());
    let config = OverviewConfig::new(cli.regions, cli.days, today)?;
    let overview = pipeline::run_overview(&config, urls, fetcher)?;

    let format = match cli.lang {
        Language::De => ValueFormat::german(),
        Language::En => ValueFormat::english(),
    };
    Ok(Some(render_html(
        &overview,
        &Captions::for_language(cli.lang),
        &format,
        now,
    )))
}
