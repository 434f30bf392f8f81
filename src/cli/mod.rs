//! Command-line parsing.
//!
//! Regions are positional and keep their order; that order is the output order.

use chrono::NaiveDate;
use clap::Parser;

use crate::domain::DEFAULT_DAYS;
use crate::report::Language;

#[derive(Debug, Parser)]
#[command(
    name = "corona-overview",
    version,
    about = "Daily COVID-19 overview (case, hospitalization and ICU figures) as a static HTML page"
)]
pub struct Cli {
    /// Region names to report on, e.g. "Hannover" "Celle".
    #[arg(value_name = "REGION")]
    pub regions: Vec<String>,

    /// Number of days to show per region (today first).
    #[arg(long, default_value_t = DEFAULT_DAYS)]
    pub days: usize,

    /// Reference date (YYYY-MM-DD) used as "today"; defaults to the local date.
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Caption and number language.
    #[arg(long, value_enum, default_value_t = Language::De)]
    pub lang: Language,
}
