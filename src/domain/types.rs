//! Shared domain types.
//!
//! Every series is rebuilt per run from freshly fetched bytes; nothing here is persisted.
//! A missing `(region, date)` entry means "no data" and is never read as zero.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use crate::error::{AppError, EXIT_USAGE};

/// Default number of days shown per region.
pub const DEFAULT_DAYS: usize = 10;

/// One metric over time for a single region (or a single fixed jurisdiction).
pub type DateSeries = BTreeMap<NaiveDate, f64>;

/// One metric over time, grouped by caller-supplied region name.
pub type RegionSeries = BTreeMap<String, DateSeries>;

/// Lower-Saxony hospital indicators; all three values come from the same source row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicators {
    pub case_incidence: f64,
    pub hospitalization_incidence: f64,
    pub icu_percentage: f64,
}

/// Resolved settings for a single run.
#[derive(Debug, Clone)]
pub struct OverviewConfig {
    /// Region names in caller order; the order determines output order.
    pub regions: Vec<String>,
    pub days: usize,
    /// Reference date for "today" (fallback slot and first displayed row).
    pub today: NaiveDate,
}

impl OverviewConfig {
    pub fn new(regions: Vec<String>, days: usize, today: NaiveDate) -> Result<Self, AppError> {
        if days == 0 {
            return Err(AppError::new(EXIT_USAGE, "`--days` must be at least 1."));
        }
        Ok(Self {
            regions,
            days,
            today,
        })
    }

    /// Dates to display: today, yesterday, ... (`days` entries, newest first).
    pub fn display_dates(&self) -> Vec<NaiveDate> {
        display_dates(self.today, self.days)
    }
}

pub fn display_dates(today: NaiveDate, days: usize) -> Vec<NaiveDate> {
    (0..days as u64)
        .filter_map(|i| today.checked_sub_days(Days::new(i)))
        .collect()
}
