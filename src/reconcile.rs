//! Merge step: apply the live fallback to today's slot, then expose a read-only
//! `(region, date) -> value` lookup per metric.
//!
//! Metrics are independent: a region can have a case incidence for a date while the
//! hospitalization feeds have nothing for it. Missing entries stay missing; there is
//! no interpolation or carry-forward.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::data::TodayValues;
use crate::domain::{DateSeries, Indicators, RegionSeries};

/// Fill today's slot from the fallback for every region that lacks it.
///
/// Existing entries are never overwritten. Regions absent from `series` get an (possibly
/// empty) series. Returns how many values were inserted.
pub fn apply_today_fallback(
    series: &mut RegionSeries,
    regions: &[String],
    today: NaiveDate,
    fallback: &TodayValues,
) -> usize {
    let mut applied = 0;
    for region in regions {
        let values = series.entry(region.clone()).or_default();
        if values.contains_key(&today) {
            continue;
        }
        if let Some(Some(value)) = fallback.get(region) {
            values.insert(today, *value);
            applied += 1;
        }
    }
    applied
}

/// Everything the renderer needs, already merged.
#[derive(Debug, Clone)]
pub struct Overview {
    /// Caller regions, in output order.
    pub regions: Vec<String>,
    /// Displayed dates, newest first.
    pub dates: Vec<NaiveDate>,
    case_incidence: RegionSeries,
    state_hospitalization: DateSeries,
    nds: BTreeMap<NaiveDate, Indicators>,
    /// Soft failures worth surfacing in the report (fallback errors, skipped cells).
    pub diagnostics: Vec<String>,
}

impl Overview {
    pub fn new(
        regions: Vec<String>,
        dates: Vec<NaiveDate>,
        case_incidence: RegionSeries,
        state_hospitalization: DateSeries,
        nds: BTreeMap<NaiveDate, Indicators>,
    ) -> Self {
        Self {
            regions,
            dates,
            case_incidence,
            state_hospitalization,
            nds,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Vec<String>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// 7-day case incidence for a region.
    pub fn case_incidence(&self, region: &str, date: NaiveDate) -> Option<f64> {
        self.case_incidence.get(region)?.get(&date).copied()
    }

    /// Lower-Saxony hospitalization incidence (state ministry feed).
    pub fn nds_hospitalization(&self, date: NaiveDate) -> Option<f64> {
        self.nds.get(&date).map(|i| i.hospitalization_incidence)
    }

    /// Lower-Saxony hospitalization incidence (national feed).
    pub fn state_hospitalization(&self, date: NaiveDate) -> Option<f64> {
        self.state_hospitalization.get(&date).copied()
    }

    pub fn icu_percentage(&self, date: NaiveDate) -> Option<f64> {
        self.nds.get(&date).map(|i| i.icu_percentage)
    }
}
