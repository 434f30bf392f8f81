//! Concrete feed schemas and their typed extractors.
//!
//! - Feed A: Lower-Saxony hospital indicators (`;`, comma decimals, tab fallback)
//! - Feed B: national hospitalization by state (`,`, filtered to one state, age band `00+`)
//! - Feed C: regional case incidence (`;`, quoted, grouped by caller region)

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{DateSeries, Indicators, RegionSeries};
use crate::error::AppError;
use crate::io::delimited::{
    ColumnFilter, DateColumn, FeedSchema, ValueColumn, parse_rows, to_date_series, to_region_series,
};
use crate::io::numbers::{DateFormat, NumberFormat};

/// Jurisdiction kept from feed B.
pub const HOSPITALIZATION_STATE: &str = "Niedersachsen";
/// Age band covering all ages in feed B.
pub const ALL_AGES: &str = "00+";

/// `Daten Stand;Inzidenz;Hospitalisierung;Intensivbetten in %`
pub fn nds_indicators_schema() -> FeedSchema {
    FeedSchema {
        name: "Lower Saxony indicators CSV",
        delimiters: vec![b';', b'\t'],
        quoting: true,
        skip_lines: 1,
        min_fields: 4,
        filters: Vec::new(),
        date: DateColumn {
            column: 0,
            format: DateFormat::Dmy,
        },
        values: [1, 2, 3]
            .into_iter()
            .map(|column| ValueColumn {
                column,
                format: NumberFormat::CommaDecimal,
            })
            .collect(),
        region: None,
    }
}

/// `Datum,Bundesland,Bundesland_Id,Altersgruppe,7T_Hospitalisierung_Faelle,7T_Hospitalisierung_Inzidenz`
pub fn state_hospitalization_schema() -> FeedSchema {
    FeedSchema {
        name: "hospitalization by state CSV",
        delimiters: vec![b','],
        quoting: true,
        skip_lines: 1,
        min_fields: 6,
        filters: vec![
            ColumnFilter::new(1, HOSPITALIZATION_STATE),
            ColumnFilter::new(3, ALL_AGES),
        ],
        date: DateColumn {
            column: 0,
            format: DateFormat::Ymd,
        },
        values: vec![ValueColumn {
            column: 5,
            format: NumberFormat::Plain,
        }],
        region: None,
    }
}

/// Report date at 0, district name at 3, 7-day incidence per 100k at 6.
pub fn regional_incidence_schema() -> FeedSchema {
    FeedSchema {
        name: "regional incidence CSV",
        delimiters: vec![b';'],
        quoting: true,
        skip_lines: 1,
        min_fields: 7,
        filters: Vec::new(),
        date: DateColumn {
            column: 0,
            format: DateFormat::Dmy,
        },
        values: vec![ValueColumn {
            column: 6,
            format: NumberFormat::Plain,
        }],
        region: Some(3),
    }
}

/// Feed A: date -> (case incidence, hospitalization incidence, ICU-bed percentage).
pub fn extract_nds_indicators(text: &str) -> Result<BTreeMap<NaiveDate, Indicators>, AppError> {
    let rows = parse_rows(text, &nds_indicators_schema())?;
    Ok(rows
        .into_iter()
        .filter_map(|row| match row.values.as_slice() {
            [case_incidence, hospitalization_incidence, icu_percentage] => Some((
                row.date,
                Indicators {
                    case_incidence: *case_incidence,
                    hospitalization_incidence: *hospitalization_incidence,
                    icu_percentage: *icu_percentage,
                },
            )),
            _ => None,
        })
        .collect())
}

/// Feed B: date -> 7-day hospitalization incidence for Lower Saxony, all ages.
pub fn extract_state_hospitalization(text: &str) -> Result<DateSeries, AppError> {
    let rows = parse_rows(text, &state_hospitalization_schema())?;
    Ok(to_date_series(&rows))
}

/// Feed C: region -> date -> 7-day case incidence.
pub fn extract_regional_incidence(text: &str, regions: &[String]) -> Result<RegionSeries, AppError> {
    let schema = regional_incidence_schema();
    let rows = parse_rows(text, &schema)?;
    to_region_series(&rows, regions, schema.name)
}
