//! Number and date parsing for the source feeds.
//!
//! The feeds disagree on conventions (German comma decimals vs plain decimals,
//! `DD.MM.YYYY` vs `YYYY-MM-DD`), so each column in a feed schema names the format
//! it uses. These are plain values; there is no shared formatter state.

use chrono::{Days, NaiveDate};

/// How a numeric column is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// `123.4` (dot decimal, no grouping).
    Plain,
    /// `1.234,5` (German: dot groups thousands, comma is the decimal point).
    CommaDecimal,
}

impl NumberFormat {
    pub fn parse(self, raw: &str) -> Result<f64, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("empty number".to_string());
        }
        let value = match self {
            NumberFormat::Plain => trimmed.parse::<f64>().ok(),
            NumberFormat::CommaDecimal => {
                let normalized: String = trimmed
                    .chars()
                    .filter(|c| *c != '.')
                    .map(|c| if c == ',' { '.' } else { c })
                    .collect();
                normalized.parse::<f64>().ok()
            }
        };
        match value {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(format!("invalid number '{trimmed}' ({})", self.describe())),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            NumberFormat::Plain => "expected plain decimal",
            NumberFormat::CommaDecimal => "expected comma decimal",
        }
    }
}

/// How a date column is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `05.03.2022`
    Dmy,
    /// `2022-03-05`
    Ymd,
}

impl DateFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::Dmy => "%d.%m.%Y",
            DateFormat::Ymd => "%Y-%m-%d",
        }
    }

    pub fn parse(self, raw: &str) -> Result<NaiveDate, String> {
        let trimmed = raw.trim();
        NaiveDate::parse_from_str(trimmed, self.pattern()).map_err(|e| {
            let expected = match self {
                DateFormat::Dmy => "DD.MM.YYYY",
                DateFormat::Ymd => "YYYY-MM-DD",
            };
            format!("invalid date '{trimmed}', expected {expected}: {e}")
        })
    }
}

/// Convert an Excel serial day number (1900 date system) to a calendar date.
///
/// The time-of-day fraction is dropped. Serials below 61 are shifted by one day because
/// the 1900 system counts the nonexistent 1900-02-29.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let whole = serial.floor() as u64;
    let days = if whole < 61 { whole + 1 } else { whole };
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(days))
}
