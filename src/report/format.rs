//! Number and date formatting for the report.
//!
//! Formatters are plain values built once and passed to the renderer.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::report::captions::Captions;

/// Marker for a value no source supplied.
pub const UNKNOWN: &str = "?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueFormat {
    pub fraction_digits: usize,
    pub decimal_separator: char,
    pub grouping_separator: Option<char>,
}

impl ValueFormat {
    /// `1.234,5`
    pub fn german() -> Self {
        Self {
            fraction_digits: 1,
            decimal_separator: ',',
            grouping_separator: Some('.'),
        }
    }

    /// `1,234.5`
    pub fn english() -> Self {
        Self {
            fraction_digits: 1,
            decimal_separator: '.',
            grouping_separator: Some(','),
        }
    }

    pub fn format(&self, value: f64) -> String {
        let fixed = format!("{:.*}", self.fraction_digits, value.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let mut out = String::new();
        let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
        if value.is_sign_negative() && !is_zero {
            out.push('-');
        }
        out.push_str(&group_digits(int_part, self.grouping_separator));
        if let Some(frac) = frac_part {
            out.push(self.decimal_separator);
            out.push_str(frac);
        }
        out
    }

    /// Formatted value, or the unknown marker.
    pub fn format_opt(&self, value: Option<f64>) -> String {
        value.map_or_else(|| UNKNOWN.to_string(), |v| self.format(v))
    }
}

fn group_digits(digits: &str, separator: Option<char>) -> String {
    let Some(sep) = separator else {
        return digits.to_string();
    };
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// `Samstag, 05.03.2022`
pub fn long_date(date: NaiveDate, captions: &Captions) -> String {
    format!("{}, {}", captions.weekday(date.weekday()), date.format("%d.%m.%Y"))
}

/// `Samstag, 05.03.2022, 14:07`
pub fn long_date_time(at: NaiveDateTime, captions: &Captions) -> String {
    format!("{}, {}", long_date(at.date(), captions), at.format("%H:%M"))
}
