//! Generic delimited-text ingest driven by a declarative per-feed schema.
//!
//! A schema names the delimiter(s), how many header lines to skip, which columns must
//! equal which values for a row to qualify, and where the date, the values and
//! (optionally) the region label live. One routine handles every feed.
//!
//! Failure policy is strict: a row with too few fields, or a qualifying row with an
//! unparseable date/number, aborts the whole extraction. Rows that fail a filter are
//! dropped silently and never have their numbers parsed.

use std::collections::btree_map::Entry;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{DateSeries, RegionSeries};
use crate::error::AppError;
use crate::io::numbers::{DateFormat, NumberFormat};
use crate::io::regions::unique_match;

/// Case-insensitive equality filter on one column.
#[derive(Debug, Clone)]
pub struct ColumnFilter {
    pub column: usize,
    pub equals: String,
}

impl ColumnFilter {
    pub fn new(column: usize, equals: impl Into<String>) -> Self {
        Self {
            column,
            equals: equals.into(),
        }
    }

    fn matches(&self, record: &StringRecord) -> bool {
        record
            .get(self.column)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case(self.equals.trim()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DateColumn {
    pub column: usize,
    pub format: DateFormat,
}

#[derive(Debug, Clone, Copy)]
pub struct ValueColumn {
    pub column: usize,
    pub format: NumberFormat,
}

/// Layout of one delimited feed.
#[derive(Debug, Clone)]
pub struct FeedSchema {
    /// Used in error messages.
    pub name: &'static str,
    /// Tried in order; the first split with at least `min_fields` fields wins.
    pub delimiters: Vec<u8>,
    pub quoting: bool,
    pub skip_lines: usize,
    pub min_fields: usize,
    pub filters: Vec<ColumnFilter>,
    pub date: DateColumn,
    pub values: Vec<ValueColumn>,
    pub region: Option<usize>,
}

/// One qualifying, fully parsed row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRow {
    /// 1-based line number in the source text.
    pub line: usize,
    pub date: NaiveDate,
    pub label: Option<String>,
    /// One entry per `FeedSchema::values`, in schema order.
    pub values: Vec<f64>,
}

/// Parse every qualifying row of `text` according to `schema`.
pub fn parse_rows(text: &str, schema: &FeedSchema) -> Result<Vec<FeedRow>, AppError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut rows = Vec::new();

    for (idx, line) in text.lines().enumerate().skip(schema.skip_lines) {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let record = split_line(line, schema).ok_or_else(|| {
            AppError::data(format!(
                "{}: line {line_no}: expected at least {} fields",
                schema.name, schema.min_fields
            ))
        })?;

        if !schema.filters.iter().all(|filter| filter.matches(&record)) {
            continue;
        }

        let row = parse_record(&record, line_no, schema)
            .map_err(|e| AppError::data(format!("{}: line {line_no}: {e}", schema.name)))?;
        rows.push(row);
    }

    tracing::debug!(feed = schema.name, rows = rows.len(), "parsed delimited feed");
    Ok(rows)
}

/// Flatten rows into a single date series using the first value column.
///
/// A later row for the same date replaces an earlier one.
pub fn to_date_series(rows: &[FeedRow]) -> DateSeries {
    rows.iter()
        .filter_map(|row| row.values.first().map(|v| (row.date, *v)))
        .collect()
}

/// Group rows by caller region, then by date, using the first value column.
///
/// Rows whose label matches no region, or more than one, are dropped. Two rows for the
/// same region and date with different values are a fatal conflict.
pub fn to_region_series(
    rows: &[FeedRow],
    regions: &[String],
    feed: &str,
) -> Result<RegionSeries, AppError> {
    let mut out = RegionSeries::new();

    for row in rows {
        let Some(label) = row.label.as_deref() else {
            continue;
        };
        let Some(region) = unique_match(label, regions) else {
            continue;
        };
        let Some(&value) = row.values.first() else {
            continue;
        };

        let series = out.entry(region.to_string()).or_default();
        match series.entry(row.date) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(slot) => {
                if *slot.get() != value {
                    return Err(AppError::data(format!(
                        "{feed}: line {}: expected exactly one value for '{region}' on {}, found {} and {value}",
                        row.line,
                        row.date,
                        slot.get()
                    )));
                }
            }
        }
    }

    Ok(out)
}

fn split_line(line: &str, schema: &FeedSchema) -> Option<StringRecord> {
    schema.delimiters.iter().find_map(|&delimiter| {
        let record = split_with(line, delimiter, schema.quoting)?;
        (record.len() >= schema.min_fields).then_some(record)
    })
}

fn split_with(line: &str, delimiter: u8, quoting: bool) -> Option<StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(quoting)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => Some(record),
        _ => None,
    }
}

fn parse_record(record: &StringRecord, line: usize, schema: &FeedSchema) -> Result<FeedRow, String> {
    let date = schema.date.format.parse(field(record, schema.date.column)?)?;

    let label = match schema.region {
        Some(column) => Some(field(record, column)?.to_string()),
        None => None,
    };

    let values = schema
        .values
        .iter()
        .map(|col| col.format.parse(field(record, col.column)?))
        .collect::<Result<Vec<f64>, String>>()?;

    Ok(FeedRow {
        line,
        date,
        label,
        values,
    })
}

fn field(record: &StringRecord, column: usize) -> Result<&str, String> {
    record
        .get(column)
        .ok_or_else(|| format!("missing field at position {column}"))
}
