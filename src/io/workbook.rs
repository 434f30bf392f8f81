//! Case-incidence workbook (XLSX) extraction.
//!
//! The workbook has one sheet per aggregation level; we want the district sheet, whose
//! exact name has changed between releases, so it is found by substring. Within the
//! sheet, a header row (recognized by two sentinel labels) maps columns to dates, and
//! every row whose district label contains a caller region name carries that region's
//! daily values in the same columns.
//!
//! Column indices are absolute sheet columns; calamine ranges start at the first used
//! cell, so every lookup goes through `cell_at`.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx, open_workbook_from_rs};
use chrono::NaiveDate;

use crate::domain::{DateSeries, RegionSeries};
use crate::error::AppError;
use crate::io::numbers::{DateFormat, excel_serial_to_date};
use crate::io::regions::first_match;

pub const SHEET_MARKER: &str = "LK_7-Tage-Inzidenz-aktualisiert";
pub const HEADER_ID_LABEL: &str = "IdMeldeLandkreis";
pub const HEADER_NAME_LABEL: &str = "MeldeLandkreis";

const ID_COLUMN: usize = 0;
const NAME_COLUMN: usize = 1;
/// First column holding daily values (and, in the header row, dates).
pub const FIRST_DATE_COLUMN: usize = 2;

/// Result of reading the district sheet.
#[derive(Debug, Clone, Default)]
pub struct SheetExtract {
    /// Name of the sheet that was read, if one matched.
    pub sheet: Option<String>,
    pub series: RegionSeries,
    /// Non-fatal oddities (values in columns without a header date).
    pub diagnostics: Vec<String>,
}

/// Read the district sheet from raw XLSX bytes.
///
/// A workbook without a matching sheet yields an empty extract, not an error.
pub fn extract_case_incidence(bytes: &[u8], regions: &[String]) -> Result<SheetExtract, AppError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| AppError::data(format!("Failed to open case incidence workbook: {e}")))?;

    let Some(sheet) = workbook
        .sheet_names()
        .into_iter()
        .find(|name| name.contains(SHEET_MARKER))
    else {
        tracing::warn!(marker = SHEET_MARKER, "no matching sheet in case incidence workbook");
        return Ok(SheetExtract::default());
    };

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| AppError::data(format!("Failed to read sheet '{sheet}': {e}")))?;

    let mut extract = extract_from_range(&range, regions)?;
    extract.sheet = Some(sheet);
    Ok(extract)
}

/// Scan one sheet's cells; see the module docs for the layout.
pub fn extract_from_range(range: &Range<Data>, regions: &[String]) -> Result<SheetExtract, AppError> {
    let mut extract = SheetExtract::default();
    let Some((first_row, first_col)) = range.start() else {
        return Ok(extract);
    };
    let (first_row, first_col) = (first_row as usize, first_col as usize);

    let mut column_dates: HashMap<usize, NaiveDate> = HashMap::new();

    for (offset, cells) in range.rows().enumerate() {
        let row = first_row + offset + 1;
        let end_col = first_col + cells.len();

        let (Some(id), Some(name)) = (
            cell_at(cells, first_col, ID_COLUMN).and_then(label_text),
            cell_at(cells, first_col, NAME_COLUMN).and_then(label_text),
        ) else {
            continue;
        };

        if id == HEADER_ID_LABEL && name == HEADER_NAME_LABEL {
            for col in FIRST_DATE_COLUMN..end_col {
                let Some(cell) = cell_at(cells, first_col, col) else {
                    continue;
                };
                let date = header_date(cell)
                    .map_err(|e| AppError::data(format!("header row {row}, column {col}: {e}")))?;
                if let Some(date) = date {
                    column_dates.insert(col, date);
                }
            }
            tracing::debug!(row, dates = column_dates.len(), "found workbook header row");
            continue;
        }

        let Some(region) = first_match(&name, regions) else {
            continue;
        };
        if extract.series.contains_key(region) {
            return Err(AppError::data(format!(
                "data already present for: {region} (row {row}, label '{name}')"
            )));
        }

        let mut values = DateSeries::new();
        for col in FIRST_DATE_COLUMN..end_col {
            let Some(cell) = cell_at(cells, first_col, col) else {
                continue;
            };
            let value = cell_value(cell)
                .map_err(|e| AppError::data(format!("row {row}, column {col} ('{name}'): {e}")))?;
            let Some(value) = value else {
                continue;
            };
            match column_dates.get(&col) {
                Some(date) => {
                    values.insert(*date, value);
                }
                None => {
                    tracing::warn!(region, row, col, value, "value in column without header date skipped");
                    extract
                        .diagnostics
                        .push(format!("{region}: row {row}, column {col} has no header date; value {value} skipped"));
                }
            }
        }
        extract.series.insert(region.to_string(), values);
    }

    Ok(extract)
}

fn cell_at(cells: &[Data], first_col: usize, col: usize) -> Option<&Data> {
    col.checked_sub(first_col).and_then(|idx| cells.get(idx))
}

/// Text of a label cell; numbers are written without fraction digits or grouping.
fn label_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(format!("{:.0}", f)),
        Data::Int(i) => Some(i.to_string()),
        _ => None,
    }
}

fn header_date(cell: &Data) -> Result<Option<NaiveDate>, String> {
    match cell {
        Data::String(s) if s.trim().is_empty() => Ok(None),
        Data::String(s) => DateFormat::Dmy.parse(s).map(Some),
        Data::DateTime(dt) => Ok(excel_serial_to_date(dt.as_f64())),
        Data::DateTimeIso(s) => {
            let day = s.get(..10).unwrap_or(s);
            DateFormat::Ymd.parse(day).map(Some)
        }
        Data::Float(f) => Ok(excel_serial_to_date(*f)),
        Data::Int(i) => Ok(excel_serial_to_date(*i as f64)),
        _ => Ok(None),
    }
}

fn cell_value(cell: &Data) -> Result<Option<f64>, String> {
    match cell {
        Data::Empty => Ok(None),
        Data::String(s) if s.trim().is_empty() => Ok(None),
        Data::Float(f) => Ok(Some(*f)),
        Data::Int(i) => Ok(Some(*i as f64)),
        Data::DateTime(dt) => Ok(Some(dt.as_f64())),
        other => Err(format!("expected a number, found {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_DATA;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn regions(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    /// Title row, blank row, header row, then the given data rows.
    fn sheet(data_rows: &[(Data, &str, Vec<Data>)]) -> Range<Data> {
        let height = 3 + data_rows.len() as u32;
        let mut range = Range::new((0, 0), (height - 1, 4));
        range.set_value((0, 0), text("Fallzahlen nach Landkreis"));
        range.set_value((2, 0), text(HEADER_ID_LABEL));
        range.set_value((2, 1), text(HEADER_NAME_LABEL));
        range.set_value((2, 2), text("05.03.2022"));
        range.set_value((2, 3), Data::Float(44624.0)); // 04.03.2022
        for (i, (id, name, values)) in data_rows.iter().enumerate() {
            let row = 3 + i as u32;
            range.set_value((row, 0), id.clone());
            range.set_value((row, 1), text(name));
            for (j, value) in values.iter().enumerate() {
                range.set_value((row, 2 + j as u32), value.clone());
            }
        }
        range
    }

    #[test]
    fn maps_header_dates_onto_region_rows() {
        let range = sheet(&[
            (Data::Float(3351.0), "LK Celle", vec![Data::Float(1500.2), Data::Float(1450.0)]),
            (Data::Float(3241.0), "Region Hannover", vec![Data::Float(1400.0), Data::Empty]),
        ]);
        let extract = extract_from_range(&range, &regions(&["Celle", "Hannover"])).unwrap();

        assert_eq!(extract.series.len(), 2);
        assert_eq!(extract.series["Celle"].get(&d(2022, 3, 5)), Some(&1500.2));
        assert_eq!(extract.series["Celle"].get(&d(2022, 3, 4)), Some(&1450.0));
        assert_eq!(extract.series["Hannover"].len(), 1);
        assert!(extract.diagnostics.is_empty());
    }

    #[test]
    fn region_without_row_is_absent() {
        let range = sheet(&[(Data::Float(3351.0), "LK Celle", vec![Data::Float(1.0)])]);
        let extract = extract_from_range(&range, &regions(&["Goslar"])).unwrap();
        assert!(extract.series.is_empty());
    }

    #[test]
    fn ambiguous_label_resolves_in_caller_order() {
        let range = sheet(&[(Data::Float(1.0), "Landkreis X", vec![Data::Float(7.0)])]);
        let extract = extract_from_range(&range, &regions(&["Stadt X", "X"])).unwrap();
        assert_eq!(extract.series["X"].get(&d(2022, 3, 5)), Some(&7.0));
        assert!(!extract.series.contains_key("Stadt X"));
    }

    #[test]
    fn second_row_for_same_region_is_fatal() {
        let range = sheet(&[
            (Data::Float(3351.0), "LK Celle", vec![Data::Float(1.0)]),
            (Data::Float(3352.0), "SK Celle", vec![Data::Float(2.0)]),
        ]);
        let err = extract_from_range(&range, &regions(&["Celle"])).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_DATA);
        assert!(err.message().contains("data already present for: Celle"), "{err}");
    }

    #[test]
    fn rows_missing_a_label_cell_are_skipped() {
        let range = sheet(&[(Data::Empty, "LK Celle", vec![Data::Float(1.0)])]);
        let extract = extract_from_range(&range, &regions(&["Celle"])).unwrap();
        assert!(extract.series.is_empty());
    }

    #[test]
    fn value_without_header_date_is_skipped_with_diagnostic() {
        let mut range = sheet(&[(
            Data::Float(3351.0),
            "LK Celle",
            vec![Data::Float(1.0), Data::Float(2.0), Data::Float(3.0)],
        )]);
        // Column 4 has no header date.
        range.set_value((2, 4), Data::Empty);
        let extract = extract_from_range(&range, &regions(&["Celle"])).unwrap();
        assert_eq!(extract.series["Celle"].len(), 2);
        assert_eq!(extract.diagnostics.len(), 1);
        assert!(extract.diagnostics[0].contains("column 4"));
    }

    #[test]
    fn text_in_value_cell_is_fatal() {
        let range = sheet(&[(Data::Float(3351.0), "LK Celle", vec![text("n/a")])]);
        assert!(extract_from_range(&range, &regions(&["Celle"])).is_err());
    }

    #[test]
    fn unparseable_header_date_is_fatal() {
        let mut range = sheet(&[]);
        range.set_value((2, 2), text("Montag"));
        assert!(extract_from_range(&range, &regions(&["Celle"])).is_err());
    }

    #[test]
    fn numeric_header_labels_are_normalized() {
        assert_eq!(label_text(&Data::Float(1001.0)).as_deref(), Some("1001"));
        assert_eq!(label_text(&Data::Int(1001)).as_deref(), Some("1001"));
        assert_eq!(label_text(&Data::Empty), None);
    }

    #[test]
    fn reads_generated_workbook() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        {
            let notes = workbook.add_worksheet();
            notes.set_name("Erläuterung").unwrap();
            notes.write_string(0, 0, "Hinweise").unwrap();
        }
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name(SHEET_MARKER).unwrap();
            sheet.write_string(4, 0, HEADER_ID_LABEL).unwrap();
            sheet.write_string(4, 1, HEADER_NAME_LABEL).unwrap();
            sheet.write_string(4, 2, "05.03.2022").unwrap();
            sheet.write_number(5, 0, 3351.0).unwrap();
            sheet.write_string(5, 1, "LK Celle").unwrap();
            sheet.write_number(5, 2, 1500.25).unwrap();
        }
        let bytes = workbook.save_to_buffer().unwrap();

        let extract = extract_case_incidence(&bytes, &regions(&["Celle"])).unwrap();
        assert_eq!(extract.sheet.as_deref(), Some(SHEET_MARKER));
        assert_eq!(extract.series["Celle"].get(&d(2022, 3, 5)), Some(&1500.25));
    }

    #[test]
    fn reads_native_date_header_cells() {
        let date_format = rust_xlsxwriter::Format::new().set_num_format("dd.mm.yyyy");
        let header_date = rust_xlsxwriter::ExcelDateTime::from_ymd(2022, 3, 5).unwrap();

        let mut workbook = rust_xlsxwriter::Workbook::new();
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name(SHEET_MARKER).unwrap();
            sheet.write_string(0, 0, HEADER_ID_LABEL).unwrap();
            sheet.write_string(0, 1, HEADER_NAME_LABEL).unwrap();
            sheet
                .write_datetime_with_format(0, 2, &header_date, &date_format)
                .unwrap();
            sheet.write_number(1, 0, 3351.0).unwrap();
            sheet.write_string(1, 1, "LK Celle").unwrap();
            sheet.write_number(1, 2, 12.5).unwrap();
        }
        let bytes = workbook.save_to_buffer().unwrap();

        let extract = extract_case_incidence(&bytes, &regions(&["Celle"])).unwrap();
        assert_eq!(
            extract.series["Celle"],
            DateSeries::from([(d(2022, 3, 5), 12.5)])
        );
        assert!(extract.diagnostics.is_empty());
    }

    #[test]
    fn workbook_without_marker_sheet_is_empty() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        workbook
            .add_worksheet()
            .set_name("BL_7-Tage-Inzidenz")
            .unwrap()
            .write_string(0, 0, HEADER_ID_LABEL)
            .unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let extract = extract_case_incidence(&bytes, &regions(&["Celle"])).unwrap();
        assert!(extract.sheet.is_none());
        assert!(extract.series.is_empty());
    }

    #[test]
    fn garbage_bytes_are_a_load_error() {
        let err = extract_case_incidence(b"not a workbook", &regions(&["Celle"])).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_DATA);
    }
}
