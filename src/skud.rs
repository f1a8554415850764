//! SKUD workbook reader: decodes the XLSX punch export into
//! [`PunchRecord`] values.

use crate::error::{ReconError, Result};
use crate::model::PunchRecord;
use calamine::{open_workbook, Data, DataType, Range, Reader, Xlsx};
use chrono::{Duration, NaiveDate, NaiveTime};
use std::path::Path;
use tracing::debug;

const HEADER_SCAN_ROWS: usize = 3;
const COL_EMPLOYEE_ID: &str = "Employee ID";
const COL_DATE: &str = "Date";
const COL_TIME: &str = "Time";

/// Parses the SKUD XLSX export and returns punch records within
/// `[date_from - 1 day, date_to + 1 day]`.
///
/// The one-day buffer on each side is load-bearing: it lets the detector
/// assemble night shifts whose start or end punch falls just outside the
/// strict requested range. The detector re-filters by the strict range
/// once shifts are attributed.
pub fn parse_skud_xlsx<P: AsRef<Path>>(
    path: P,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<Vec<PunchRecord>> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| ReconError::BadInput(format!("cannot open {}: {e}", path.display())))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ReconError::BadInput("workbook has no worksheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ReconError::BadInput(format!("cannot read worksheet {sheet_name}: {e}")))?;

    let (header_row, col_map) = find_header(&range)?;

    let emp_col = *col_map
        .get(COL_EMPLOYEE_ID)
        .ok_or_else(|| missing_columns_error(&col_map))?;
    let date_col = *col_map
        .get(COL_DATE)
        .ok_or_else(|| missing_columns_error(&col_map))?;
    let time_col = *col_map
        .get(COL_TIME)
        .ok_or_else(|| missing_columns_error(&col_map))?;

    let buffer_from = date_from - Duration::days(1);
    let buffer_to = date_to + Duration::days(1);

    let mut punches = Vec::new();
    for row in range.rows().skip(header_row + 1) {
        let emp_cell = row.get(emp_col);
        let date_cell = row.get(date_col);
        let time_cell = row.get(time_col);

        let (Some(emp_cell), Some(date_cell), Some(time_cell)) = (emp_cell, date_cell, time_cell)
        else {
            continue;
        };
        if emp_cell.is_empty() || date_cell.is_empty() || time_cell.is_empty() {
            continue;
        }

        let employee_id = emp_cell.to_string().trim().to_string();

        let Some(punch_date) = parse_date_cell(date_cell) else {
            debug!("skud row: unparseable date cell, skipping");
            continue;
        };
        if punch_date < buffer_from || punch_date > buffer_to {
            continue;
        }

        let Some(punch_time) = parse_time_cell(time_cell) else {
            debug!("skud row: unparseable time cell, skipping");
            continue;
        };

        punches.push(PunchRecord::new(employee_id, punch_date, punch_time));
    }

    Ok(punches)
}

fn missing_columns_error(col_map: &std::collections::HashMap<String, usize>) -> ReconError {
    let mut found: Vec<&str> = col_map.keys().map(|s| s.as_str()).collect();
    found.sort_unstable();
    ReconError::BadInput(format!(
        "missing required columns (Employee ID, Date, Time). found: {found:?}"
    ))
}

/// Scans the first [`HEADER_SCAN_ROWS`] rows for the header row — the
/// first one containing a cell whose string value is literally
/// `"Employee ID"` — and maps its non-empty cell labels to column indices.
fn find_header(range: &Range<Data>) -> Result<(usize, std::collections::HashMap<String, usize>)> {
    for (row_idx, row) in range.rows().take(HEADER_SCAN_ROWS).enumerate() {
        let has_employee_id = row
            .iter()
            .any(|cell| cell.get_string() == Some(COL_EMPLOYEE_ID));
        if !has_employee_id {
            continue;
        }
        let mut col_map = std::collections::HashMap::new();
        for (col_idx, cell) in row.iter().enumerate() {
            if !cell.is_empty() {
                col_map.insert(cell.to_string().trim().to_string(), col_idx);
            }
        }
        return Ok((row_idx, col_map));
    }
    Err(ReconError::ParseFatal(
        "could not find header row with 'Employee ID' column".to_string(),
    ))
}

fn parse_date_cell(cell: &Data) -> Option<NaiveDate> {
    if let Some(d) = cell.as_date() {
        return Some(d);
    }
    let s = cell.get_string()?;
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn parse_time_cell(cell: &Data) -> Option<NaiveTime> {
    if let Some(t) = cell.as_time() {
        return Some(t);
    }
    let s = cell.get_string()?;
    NaiveTime::parse_from_str(s.trim(), "%H:%M:%S").ok()
}
