//! Fixed column layout of the tabell CSV export.
//!
//! The column-position constants live here rather than scattered across
//! the reader, per the design note on replacing dynamic, string-keyed row
//! access with an explicit schema object.

/// Row 0 is the header row; data starts at row 1.
pub const DATA_START_ROW: usize = 1;

pub const COL_EMPLOYEE_ID: usize = 0;
pub const COL_NAME: usize = 1;
pub const COL_JOB_TITLE: usize = 2;
pub const COL_COMPANY: usize = 3;
/// E: day 1
pub const COL_DAYS_START: usize = 4;
/// AI: day 31
pub const COL_DAYS_END: usize = 34;
/// AJ: month name
pub const COL_MONTH: usize = 35;
/// AK: project / object
pub const COL_PROJECT: usize = 36;

/// Cyrillic prefix the sheet stores on employee IDs (`"ТН21045"`); SKUD
/// carries the bare numeric id (`"21045"`). Stripped case-insensitively
/// from the start of the cell only.
pub const EMPLOYEE_ID_PREFIX: &str = "ТН";

pub fn day_number(col_idx: usize) -> u32 {
    (col_idx - COL_DAYS_START + 1) as u32
}
