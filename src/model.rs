use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One access-control event for one employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunchRecord {
    pub employee_id: String,
    pub punch_date: NaiveDate,
    pub punch_time: NaiveTime,
    pub punch_datetime: NaiveDateTime,
}

impl PunchRecord {
    pub fn new(employee_id: String, punch_date: NaiveDate, punch_time: NaiveTime) -> Self {
        let punch_datetime = NaiveDateTime::new(punch_date, punch_time);
        Self {
            employee_id,
            punch_date,
            punch_time,
            punch_datetime,
        }
    }
}

/// Tag on a detected [`Shift`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Day,
    Night,
    Broken,
}

impl ShiftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Day => "day",
            ShiftType::Night => "night",
            ShiftType::Broken => "broken",
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inferred work interval, built from one or two punches.
#[derive(Debug, Clone, PartialEq)]
pub struct Shift {
    pub employee_id: String,
    pub shift_type: ShiftType,
    pub attributed_date: NaiveDate,
    pub start_punch: NaiveDateTime,
    pub end_punch: Option<NaiveDateTime>,
    pub hours: f64,
}

impl Shift {
    /// Builds a paired (non-broken) shift, computing `hours` from the
    /// punch span and rounding to one decimal for display.
    pub fn paired(
        employee_id: String,
        shift_type: ShiftType,
        attributed_date: NaiveDate,
        start_punch: NaiveDateTime,
        end_punch: NaiveDateTime,
    ) -> Self {
        let seconds = (end_punch - start_punch).num_seconds() as f64;
        let hours = round1(seconds / 3600.0);
        Self {
            employee_id,
            shift_type,
            attributed_date,
            start_punch,
            end_punch: Some(end_punch),
            hours,
        }
    }

    pub fn broken(employee_id: String, attributed_date: NaiveDate, start_punch: NaiveDateTime) -> Self {
        Self {
            employee_id,
            shift_type: ShiftType::Broken,
            attributed_date,
            start_punch,
            end_punch: None,
            hours: 0.0,
        }
    }
}

/// Rounds to one decimal place, matching the Python reference's `round(x, 1)`.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// English month names, case-insensitive, bidirectional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl Month {
    pub fn from_number(n: u32) -> Option<Self> {
        use Month::*;
        Some(match n {
            1 => January,
            2 => February,
            3 => March,
            4 => April,
            5 => May,
            6 => June,
            7 => July,
            8 => August,
            9 => September,
            10 => October,
            11 => November,
            12 => December,
            _ => return None,
        })
    }

    /// Case-insensitive lookup by English name, e.g. `"march"` or `"March"`.
    pub fn from_name(name: &str) -> Option<Self> {
        use Month::*;
        Some(match name.to_ascii_lowercase().as_str() {
            "january" => January,
            "february" => February,
            "march" => March,
            "april" => April,
            "may" => May,
            "june" => June,
            "july" => July,
            "august" => August,
            "september" => September,
            "october" => October,
            "november" => November,
            "december" => December,
            _ => return None,
        })
    }

    pub fn number(&self) -> u32 {
        *self as u32
    }

    /// Capitalized English name, e.g. `"March"`.
    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

/// One tabell row: one employee's planned hours for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct TabellEntry {
    pub employee_id: String,
    pub name: String,
    pub job_title: String,
    pub company: String,
    pub project: String,
    pub month: Month,
    /// day-of-month (1..31) -> planned hours
    pub daily_hours: BTreeMap<u32, f64>,
}

impl TabellEntry {
    pub fn hours_on(&self, day: u32) -> f64 {
        self.daily_hours.get(&day).copied().unwrap_or(0.0)
    }
}

/// Per-employee, per-date comparison cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayComparison {
    #[serde(rename = "tabell")]
    pub tabell_hours: f64,
    #[serde(rename = "skud")]
    pub skud_hours: f64,
    pub diff: f64,
    pub broken: bool,
    pub shift_type: Option<ShiftType>,
}

/// Per-employee comparison row.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub employee_id: String,
    pub name: String,
    pub job_title: String,
    pub days: BTreeMap<String, DayComparison>,
}

/// A flattened, JSON-friendly broken shift entry.
#[derive(Debug, Clone, Serialize)]
pub struct BrokenShiftOut {
    pub employee_id: String,
    pub name: String,
    pub attributed_date: String,
    pub punch_time: String,
    pub estimated_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_employees_tabell: usize,
    pub total_employees_skud: usize,
    pub matched_employees: usize,
    pub broken_count: usize,
    pub date_range: [String; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub comparison: Vec<ComparisonRow>,
    pub broken_shifts: Vec<BrokenShiftOut>,
    pub summary: Summary,
}
