#![forbid(unsafe_code)]
use chrono::NaiveDate;
use skud_tabell_recon::detector::{detect_all_shifts, DetectorWindows};
use skud_tabell_recon::model::{Month, PunchRecord, TabellEntry};
use skud_tabell_recon::{comparator, ShiftType};
use std::collections::BTreeMap;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn punch(emp: &str, y: i32, m: u32, d: u32, h: u32, mi: u32) -> PunchRecord {
    let punch_date = date(y, m, d);
    let punch_time = chrono::NaiveTime::from_hms_opt(h, mi, 0).unwrap();
    PunchRecord::new(emp.to_string(), punch_date, punch_time)
}

fn tabell_entry(emp: &str, month: Month, daily: &[(u32, f64)]) -> TabellEntry {
    let mut daily_hours = BTreeMap::new();
    for (day, hours) in daily {
        daily_hours.insert(*day, *hours);
    }
    TabellEntry {
        employee_id: emp.to_string(),
        name: "Alice".to_string(),
        job_title: "Operator".to_string(),
        company: "Acme".to_string(),
        project: "P1".to_string(),
        month,
        daily_hours,
    }
}

/// End-to-end pipeline: punches in, tabell entries in, a JSON-ready
/// comparison result out. No file I/O — this exercises the pure
/// detector + comparator seam directly.
#[test]
fn pipeline_reconciles_a_day_shift_against_an_under_reported_tabell() {
    let punches = vec![punch("E1", 2025, 3, 10, 6, 0), punch("E1", 2025, 3, 10, 16, 48)];
    let entries = vec![tabell_entry("E1", Month::March, &[(10, 8.0)])];

    let from = date(2025, 3, 1);
    let to = date(2025, 3, 31);
    let (by_emp, broken) = detect_all_shifts(&punches, from, to, &DetectorWindows::default());
    assert!(broken.is_empty());

    let result = comparator::compare(&by_emp, &broken, &entries, from, to);
    assert_eq!(result.comparison.len(), 1);
    assert_eq!(result.summary.matched_employees, 1);
    assert_eq!(result.summary.broken_count, 0);

    let day = &result.comparison[0].days["2025-03-10"];
    assert_eq!(day.tabell_hours, 8.0);
    assert_eq!(day.skud_hours, 10.8);
    assert_eq!(day.diff, -2.8);
    assert_eq!(day.shift_type, Some(ShiftType::Day));
}

/// An employee with a single stray punch produces a broken shift, not a
/// day shift, and it is flagged as such on the day it is attributed to.
#[test]
fn pipeline_flags_an_unpaired_punch_as_broken() {
    let punches = vec![punch("E2", 2025, 3, 10, 8, 0)];
    let entries = vec![tabell_entry("E2", Month::March, &[(10, 8.0)])];

    let from = date(2025, 3, 1);
    let to = date(2025, 3, 31);
    let (by_emp, broken) = detect_all_shifts(&punches, from, to, &DetectorWindows::default());
    assert!(by_emp.is_empty());
    assert_eq!(broken.len(), 1);

    let result = comparator::compare(&by_emp, &broken, &entries, from, to);
    let day = &result.comparison[0].days["2025-03-10"];
    assert!(day.broken);
    assert_eq!(result.broken_shifts.len(), 1);
    assert_eq!(result.broken_shifts[0].employee_id, "E2");
}

/// A post-midnight night shift is attributed to the previous calendar
/// date even though both of its punches land on the later date.
#[test]
fn pipeline_attributes_post_midnight_shift_to_previous_day() {
    let punches = vec![punch("E3", 2025, 3, 11, 1, 0), punch("E3", 2025, 3, 11, 9, 0)];
    let entries = vec![tabell_entry("E3", Month::March, &[(10, 8.0), (11, 0.0)])];

    let from = date(2025, 3, 1);
    let to = date(2025, 3, 31);
    let (by_emp, broken) = detect_all_shifts(&punches, from, to, &DetectorWindows::default());
    assert!(broken.is_empty());

    let result = comparator::compare(&by_emp, &broken, &entries, from, to);
    let day10 = &result.comparison[0].days["2025-03-10"];
    let day11 = &result.comparison[0].days["2025-03-11"];
    assert_eq!(day10.skud_hours, 8.0);
    assert_eq!(day10.shift_type, Some(ShiftType::Night));
    assert_eq!(day11.skud_hours, 0.0);
}
