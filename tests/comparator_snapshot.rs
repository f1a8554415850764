#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime};
use skud_tabell_recon::comparator;
use skud_tabell_recon::model::{Month, Shift, ShiftType, TabellEntry};
use std::collections::{BTreeMap, HashMap};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn datetime(y: i32, m: u32, d: u32, h: u32, mi: u32) -> chrono::NaiveDateTime {
    chrono::NaiveDateTime::new(date(y, m, d), NaiveTime::from_hms_opt(h, mi, 0).unwrap())
}

/// Snapshot of the full `ComparisonResult` JSON shape: a day shift, a
/// night shift, and a broken shift across two employees over a 2-day
/// window, so every field family (comparison rows, broken shifts,
/// summary) appears in the frozen output.
#[test]
fn comparison_result_json_shape() {
    let from = date(2025, 3, 10);
    let to = date(2025, 3, 11);

    let mut by_emp = HashMap::new();
    by_emp.insert(
        "1".to_string(),
        vec![Shift::paired(
            "1".to_string(),
            ShiftType::Day,
            date(2025, 3, 10),
            datetime(2025, 3, 10, 6, 0),
            datetime(2025, 3, 10, 16, 48),
        )],
    );
    by_emp.insert(
        "2".to_string(),
        vec![Shift::paired(
            "2".to_string(),
            ShiftType::Night,
            date(2025, 3, 10),
            datetime(2025, 3, 10, 17, 0),
            datetime(2025, 3, 11, 5, 30),
        )],
    );

    let broken = vec![Shift::broken("2".to_string(), date(2025, 3, 11), datetime(2025, 3, 11, 8, 0))];

    let mut hours1 = BTreeMap::new();
    hours1.insert(10, 8.0);
    hours1.insert(11, 0.0);
    let mut hours2 = BTreeMap::new();
    hours2.insert(10, 12.0);
    hours2.insert(11, 8.0);

    let entries = vec![
        TabellEntry {
            employee_id: "1".to_string(),
            name: "Alice".to_string(),
            job_title: "Operator".to_string(),
            company: "Acme".to_string(),
            project: "P1".to_string(),
            month: Month::March,
            daily_hours: hours1,
        },
        TabellEntry {
            employee_id: "2".to_string(),
            name: "Bob".to_string(),
            job_title: "Guard".to_string(),
            company: "Acme".to_string(),
            project: "P2".to_string(),
            month: Month::March,
            daily_hours: hours2,
        },
    ];

    let result = comparator::compare(&by_emp, &broken, &entries, from, to);
    insta::assert_json_snapshot!(result);
}
