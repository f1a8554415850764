//! Joins tabell entries and detected shifts into a dense day-by-day
//! comparison matrix, plus a summary and the flattened list of broken
//! shifts.

use crate::model::{
    round1, BrokenShiftOut, ComparisonResult, ComparisonRow, DayComparison, Month, Shift,
    ShiftType, Summary, TabellEntry,
};
use chrono::{Datelike, Duration, NaiveDate, Timelike};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Compares detected SKUD shifts against tabell entries over
/// `[date_from, date_to]`.
///
/// The row set is `sorted(employees present in tabell)` — the tabell is
/// the authoritative roster; SKUD-only employees are reflected in the
/// summary counts but do not produce comparison rows.
pub fn compare(
    shifts_by_employee: &HashMap<String, Vec<Shift>>,
    broken_shifts: &[Shift],
    tabell_entries: &[TabellEntry],
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> ComparisonResult {
    let dates = date_range(date_from, date_to);

    let mut tabell_by_emp: BTreeMap<&str, Vec<&TabellEntry>> = BTreeMap::new();
    for entry in tabell_entries {
        tabell_by_emp.entry(&entry.employee_id).or_default().push(entry);
    }

    // employee -> date -> accumulated hours / last-seen shift type
    let mut skud_hours: HashMap<&str, HashMap<NaiveDate, f64>> = HashMap::new();
    let mut skud_shift_type: HashMap<&str, HashMap<NaiveDate, ShiftType>> = HashMap::new();
    for (emp_id, shifts) in shifts_by_employee {
        for s in shifts {
            *skud_hours
                .entry(emp_id.as_str())
                .or_default()
                .entry(s.attributed_date)
                .or_insert(0.0) += s.hours;
            skud_shift_type
                .entry(emp_id.as_str())
                .or_default()
                .insert(s.attributed_date, s.shift_type);
        }
    }

    let mut broken_dates: HashMap<&str, HashSet<NaiveDate>> = HashMap::new();
    for s in broken_shifts {
        broken_dates
            .entry(s.employee_id.as_str())
            .or_default()
            .insert(s.attributed_date);
    }

    let mut comparison = Vec::new();
    for (&emp_id, entries) in &tabell_by_emp {
        let name = entries[0].name.clone();
        let job_title = entries[0].job_title.clone();

        let mut days = BTreeMap::new();
        for &d in &dates {
            let tabell_h = tabell_hours_on(entries, d);
            let skud_h = skud_hours
                .get(emp_id)
                .and_then(|m| m.get(&d))
                .copied()
                .unwrap_or(0.0);
            let shift_type = skud_shift_type.get(emp_id).and_then(|m| m.get(&d)).copied();
            let broken = broken_dates.get(emp_id).map(|s| s.contains(&d)).unwrap_or(false);

            days.insert(
                d.format("%Y-%m-%d").to_string(),
                DayComparison {
                    tabell_hours: tabell_h,
                    skud_hours: round1(skud_h),
                    diff: round1(tabell_h - skud_h),
                    broken,
                    shift_type,
                },
            );
        }

        comparison.push(ComparisonRow {
            employee_id: emp_id.to_string(),
            name,
            job_title,
            days,
        });
    }

    let mut broken_sorted: Vec<&Shift> = broken_shifts.iter().collect();
    broken_sorted.sort_by(|a, b| {
        (a.employee_id.as_str(), a.attributed_date).cmp(&(b.employee_id.as_str(), b.attributed_date))
    });
    let broken_out: Vec<BrokenShiftOut> = broken_sorted
        .into_iter()
        .map(|s| {
            let name = tabell_by_emp
                .get(s.employee_id.as_str())
                .map(|entries| entries[0].name.clone())
                .unwrap_or_default();
            BrokenShiftOut {
                employee_id: s.employee_id.clone(),
                name,
                attributed_date: s.attributed_date.format("%Y-%m-%d").to_string(),
                punch_time: s.start_punch.format("%Y-%m-%d %H:%M:%S").to_string(),
                estimated_type: estimate_shift_type(s.start_punch.hour() as u32).to_string(),
            }
        })
        .collect();

    let broken_employee_ids: HashSet<&str> = broken_shifts.iter().map(|s| s.employee_id.as_str()).collect();
    let skud_employee_ids: HashSet<&str> = shifts_by_employee
        .keys()
        .map(|s| s.as_str())
        .chain(broken_employee_ids)
        .collect();
    let matched = tabell_by_emp.keys().filter(|id| skud_hours.contains_key(**id)).count();

    let summary = Summary {
        total_employees_tabell: tabell_by_emp.len(),
        total_employees_skud: skud_employee_ids.len(),
        matched_employees: matched,
        broken_count: broken_shifts.len(),
        date_range: [date_from.format("%Y-%m-%d").to_string(), date_to.format("%Y-%m-%d").to_string()],
    };

    ComparisonResult {
        comparison,
        broken_shifts: broken_out,
        summary,
    }
}

fn date_range(date_from: NaiveDate, date_to: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = date_from;
    while current <= date_to {
        dates.push(current);
        current += Duration::days(1);
    }
    dates
}

/// Finds the tabell entry whose month matches `d.month()` and reads its
/// hours for `d.day()`, defaulting to zero.
fn tabell_hours_on(entries: &[&TabellEntry], d: NaiveDate) -> f64 {
    let Some(month) = Month::from_number(d.month()) else {
        return 0.0;
    };
    entries
        .iter()
        .find(|e| e.month == month)
        .map(|e| e.hours_on(d.day()))
        .unwrap_or(0.0)
}

/// Heuristic guess at what kind of shift a lone broken punch might belong
/// to, based on the punch's hour alone. Ranges overlap on purpose
/// (mirrors the detector's own overlapping candidate windows); resolved
/// by first match in the order below.
fn estimate_shift_type(hour: u32) -> &'static str {
    if (4..=10).contains(&hour) {
        "day_start?"
    } else if (14..=20).contains(&hour) {
        "day_end?"
    } else if (15..=23).contains(&hour) {
        "night_start?"
    } else if hour <= 4 {
        "night_end?"
    } else {
        "unknown"
    }
}
