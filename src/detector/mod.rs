//! Four-pass shift detection: turns an unordered stream of single-punch
//! events per employee into attributed shifts, plus the unpaired
//! leftovers ("broken" shifts).
//!
//! Pass priority is load-bearing and intentional:
//! 1. Day shifts (same-date pairs claim first, so Pass 2 cannot steal a
//!    day shift's end punch as a night-shift start).
//! 2. Overnight night shifts (evening start → next-morning end).
//! 3. Post-midnight night shifts (both punches on the same date).
//! 4. Everything left over becomes a broken shift.

mod passes;
mod types;
mod util;

pub use types::DetectorWindows;

use crate::model::{PunchRecord, Shift, ShiftType};
use std::collections::HashMap;
use types::PunchState;

use chrono::NaiveDate;

/// Runs the four-pass detector for every employee present in `punches`,
/// then drops any shift whose `attributed_date` falls outside
/// `[date_from, date_to]`.
///
/// Returns `(shifts_by_employee, broken_shifts)`: the first groups
/// surviving non-broken shifts by employee id (an employee with no
/// surviving shifts is absent from the map, not mapped to an empty
/// vector); the second is the flat list of broken shifts across all
/// employees.
pub fn detect_all_shifts(
    punches: &[PunchRecord],
    date_from: NaiveDate,
    date_to: NaiveDate,
    windows: &DetectorWindows,
) -> (HashMap<String, Vec<Shift>>, Vec<Shift>) {
    let mut by_employee: HashMap<String, Vec<PunchRecord>> = HashMap::new();
    for p in punches {
        by_employee.entry(p.employee_id.clone()).or_default().push(p.clone());
    }

    let mut shifts_by_employee = HashMap::new();
    let mut broken_shifts = Vec::new();

    for (employee_id, mut emp_punches) in by_employee {
        emp_punches.sort_by_key(|p| p.punch_datetime);
        let shifts = detect_employee_shifts(&employee_id, &emp_punches, windows);

        let mut valid = Vec::new();
        for s in shifts {
            if s.attributed_date < date_from || s.attributed_date > date_to {
                continue;
            }
            if s.shift_type == ShiftType::Broken {
                broken_shifts.push(s);
            } else {
                valid.push(s);
            }
        }
        if !valid.is_empty() {
            shifts_by_employee.insert(employee_id, valid);
        }
    }

    (shifts_by_employee, broken_shifts)
}

/// Runs the four passes for one employee's sorted punch list.
fn detect_employee_shifts(
    employee_id: &str,
    sorted_punches: &[PunchRecord],
    windows: &DetectorWindows,
) -> Vec<Shift> {
    let mut state = vec![PunchState::Fresh; sorted_punches.len()];
    let mut shifts = Vec::new();

    passes::day_shifts(employee_id, sorted_punches, &mut state, windows, &mut shifts);
    passes::overnight_night_shifts(employee_id, sorted_punches, &mut state, windows, &mut shifts);
    passes::post_midnight_night_shifts(employee_id, sorted_punches, &mut state, windows, &mut shifts);
    passes::broken_shifts(employee_id, sorted_punches, &mut state, windows, &mut shifts);

    shifts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn punch(emp: &str, y: i32, m: u32, d: u32, h: u32, mi: u32) -> PunchRecord {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let time = NaiveTime::from_hms_opt(h, mi, 0).unwrap();
        PunchRecord::new(emp.to_string(), date, time)
    }

    fn range(y: i32, m: u32, from_d: u32, to_d: u32) -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(y, m, from_d).unwrap(),
            NaiveDate::from_ymd_opt(y, m, to_d).unwrap(),
        )
    }

    #[test]
    fn s1_pure_day_shift() {
        let punches = vec![punch("E1", 2025, 3, 10, 6, 0), punch("E1", 2025, 3, 10, 16, 50)];
        let (from, to) = range(2025, 3, 1, 31);
        let (by_emp, broken) = detect_all_shifts(&punches, from, to, &DetectorWindows::default());
        assert!(broken.is_empty());
        let shifts = &by_emp["E1"];
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].shift_type, ShiftType::Day);
        assert_eq!(shifts[0].attributed_date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(shifts[0].hours, 10.8);
    }

    #[test]
    fn s2_overnight_night_shift() {
        let punches = vec![punch("E1", 2025, 3, 10, 17, 0), punch("E1", 2025, 3, 11, 5, 30)];
        let (from, to) = range(2025, 3, 1, 31);
        let (by_emp, broken) = detect_all_shifts(&punches, from, to, &DetectorWindows::default());
        assert!(broken.is_empty());
        let shifts = &by_emp["E1"];
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].shift_type, ShiftType::Night);
        assert_eq!(shifts[0].attributed_date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(shifts[0].hours, 12.5);
    }

    #[test]
    fn s3_post_midnight_night_shift() {
        let punches = vec![punch("E1", 2025, 3, 11, 1, 0), punch("E1", 2025, 3, 11, 9, 0)];
        let (from, to) = range(2025, 3, 1, 31);
        let (by_emp, broken) = detect_all_shifts(&punches, from, to, &DetectorWindows::default());
        assert!(broken.is_empty());
        let shifts = &by_emp["E1"];
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].shift_type, ShiftType::Night);
        assert_eq!(shifts[0].attributed_date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(shifts[0].hours, 8.0);
    }

    #[test]
    fn s4_day_plus_next_night_same_date_overlap() {
        let punches = vec![
            punch("E1", 2025, 3, 10, 6, 0),
            punch("E1", 2025, 3, 10, 16, 0),
            punch("E1", 2025, 3, 10, 17, 0),
            punch("E1", 2025, 3, 11, 5, 0),
        ];
        let (from, to) = range(2025, 3, 1, 31);
        let (by_emp, broken) = detect_all_shifts(&punches, from, to, &DetectorWindows::default());
        assert!(broken.is_empty());
        let mut shifts = by_emp["E1"].clone();
        shifts.sort_by_key(|s| s.start_punch);
        assert_eq!(shifts.len(), 2);
        assert_eq!(shifts[0].shift_type, ShiftType::Day);
        assert_eq!(shifts[0].hours, 10.0);
        assert_eq!(shifts[1].shift_type, ShiftType::Night);
        assert_eq!(shifts[1].hours, 12.0);
        assert_eq!(shifts[1].attributed_date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }

    #[test]
    fn s5_single_punch_is_broken_with_day_start_attribution() {
        let punches = vec![punch("E1", 2025, 3, 10, 8, 0)];
        let (from, to) = range(2025, 3, 1, 31);
        let (by_emp, broken) = detect_all_shifts(&punches, from, to, &DetectorWindows::default());
        assert!(by_emp.is_empty());
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].shift_type, ShiftType::Broken);
        assert_eq!(broken[0].attributed_date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(broken[0].hours, 0.0);
        assert!(broken[0].end_punch.is_none());
    }

    #[test]
    fn every_punch_is_accounted_for() {
        let punches = vec![
            punch("E1", 2025, 3, 10, 6, 0),
            punch("E1", 2025, 3, 10, 12, 0), // lunch badge, swallowed
            punch("E1", 2025, 3, 10, 16, 0),
            punch("E1", 2025, 3, 12, 3, 0), // stray
        ];
        let (from, to) = range(2025, 3, 1, 31);
        let (by_emp, broken) = detect_all_shifts(&punches, from, to, &DetectorWindows::default());
        let claimed_shifts = by_emp.get("E1").map(|v| v.len()).unwrap_or(0);
        // one day shift (06:00-16:00, swallowing the lunch badge) + one broken
        assert_eq!(claimed_shifts, 1);
        assert_eq!(broken.len(), 1);
    }

    #[test]
    fn range_post_filter_drops_out_of_range_shifts() {
        let punches = vec![punch("E1", 2025, 3, 10, 6, 0), punch("E1", 2025, 3, 10, 16, 0)];
        let from = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let (by_emp, broken) = detect_all_shifts(&punches, from, to, &DetectorWindows::default());
        assert!(by_emp.is_empty());
        assert!(broken.is_empty());
    }
}
