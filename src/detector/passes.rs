use super::types::{DetectorWindows, PunchState};
use super::util::{hour_of, span_hours};
use crate::model::{PunchRecord, Shift, ShiftType};
use chrono::Duration;

/// Pass 1 — day shifts, highest priority.
///
/// Runs first so that a same-date pair like `(06:00, 16:50)` is claimed as
/// a day shift before Pass 2 can steal the `16:50` punch as a night-shift
/// start. Rejects same-date pairings whose span exceeds
/// `windows.day_max_span_hours` — those are almost always a night-shift
/// end punch sharing a calendar date with the next night-shift's start.
pub(super) fn day_shifts(
    employee_id: &str,
    punches: &[PunchRecord],
    state: &mut [PunchState],
    windows: &DetectorWindows,
    shifts: &mut Vec<Shift>,
) {
    let n = punches.len();
    for i in 0..n {
        if !state[i].is_fresh() {
            continue;
        }
        let p = &punches[i];
        if !windows.day_start_hours.contains(&hour_of(p)) {
            continue;
        }

        let mut best_j: Option<usize> = None;
        for j in (i + 1)..n {
            if !state[j].is_fresh() {
                continue;
            }
            let q = &punches[j];
            if q.punch_date != p.punch_date {
                break;
            }
            if windows.day_end_hours.contains(&hour_of(q)) {
                best_j = Some(j);
            }
        }

        let Some(best_j) = best_j else { continue };
        let end = &punches[best_j];
        if span_hours(p, end) > windows.day_max_span_hours {
            continue;
        }

        shifts.push(Shift::paired(
            employee_id.to_string(),
            ShiftType::Day,
            p.punch_date,
            p.punch_datetime,
            end.punch_datetime,
        ));
        state[i] = PunchState::ClaimedDay;
        state[best_j] = PunchState::ClaimedDay;
        for k in (i + 1)..best_j {
            if state[k].is_fresh() && punches[k].punch_date == p.punch_date {
                state[k] = PunchState::ClaimedDay;
            }
        }
    }
}

/// Pass 2 — overnight night shifts (evening start, next-morning end).
pub(super) fn overnight_night_shifts(
    employee_id: &str,
    punches: &[PunchRecord],
    state: &mut [PunchState],
    windows: &DetectorWindows,
    shifts: &mut Vec<Shift>,
) {
    let n = punches.len();
    for i in 0..n {
        if !state[i].is_fresh() {
            continue;
        }
        let p = &punches[i];
        if !windows.night_start_hours.contains(&hour_of(p)) {
            continue;
        }
        let next_date = p.punch_date + Duration::days(1);

        let mut best_j: Option<usize> = None;
        for j in (i + 1)..n {
            if !state[j].is_fresh() {
                continue;
            }
            let q = &punches[j];
            if q.punch_date > next_date {
                break;
            }
            if q.punch_date == next_date && hour_of(q) <= windows.night_end_max_hour {
                best_j = Some(j);
            }
        }

        let Some(best_j) = best_j else { continue };
        let end = &punches[best_j];

        shifts.push(Shift::paired(
            employee_id.to_string(),
            ShiftType::Night,
            p.punch_date,
            p.punch_datetime,
            end.punch_datetime,
        ));
        state[i] = PunchState::ClaimedNight;
        state[best_j] = PunchState::ClaimedNight;
        for k in (i + 1)..best_j {
            if state[k].is_fresh()
                && (punches[k].punch_date == p.punch_date || punches[k].punch_date == next_date)
            {
                state[k] = PunchState::ClaimedNight;
            }
        }
    }
}

/// Pass 3 — post-midnight night shifts (both punches on the same
/// calendar date, attributed to the previous date).
pub(super) fn post_midnight_night_shifts(
    employee_id: &str,
    punches: &[PunchRecord],
    state: &mut [PunchState],
    windows: &DetectorWindows,
    shifts: &mut Vec<Shift>,
) {
    let n = punches.len();
    for i in 0..n {
        if !state[i].is_fresh() {
            continue;
        }
        let p = &punches[i];
        if !windows.post_midnight_start_hours.contains(&hour_of(p)) {
            continue;
        }

        let mut best_j: Option<usize> = None;
        for j in (i + 1)..n {
            if !state[j].is_fresh() {
                continue;
            }
            let q = &punches[j];
            if q.punch_date != p.punch_date {
                break;
            }
            if windows.post_midnight_end_hours.contains(&hour_of(q)) {
                best_j = Some(j);
            }
        }

        let Some(best_j) = best_j else { continue };
        let end = &punches[best_j];
        let attributed_date = p.punch_date - Duration::days(1);

        shifts.push(Shift::paired(
            employee_id.to_string(),
            ShiftType::Night,
            attributed_date,
            p.punch_datetime,
            end.punch_datetime,
        ));
        state[i] = PunchState::ClaimedNight;
        state[best_j] = PunchState::ClaimedNight;
        for k in (i + 1)..best_j {
            if state[k].is_fresh() && punches[k].punch_date == p.punch_date {
                state[k] = PunchState::ClaimedNight;
            }
        }
    }
}

/// Pass 4 — every remaining punch becomes a broken (unpaired) shift.
///
/// Stray punches in `post_midnight_start_hours` (default `[0,4]`) are
/// attributed to the previous date, matching Pass 3's rule. This means a
/// genuine early-morning day shift that mispunches a single minute before
/// the window's upper bound is mis-attributed; this is a known limitation
/// carried over from the reference behavior, not a bug to silently patch.
pub(super) fn broken_shifts(
    employee_id: &str,
    punches: &[PunchRecord],
    state: &mut [PunchState],
    windows: &DetectorWindows,
    shifts: &mut Vec<Shift>,
) {
    for (i, p) in punches.iter().enumerate() {
        if !state[i].is_fresh() {
            continue;
        }
        let attributed_date = if windows.post_midnight_start_hours.contains(&hour_of(p)) {
            p.punch_date - Duration::days(1)
        } else {
            p.punch_date
        };
        shifts.push(Shift::broken(employee_id.to_string(), attributed_date, p.punch_datetime));
        state[i] = PunchState::ClaimedBroken;
    }
}
