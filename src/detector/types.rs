use std::ops::RangeInclusive;

/// Per-punch state. Terminal once claimed — a punch is claimed either as
/// an endpoint (start or end of a paired shift) or as a swallowed
/// intermediate punch between an endpoint pair; both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PunchState {
    Fresh,
    ClaimedDay,
    ClaimedNight,
    ClaimedBroken,
}

impl PunchState {
    pub(super) fn is_fresh(self) -> bool {
        matches!(self, PunchState::Fresh)
    }
}

/// Candidate-hour windows used by the four passes.
///
/// These are tuned to one site's shift schedule, not universal law — they
/// are a parameter, not a constant, per the open design question on window
/// overlap (spec §9B(a)).
#[derive(Debug, Clone)]
pub struct DetectorWindows {
    /// Pass 1: hour range of a candidate day-shift start punch.
    pub day_start_hours: RangeInclusive<u32>,
    /// Pass 1: hour range of a candidate day-shift end punch, same date.
    pub day_end_hours: RangeInclusive<u32>,
    /// Pass 1: reject a day pairing whose span exceeds this many hours.
    pub day_max_span_hours: f64,
    /// Pass 2: hour range of a candidate overnight-night start punch.
    pub night_start_hours: RangeInclusive<u32>,
    /// Pass 2: an end punch on `start.date + 1` qualifies if its hour is
    /// at most this value.
    pub night_end_max_hour: u32,
    /// Pass 3 (and Pass 4's broken-punch attribution): hour range of a
    /// post-midnight start punch, attributed to the previous date.
    pub post_midnight_start_hours: RangeInclusive<u32>,
    /// Pass 3: hour range of a same-date post-midnight end punch.
    pub post_midnight_end_hours: RangeInclusive<u32>,
}

impl Default for DetectorWindows {
    fn default() -> Self {
        Self {
            day_start_hours: 4..=10,
            day_end_hours: 14..=20,
            day_max_span_hours: 12.5,
            night_start_hours: 15..=23,
            night_end_max_hour: 13,
            post_midnight_start_hours: 0..=4,
            post_midnight_end_hours: 5..=13,
        }
    }
}
