use crate::model::PunchRecord;
use chrono::Timelike;

pub(super) fn hour_of(p: &PunchRecord) -> u32 {
    p.punch_time.hour()
}

pub(super) fn span_hours(start: &PunchRecord, end: &PunchRecord) -> f64 {
    (end.punch_datetime - start.punch_datetime).num_seconds() as f64 / 3600.0
}
