#![forbid(unsafe_code)]
//! skud-tabell-recon — reconciles a planned timesheet (tabell) against
//! raw access-control punch exports (SKUD) over a date range.
//!
//! - Naive dates/times throughout; no time-zone conversion.
//! - The tabell transport is a seam ([`tabell::TabellSource`]); this
//!   crate ships a local-file implementation only.
//! - Stateless between requests: uploaded workbooks are staged, parsed,
//!   and deleted.

pub mod comparator;
pub mod detector;
pub mod error;
pub mod hours;
pub mod model;
pub mod skud;
pub mod tabell;
pub mod upload;

#[cfg(feature = "server")]
pub mod web;

pub use error::{ReconError, Result};
pub use model::{
    BrokenShiftOut, ComparisonResult, ComparisonRow, DayComparison, Month, PunchRecord, Shift,
    ShiftType, Summary, TabellEntry,
};
