//! Tabell CSV decoding: turns already-fetched rows of the planned
//! timesheet export into structured [`crate::model::TabellEntry`] values.

pub mod schema;

mod reader;

pub use reader::{distinct_projects, fetch_projects, fetch_tabell, read_tabell_rows, LocalFileTabellSource, TabellSource};
