//! Core module - record model shared by extraction, session and synthesis

mod time;
mod types;

pub(crate) use time::parse_time_range;
pub(crate) use types::{ClockTime, Coordinates, LocationInfo, ScrapedRecord, Semester, TimeRange};
