//! Core data types shared across the scraping session
//!
//! These types represent one scraped class occurrence and its parts.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Wall-clock time of day in 24-hour form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ClockTime {
    pub(crate) hour: u32,
    pub(crate) minute: u32,
}

impl ClockTime {
    pub(crate) fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }
}

/// Start/end of a class with the signed difference in minutes.
///
/// `duration_minutes` is never clamped: a malformed range such as
/// `10:00am-9:00am` keeps its negative value so callers can reject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TimeRange {
    pub(crate) start: ClockTime,
    pub(crate) end: ClockTime,
    #[serde(alias = "duration_minutes")]
    pub(crate) duration_minutes: i32,
}

impl TimeRange {
    pub(crate) fn between(start: ClockTime, end: ClockTime) -> Self {
        let duration_minutes = (end.hour as i32 - start.hour as i32) * 60
            + (end.minute as i32 - start.minute as i32);
        Self {
            start,
            end,
            duration_minutes,
        }
    }
}

/// WGS84 coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Coordinates {
    pub(crate) lat: f64,
    pub(crate) lng: f64,
}

/// A room resolved to a physical place. Always fully populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LocationInfo {
    #[serde(alias = "place_name")]
    pub(crate) place_name: String,
    pub(crate) room: String,
    pub(crate) floor: i32,
    pub(crate) coordinates: Coordinates,
    /// Generic map search link built from the coordinates
    #[serde(alias = "map_url")]
    pub(crate) map_url: String,
    /// Campus map deep link keyed by the upstream place id
    #[serde(alias = "campus_map_url")]
    pub(crate) campus_map_url: String,
}

/// One class occurrence scraped from a timetable page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ScrapedRecord {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) title: String,
    pub(crate) date: NaiveDate,
    pub(crate) time: TimeRange,
    /// `None` when no physical room could be resolved (online classes, lookup failures)
    pub(crate) location: Option<LocationInfo>,
}

/// Teaching semester. Stored and displayed as `1` / `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub(crate) enum Semester {
    First,
    Second,
}

impl Semester {
    /// Months 1-5 belong to semester 1, the rest of the year to semester 2
    pub(crate) fn for_month(month: u32) -> Self {
        if (1..=5).contains(&month) {
            Semester::First
        } else {
            Semester::Second
        }
    }

    pub(crate) fn for_date(date: NaiveDate) -> Self {
        Self::for_month(date.month())
    }

    pub(crate) fn number(self) -> u8 {
        match self {
            Semester::First => 1,
            Semester::Second => 2,
        }
    }
}

impl TryFrom<u8> for Semester {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Semester::First),
            2 => Ok(Semester::Second),
            other => Err(format!("semester must be 1 or 2, got {other}")),
        }
    }
}

impl From<Semester> for u8 {
    fn from(semester: Semester) -> Self {
        semester.number()
    }
}

impl std::fmt::Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}
