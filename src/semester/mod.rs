//! Semester calendar boundaries
//!
//! Maps a year to the navigable span of both semesters. Verified years come
//! from a fixed table; every other year falls back to a formula.

mod formula;
mod table;

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::Semester;

/// Calendar day without a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct MonthDay {
    pub(crate) month: u32,
    pub(crate) day: u32,
}

impl MonthDay {
    pub(crate) const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    pub(crate) fn in_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl From<NaiveDate> for MonthDay {
    fn from(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self::new(date.month(), date.day())
    }
}

/// Start, last day and number of weeks to navigate for one semester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct SemesterBoundary {
    pub(crate) start: MonthDay,
    pub(crate) end: MonthDay,
    /// Calendar weeks to navigate, including non-teaching weeks
    pub(crate) weeks: u32,
}

/// Both semesters of one year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct SemesterDates {
    pub(crate) year: i32,
    pub(crate) first: SemesterBoundary,
    pub(crate) second: SemesterBoundary,
}

impl SemesterDates {
    pub(crate) fn get(&self, semester: Semester) -> &SemesterBoundary {
        match semester {
            Semester::First => &self.first,
            Semester::Second => &self.second,
        }
    }

    /// Monday the given semester starts on
    pub(crate) fn start_date(&self, semester: Semester) -> Option<NaiveDate> {
        self.get(semester).start.in_year(self.year)
    }
}

/// Semester boundaries for `year`: the verified table first, then the formula.
///
/// Returns `None` only for years chrono cannot represent.
pub(crate) fn boundaries_for(year: i32) -> Option<SemesterDates> {
    if let Some(known) = table::lookup(year) {
        return Some(known);
    }
    formula::calculate(year)
}

/// Number of weeks to navigate for one semester
pub(crate) fn semester_weeks(year: i32, semester: Semester) -> Option<u32> {
    boundaries_for(year).map(|dates| dates.get(semester).weeks)
}
