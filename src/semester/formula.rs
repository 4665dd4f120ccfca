use chrono::{Datelike, Days, NaiveDate};

use super::{SemesterBoundary, SemesterDates};

const PRE_2026_WEEKS: u32 = 13;
const PRE_2026_BREAK_WEEKS: u32 = 8;
const WEEKS_FROM_2026: u32 = 14;

pub(super) fn calculate(year: i32) -> Option<SemesterDates> {
    if year >= 2026 {
        calculate_from_2026(year)
    } else {
        calculate_pre_2026(year)
    }
}

/// Semester 1 starts on the 4th Monday of February; 13 weeks each with an
/// 8-week break in between.
fn calculate_pre_2026(year: i32) -> Option<SemesterDates> {
    let start_first = nth_monday_on_or_after(NaiveDate::from_ymd_opt(year, 2, 1)?, 4)?;
    let end_first = add_weeks(start_first, PRE_2026_WEEKS)?;
    let start_second = add_weeks(end_first, PRE_2026_BREAK_WEEKS)?;

    Some(SemesterDates {
        year,
        first: span(start_first, PRE_2026_WEEKS)?,
        second: span(start_second, PRE_2026_WEEKS)?,
    })
}

/// Semester 1 starts on the first Monday on or after 14 February,
/// semester 2 on the 3rd Monday of July; 14 weeks each.
fn calculate_from_2026(year: i32) -> Option<SemesterDates> {
    let start_first = nth_monday_on_or_after(NaiveDate::from_ymd_opt(year, 2, 14)?, 1)?;
    let start_second = nth_monday_on_or_after(NaiveDate::from_ymd_opt(year, 7, 1)?, 3)?;

    Some(SemesterDates {
        year,
        first: span(start_first, WEEKS_FROM_2026)?,
        second: span(start_second, WEEKS_FROM_2026)?,
    })
}

/// Boundary running `weeks` weeks from `start`; the last day is the Sunday
/// before the following Monday.
fn span(start: NaiveDate, weeks: u32) -> Option<SemesterBoundary> {
    let last_day = add_weeks(start, weeks)?.pred_opt()?;
    Some(SemesterBoundary {
        start: start.into(),
        end: last_day.into(),
        weeks,
    })
}

/// Advance to the first Monday on or after `date`, then `n - 1` more weeks.
pub(super) fn nth_monday_on_or_after(date: NaiveDate, n: u32) -> Option<NaiveDate> {
    let to_monday = (7 - date.weekday().num_days_from_monday()) % 7;
    let offset = u64::from(to_monday) + 7 * u64::from(n.saturating_sub(1));
    date.checked_add_days(Days::new(offset))
}

fn add_weeks(date: NaiveDate, weeks: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(7 * u64::from(weeks)))
}
