//! Time range parsing for timetable slot tokens like `", 8:00 am-10:00 am"`

use crate::error::TimeParseError;

use super::types::{ClockTime, TimeRange};

/// Parse a raw "when" token into a 24-hour [`TimeRange`].
pub(crate) fn parse_time_range(raw: &str) -> Result<TimeRange, TimeParseError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.trim_start_matches(',');

    let Some((start, end)) = compact.split_once('-') else {
        return Err(TimeParseError::MissingSeparator {
            input: raw.trim().to_string(),
        });
    };

    Ok(TimeRange::between(parse_clock(start)?, parse_clock(end)?))
}

/// `H:MM` followed by `am`/`pm`.
/// 12am is midnight (hour 0); 12pm stays 12; every other pm hour gains 12.
fn parse_clock(token: &str) -> Result<ClockTime, TimeParseError> {
    let invalid = || TimeParseError::InvalidClock {
        input: token.to_string(),
    };

    let lower = token.to_ascii_lowercase();
    let (clock, pm) = if let Some(clock) = lower.strip_suffix("am") {
        (clock, false)
    } else if let Some(clock) = lower.strip_suffix("pm") {
        (clock, true)
    } else {
        return Err(invalid());
    };

    let (hour, minute) = clock.split_once(':').ok_or_else(invalid)?;
    if minute.len() != 2 {
        return Err(invalid());
    }
    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return Err(invalid());
    }

    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    Ok(ClockTime::new(hour, minute))
}
