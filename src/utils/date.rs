use chrono::{Datelike, NaiveDate};

/// Parse the timetable filter's date field.
///
/// The page shows `D-M-YYYY` after we set it, `DD/MM/YYYY` after an ASP.NET
/// postback, and occasionally ISO or `Mon D YYYY`.
pub(crate) fn parse_input_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for sep in ['-', '/'] {
        let parts: Vec<&str> = value.split(sep).collect();
        if let [day, month, year] = parts.as_slice()
            && year.len() == 4
            && let (Ok(day), Ok(month), Ok(year)) = (
                day.trim().parse::<u32>(),
                month.trim().parse::<u32>(),
                year.trim().parse::<i32>(),
            )
            && let Some(date) = NaiveDate::from_ymd_opt(year, month, day)
        {
            return Some(date);
        }
    }

    for format in ["%Y-%m-%d", "%b %d %Y", "%d %b %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    None
}

/// `D-M-YYYY`, the form the filter field accepts
pub(crate) fn format_input_date(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.day(), date.month(), date.year())
}
