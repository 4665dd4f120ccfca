use comfy_table::Cell;

use crate::consts::DATE_FORMAT;
use crate::core::Semester;
use crate::output::format::{create_styled_table, header_cell, right_cell};
use crate::semester::{MonthDay, SemesterDates};

const SEMESTERS: [Semester; 2] = [Semester::First, Semester::Second];

fn format_day(day: MonthDay, year: i32) -> String {
    day.in_year(year)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| format!("{year}-{:02}-{:02}", day.month, day.day))
}

pub(crate) fn print_dates_table(dates: &SemesterDates, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Semester", use_color),
        header_cell("Starts", use_color),
        header_cell("Ends", use_color),
        header_cell("Weeks", use_color),
    ]);

    for semester in SEMESTERS {
        let boundary = dates.get(semester);
        table.add_row(vec![
            Cell::new(semester.to_string()),
            Cell::new(format_day(boundary.start, dates.year)),
            Cell::new(format_day(boundary.end, dates.year)),
            right_cell(&boundary.weeks.to_string(), None, false),
        ]);
    }

    println!("{table}");
}

pub(crate) fn output_dates_json(dates: &SemesterDates) -> String {
    let semesters: Vec<serde_json::Value> = SEMESTERS
        .iter()
        .map(|&semester| {
            let boundary = dates.get(semester);
            serde_json::json!({
                "semester": semester,
                "start": format_day(boundary.start, dates.year),
                "end": format_day(boundary.end, dates.year),
                "weeks": boundary.weeks,
            })
        })
        .collect();
    format!(
        "{:#}",
        serde_json::json!({ "year": dates.year, "semesters": semesters })
    )
}
