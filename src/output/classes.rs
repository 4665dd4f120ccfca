use comfy_table::{Cell, Color};

use crate::consts::DATE_FORMAT;
use crate::core::ScrapedRecord;
use crate::output::format::{create_styled_table, format_range, header_cell, location_label, styled_cell};

pub(crate) fn print_class_table(records: &[ScrapedRecord], use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Date", use_color),
        header_cell("Day", use_color),
        header_cell("Time", use_color),
        header_cell("Type", use_color),
        header_cell("Class", use_color),
        header_cell("Location", use_color),
    ]);

    let dim = if use_color { Some(Color::DarkGrey) } else { None };
    for record in records {
        let location = location_label(record.location.as_ref());
        let location_cell = if record.location.is_some() {
            Cell::new(&location)
        } else {
            styled_cell(&location, dim, false)
        };
        table.add_row(vec![
            Cell::new(record.date.format(DATE_FORMAT).to_string()),
            Cell::new(record.date.format("%a").to_string()),
            Cell::new(format_range(&record.time)),
            Cell::new(&record.kind),
            Cell::new(&record.title),
            location_cell,
        ]);
    }

    let cyan = if use_color { Some(Color::Cyan) } else { None };
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        styled_cell(&format!("{} classes", records.len()), cyan, true),
        Cell::new(""),
    ]);

    println!("{table}");
}

pub(crate) fn output_class_json(records: &[ScrapedRecord]) -> String {
    format!("{:#}", serde_json::json!(records))
}
