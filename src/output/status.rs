use comfy_table::{Cell, Color};

use crate::output::format::{create_styled_table, header_cell, styled_cell};
use crate::session::{Phase, SessionState};

fn week_label(state: &SessionState) -> String {
    if state.is_complete() {
        format!("{0} of {0} (done)", state.total_weeks)
    } else {
        format!("{} of {}", state.forward + 1, state.total_weeks)
    }
}

pub(crate) fn print_status_table(state: Option<&SessionState>, last_error: Option<&str>, use_color: bool) {
    let phase = Phase::of(state.cloned());
    let mut table = create_styled_table();
    table.set_header(vec![header_cell("Session", use_color), header_cell("", use_color)]);

    let phase_color = match (&phase, use_color) {
        (Phase::Scraping(_), true) => Some(Color::Yellow),
        (Phase::Finalizing(_), true) => Some(Color::Green),
        _ => None,
    };
    table.add_row(vec![Cell::new("State"), styled_cell(phase.name(), phase_color, true)]);

    if let Some(state) = state {
        table.add_row(vec![Cell::new("Semester"), Cell::new(state.semester.to_string())]);
        table.add_row(vec![Cell::new("Year"), Cell::new(state.year.to_string())]);
        table.add_row(vec![Cell::new("Week"), Cell::new(week_label(state))]);
        table.add_row(vec![Cell::new("Classes"), Cell::new(state.events.len().to_string())]);
    }
    if let Some(message) = last_error {
        let red = if use_color { Some(Color::Red) } else { None };
        table.add_row(vec![Cell::new("Last error"), styled_cell(message, red, false)]);
    }

    println!("{table}");
}

pub(crate) fn output_status_json(state: Option<&SessionState>, last_error: Option<&str>) -> String {
    let phase = Phase::of(state.cloned());
    let value = match state {
        Some(state) => serde_json::json!({
            "phase": phase.name(),
            "semester": state.semester,
            "year": state.year,
            "forward": state.forward,
            "totalWeeks": state.total_weeks,
            "events": state.events.len(),
            "lastError": last_error,
        }),
        None => serde_json::json!({
            "phase": phase.name(),
            "lastError": last_error,
        }),
    };
    format!("{value:#}")
}
