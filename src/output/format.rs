use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, TableComponent,
    modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};

use crate::core::{ClockTime, LocationInfo, TimeRange};
use crate::synth::ONLINE;

/// `9:05am` style, as the timetable prints it
pub(super) fn format_clock(time: ClockTime) -> String {
    let suffix = if time.hour < 12 { "am" } else { "pm" };
    let hour = match time.hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour}:{:02}{suffix}", time.minute)
}

pub(super) fn format_range(range: &TimeRange) -> String {
    format!("{}-{}", format_clock(range.start), format_clock(range.end))
}

pub(super) fn location_label(location: Option<&LocationInfo>) -> String {
    match location {
        Some(info) => format!("{} {} (level {})", info.place_name, info.room, info.floor),
        None => ONLINE.to_string(),
    }
}

pub(super) fn styled_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

pub(super) fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

pub(super) fn right_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    styled_cell(text, color, bold).set_alignment(CellAlignment::Right)
}

/// Replace the double-line header separator (╞═╪═╡) with single-line (├─┼─┤)
fn normalize_header_separator(table: &mut Table) {
    table.set_style(TableComponent::HeaderLines, '─');
    table.set_style(TableComponent::LeftHeaderIntersection, '├');
    table.set_style(TableComponent::MiddleHeaderIntersections, '┼');
    table.set_style(TableComponent::RightHeaderIntersection, '┤');
}

/// Create a table with the standard preset, inner borders, and normalized header separator.
pub(super) fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    normalize_header_separator(&mut table);
    table
}
