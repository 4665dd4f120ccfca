//! Page extractor
//!
//! Turns one loaded timetable page into the classes for that week. Slot ids
//! are sparse, so every index up to [`MAX_SLOTS`] is probed for each weekday.

mod week;

use chrono::NaiveDate;

use crate::error::ExtractError;
use crate::page::Page;
use crate::utils::parse_input_date;

pub(crate) use week::extract_week;

/// Filter form date field, holds the first day of the displayed week
pub(crate) const DATE_INPUT_ID: &str = "ctl00_Content_ctlFilter_TxtStartDt";
/// Filter form submit control
pub(crate) const SEARCH_BUTTON_ID: &str = "ctl00_Content_ctlFilter_BtnSearch";
/// "Next week" control in the bottom action bar
pub(crate) const NEXT_WEEK_ID: &str = "ctl00_Content_ctlActionBarBottom_WkNext";

pub(crate) const WEEKDAYS: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];
pub(crate) const MAX_SLOTS: usize = 20;

const CLASS_TYPE: &str = "cssTtableClsSlotWhat";
const CLASS_TIME: &str = "cssTtableClsSlotWhen";
const CLASS_WHERE: &str = "cssTtableClsSlotWhere";

const SLOT_ID_PREFIX: &str = "ctl00_Content_ctlTimetableMain_";

/// Id of the panel holding a slot's type, time and room
pub(crate) fn body_panel_id(day: &str, slot: usize) -> String {
    format!("{SLOT_ID_PREFIX}{day}DayCol_Body_{slot}_BodyContentPanel")
}

/// Id of the panel holding a slot's unit code
pub(crate) fn header_panel_id(day: &str, slot: usize) -> String {
    format!("{SLOT_ID_PREFIX}{day}DayCol_Body_{slot}_HeaderPanel")
}

/// Read the first day of the displayed week from the filter date field
pub(crate) fn read_week_start<P: Page>(page: &P) -> Result<NaiveDate, ExtractError> {
    let input = page
        .element_by_id(DATE_INPUT_ID)
        .ok_or(ExtractError::MissingDateInput)?;
    let value = page.attr(input, "value").unwrap_or_default();
    parse_input_date(&value).ok_or(ExtractError::InvalidWeekStart { value })
}

/// Collapse runs of whitespace to single spaces and trim
pub(crate) fn normalize_title(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
