//! Event synthesizer
//!
//! Maps scraped classes onto iCalendar events. Serialization itself is left to
//! `icalendar`; this module owns the field mapping, the HTML description and
//! the rule that a non-empty input yields a payload with events or an error.

mod escape;

use icalendar::{Calendar, Component, Event, EventLike, EventStatus, Property};
use tracing::{debug, warn};

use crate::core::{LocationInfo, ScrapedRecord};
use crate::error::SynthError;

pub(crate) use escape::{escape_html, escape_text};

/// Location text for classes with no physical room
pub(crate) const ONLINE: &str = "ONLINE";

const CALENDAR_NAME: &str = "Class timetable";

/// Encode every record as one event and serialize the calendar.
///
/// Records that cannot be encoded are dropped; the call fails only when none
/// survive.
pub(crate) fn synthesize(records: &[ScrapedRecord]) -> Result<String, SynthError> {
    let mut calendar = Calendar::new();
    calendar.name(CALENDAR_NAME);

    let mut encoded = 0usize;
    for record in records {
        match build_event(record) {
            Some(event) => {
                calendar.push(event);
                encoded += 1;
            }
            None => warn!(
                title = %record.title,
                date = %record.date,
                duration = record.time.duration_minutes,
                "dropping class with non-positive duration"
            ),
        }
    }

    if encoded == 0 {
        return Err(SynthError::NoEncodableEvents {
            dropped: records.len(),
        });
    }

    let payload = calendar.to_string();
    if !payload.contains("BEGIN:VEVENT") {
        return Err(SynthError::EmptyPayload);
    }
    debug!(events = encoded, bytes = payload.len(), "calendar serialized");
    Ok(payload)
}

fn summary(record: &ScrapedRecord) -> String {
    format!("{} {}", record.title, record.kind)
}

/// `"{place}  Room:{room}  floor:{floor}"`
pub(crate) fn location_text(location: &LocationInfo) -> String {
    format!(
        "{}  Room:{}  floor:{}",
        location.place_name, location.room, location.floor
    )
}

fn html_description(summary: &str, location: &LocationInfo) -> String {
    format!(
        "<p>{}</p><p><a href=\"{}\">Google Maps</a><br><a href=\"{}\">Campus map</a></p>",
        escape_html(summary),
        escape_html(&location.map_url),
        escape_html(&location.campus_map_url),
    )
}

fn build_event(record: &ScrapedRecord) -> Option<Event> {
    let minutes = record.time.duration_minutes;
    if minutes <= 0 {
        return None;
    }
    let start = record
        .date
        .and_hms_opt(record.time.start.hour, record.time.start.minute, 0)?;

    let summary = summary(record);
    let mut event = Event::new();
    event
        .summary(&summary)
        .starts(start)
        .add_property("DURATION", format!("PT{minutes}M"))
        .status(EventStatus::Confirmed)
        .add_property("TRANSP", "OPAQUE")
        .add_property("X-MICROSOFT-CDO-BUSYSTATUS", "BUSY");

    match &record.location {
        None => {
            event.location(ONLINE).description(&summary);
        }
        Some(location) => {
            let geo = format!(
                "{};{}",
                location.coordinates.lat, location.coordinates.lng
            );
            event
                .location(&location_text(location))
                .add_property("GEO", geo)
                .description(&format!(
                    "{summary}\n{}\n{}",
                    location.map_url, location.campus_map_url
                ))
                .append_property(
                    // Not a known TEXT property, so the serializer writes it verbatim
                    Property::new(
                        "X-ALT-DESC",
                        escape_text(&html_description(&summary, location)),
                    )
                        .add_parameter("FMTTYPE", "text/html")
                        .done(),
                );
        }
    }

    Some(event.done())
}
