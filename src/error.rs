use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Invalid semester: {input} (expected 1 or 2)")]
    InvalidSemester { input: u8 },

    #[error("No timetable source: pass --url (or set `url` in the config) or --pages <DIR>")]
    NoTimetableSource,

    #[error("Failed to read {path}: {source}")]
    ReadPage {
        path: String,
        source: std::io::Error,
    },

    #[error("{message}")]
    SessionFailed { message: String },

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("{0}")]
    Navigation(#[from] NavError),

    #[error("{0}")]
    Extract(#[from] ExtractError),
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("Session database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt session value for \"{key}\": {source}")]
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },

    #[error("Failed to encode session value for \"{key}\": {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },

    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TimeParseError {
    #[error("Time range \"{input}\" has no start/end separator")]
    MissingSeparator { input: String },

    #[error("Invalid clock time \"{input}\" (expected H:MM am/pm)")]
    InvalidClock { input: String },
}

#[derive(Debug, Error)]
pub(crate) enum ExtractError {
    #[error("Week start date input not found on page")]
    MissingDateInput,

    #[error("Unreadable week start date \"{value}\"")]
    InvalidWeekStart { value: String },

    #[error("{day} slot {slot}: {source}")]
    Time {
        day: &'static str,
        slot: usize,
        source: TimeParseError,
    },
}

#[derive(Debug, Error)]
pub(crate) enum LookupError {
    #[error("Location lookup request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Location lookup returned an unreadable body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum SynthError {
    #[error("None of the {dropped} scraped classes could be encoded")]
    NoEncodableEvents { dropped: usize },

    #[error("Calendar serialization produced no events")]
    EmptyPayload,
}

#[derive(Debug, Error)]
pub(crate) enum NavError {
    #[error("Timetable request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Timetable page has no __VIEWSTATE; is the session cookie still valid?")]
    MissingViewState,

    #[error("Control #{id} not found on the timetable page")]
    MissingControl { id: String },

    #[error("Failed to read saved page {path}: {source}")]
    ReadPage {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid page pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("No saved pages found in {dir}")]
    NoPages { dir: String },
}

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("No active session. Run `classcal start` first.")]
    NoActiveSession,

    #[error("No semester dates available for {year}")]
    NoBoundaries { year: i32 },

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Navigation failed, progress is saved (run `classcal resume`): {0}")]
    Navigation(#[from] NavError),

    #[error("Session did not finish after {loads} page loads; check that the session database is writable")]
    Stalled { loads: u32 },
}
