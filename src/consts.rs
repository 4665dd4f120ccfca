/// Binary and directory name used for config and data paths
pub(crate) const APP_NAME: &str = "classcal";

/// Zone the timetable is published in
pub(crate) const DEFAULT_TIMEZONE: &str = "Australia/Perth";

/// Session database file name inside the data directory
pub(crate) const DB_FILE_NAME: &str = "session.db";

/// Date format for tables and JSON: "2026-02-16"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
