mod classes;
mod dates;
mod format;
mod status;

pub(crate) use classes::{output_class_json, print_class_table};
pub(crate) use dates::{output_dates_json, print_dates_table};
pub(crate) use status::{output_status_json, print_status_table};
