pub(crate) mod date;
pub(crate) mod timezone;

pub(crate) use date::{format_input_date, parse_input_date};
pub(crate) use timezone::Timezone;
