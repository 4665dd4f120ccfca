//! CLI subcommand definitions

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Start a new session and scrape every week of a semester
    Start {
        /// Semester to scrape (default: 1 for January-May, otherwise 2)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
        semester: Option<u8>,
        /// Calendar year (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Number of weeks to scrape instead of the semester length
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=52))]
        weeks: Option<u32>,
    },
    /// Continue an interrupted session from the stored week
    Resume,
    /// Show the stored session and any error from the last run
    Status,
    /// Discard the stored session
    Cancel,
    /// Show semester start and end dates
    Dates {
        /// Calendar year (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// List the classes found in one saved timetable page
    Extract {
        /// Saved page (HTML)
        file: PathBuf,
    },
}
