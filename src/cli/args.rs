//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

use super::commands::Commands;

#[derive(Parser)]
#[command(name = "classcal")]
#[command(about = "Scrape a weekly class timetable into an iCalendar file", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Timetable page URL
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) url: Option<String>,

    /// Cookie header of a logged-in browser session
    #[arg(long, global = true, value_name = "COOKIE")]
    pub(crate) cookie: Option<String>,

    /// Replay saved weekly pages (*.html) instead of fetching the timetable
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) pages: Option<PathBuf>,

    /// Directory to write the calendar file to ("-" for stdout)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub(crate) output: Option<PathBuf>,

    /// Session database path
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) db: Option<PathBuf>,

    /// Skip room lookups; every class is listed as ONLINE
    #[arg(short = 'O', long, global = true)]
    pub(crate) offline: bool,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Timezone used to pick the default semester and year (e.g., "Australia/Perth", "UTC")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub(crate) no_color: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // For boolean flags, config only applies if CLI is false (default)
        if !self.offline && config.offline {
            self.offline = true;
        }
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        // Value options: only apply if CLI didn't set them
        if self.url.is_none() {
            self.url = config.url.clone();
        }
        if self.cookie.is_none() {
            self.cookie = config.cookie.clone();
        }
        if self.output.is_none() {
            self.output = config.output.clone();
        }
        if self.db.is_none() {
            self.db = config.db.clone();
        }
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }

    pub(crate) fn log_color(&self) -> bool {
        !self.no_color && std::io::stderr().is_terminal()
    }

    pub(crate) fn db_path(&self) -> PathBuf {
        self.db.clone().unwrap_or_else(Config::default_db_path)
    }

    pub(crate) fn output_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
