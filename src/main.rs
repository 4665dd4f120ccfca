mod app;
mod browser;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod extract;
mod location;
mod logging;
mod output;
mod page;
mod semester;
mod session;
mod synth;
mod utils;

use clap::Parser;
use tracing::{debug, warn};

use cli::Cli;
use config::Config;

fn main() {
    let config = Config::load();
    let cli = Cli::parse().with_config(&config);

    logging::init(cli.debug, cli.log_color());
    for problem in &config.problems {
        warn!("{problem}");
    }
    if let Some(path) = &config.source {
        debug!(config = %path.display(), "loaded config");
    }

    if let Err(e) = app::run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
