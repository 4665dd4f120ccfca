//! Diagnostic logging on stderr
//!
//! Results go to stdout with `println!`; everything else is a tracing event.

use tracing_subscriber::EnvFilter;

use crate::consts::APP_NAME;

/// Default filter when `RUST_LOG` is not set
fn default_directive(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!("{APP_NAME}={level}")
}

pub(crate) fn init(debug: bool, use_color: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(debug))),
        )
        .with_writer(std::io::stderr)
        .with_ansi(use_color)
        .with_target(debug)
        .init();
}
