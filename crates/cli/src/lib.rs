//! Common utilities for the command line interface.
use tracing::level_filters::LevelFilter;

use crate::args::LogArgs;

pub mod args;
pub mod output;
pub mod run;

/// Level selected by the logging flags: `--quiet` wins over `--debug`.
pub fn log_level(log: LogArgs) -> LevelFilter {
    if log.quiet {
        LevelFilter::OFF
    } else if log.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Installs the stderr subscriber for the selected level.
pub fn init_logging(log: LogArgs) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(log))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    if log.debug && !log.quiet {
        tracing::debug!("Debug mode enabled");
    }
}
