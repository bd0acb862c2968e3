//! Logging setup for the CLI.
//!
//! The level is chosen in this order:
//! 1. `--verbose`: debug for weft crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. `settings.log_level` from the configuration
//! 5. info

use tracing_subscriber::EnvFilter;
use weft_pipeline::LogLevel;
use weft_pipeline::logging::init_logging;

const CRATES: [&str; 3] = ["weft_config", "weft_pipeline", "weft_cli"];

/// Build the filter directive string for the given flags.
pub fn filter_directives(verbose: bool, quiet: bool, configured: Option<LogLevel>) -> Option<String> {
    let level = if verbose {
        LogLevel::Debug
    } else if quiet {
        LogLevel::Error
    } else if std::env::var_os("RUST_LOG").is_some() {
        return None;
    } else {
        configured.unwrap_or_default()
    };

    Some(
        CRATES
            .iter()
            .map(|krate| format!("{krate}={level}"))
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Install the global subscriber. Logs go to stderr so stdout stays parseable.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool, configured: Option<LogLevel>) {
    let filter = match filter_directives(verbose, quiet, configured) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::from_default_env(),
    };

    if !init_logging(filter, !no_color && crate::ui::should_use_color()) {
        tracing::debug!("subscriber already installed");
    }
}
