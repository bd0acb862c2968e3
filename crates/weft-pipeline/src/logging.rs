//! Subscriber setup for binaries.
//!
//! Only available with the `logging` feature. The pipeline itself only emits
//! tracing events; binaries pick the filter and install it here.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Silent,
    Error,
    /// Errors, warnings (rule lints, budget advisories)
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("Invalid log level: {other}")),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// Install `filter` with a compact stderr formatter.
///
/// Returns `false` when a global subscriber was already set; the first one
/// stays in place.
///
/// ```rust,no_run
/// use tracing_subscriber::EnvFilter;
/// use weft_pipeline::logging::{LogLevel, init_logging};
///
/// init_logging(EnvFilter::new(LogLevel::Warn.as_filter()), false);
/// ```
pub fn init_logging(filter: EnvFilter, ansi: bool) -> bool {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_level(true)
                .with_ansi(ansi)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_level_names() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("off".parse::<LogLevel>().unwrap(), LogLevel::Silent);
        assert_eq!("TRACE".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn display_is_the_filter_directive() {
        assert_eq!(LogLevel::Silent.to_string(), "off");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }

    #[test]
    fn levels_are_ordered_by_verbosity() {
        assert!(LogLevel::Silent < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Debug);
    }

    #[test]
    fn second_install_keeps_the_first_subscriber() {
        init_logging(EnvFilter::new(LogLevel::Silent.as_filter()), false);
        assert!(!init_logging(EnvFilter::new(LogLevel::Trace.as_filter()), false));
    }
}
