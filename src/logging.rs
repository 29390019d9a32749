//! Tracing subscriber setup.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Severity threshold selected with `--log-level` / `LOG_LEVEL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Case-insensitive; anything unrecognized is `Info`.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_uppercase()).as_deref() {
            Some("DEBUG") => LogLevel::Debug,
            Some("WARN") => LogLevel::Warn,
            Some("ERROR") => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Output encoding for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global subscriber, writing to stderr.
///
/// A set `RUST_LOG` wins over `level`.
pub fn init_tracing(level: LogLevel, format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_levels() {
        assert_eq!(LogLevel::parse_lenient(Some("DEBUG")), LogLevel::Debug);
        assert_eq!(LogLevel::parse_lenient(Some("warn")), LogLevel::Warn);
        assert_eq!(LogLevel::parse_lenient(Some(" Error ")), LogLevel::Error);
        assert_eq!(LogLevel::parse_lenient(Some("INFO")), LogLevel::Info);
    }

    #[test]
    fn unknown_or_missing_level_is_info() {
        assert_eq!(LogLevel::parse_lenient(Some("TRACE")), LogLevel::Info);
        assert_eq!(LogLevel::parse_lenient(Some("")), LogLevel::Info);
        assert_eq!(LogLevel::parse_lenient(None), LogLevel::Info);
    }
}
