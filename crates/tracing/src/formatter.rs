use std::fmt;

use clap::ValueEnum;
use tracing::Subscriber;
use tracing_subscriber::{registry::LookupSpan, EnvFilter, Layer};

use crate::layers::BoxedLayer;

/// How log events are rendered.
#[derive(Debug, Copy, Clone, ValueEnum, Eq, PartialEq)]
pub enum LogFormat {
    /// One JSON object per event
    Json,

    /// `key=value` pairs, via `tracing-logfmt`
    LogFmt,

    /// Human readable output for a terminal
    Terminal,
}

impl LogFormat {
    /// Builds a layer for this format, filtered by `filter`.
    ///
    /// `color` follows the CLI's color mode; `None` disables ANSI output. `writer` is only used
    /// for the file layer.
    pub(crate) fn apply<S, W>(
        &self,
        filter: EnvFilter,
        color: Option<&str>,
        writer: Option<W>,
    ) -> BoxedLayer<S>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
        W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
    {
        let ansi = match color {
            Some("always") => true,
            Some("auto") => std::io::IsTerminal::is_terminal(&std::io::stdout()),
            _ => false,
        };

        match (self, writer) {
            (LogFormat::Json, Some(writer)) => tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter)
                .boxed(),
            (LogFormat::Json, None) => tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(ansi)
                .with_filter(filter)
                .boxed(),
            (LogFormat::LogFmt, _) => tracing_logfmt::layer().with_filter(filter).boxed(),
            (LogFormat::Terminal, Some(writer)) => tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter)
                .boxed(),
            (LogFormat::Terminal, None) => tracing_subscriber::fmt::layer()
                .with_ansi(ansi)
                .with_filter(filter)
                .boxed(),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::LogFmt => write!(f, "log-fmt"),
            LogFormat::Terminal => write!(f, "terminal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_value_enum_names() {
        for format in LogFormat::value_variants() {
            let name = format.to_possible_value().expect("visible variant");
            assert_eq!(name.get_name(), format.to_string());
        }
    }

    #[test]
    fn test_parse_from_cli_value() {
        assert_eq!(LogFormat::from_str("log-fmt", true), Ok(LogFormat::LogFmt));
        assert_eq!(LogFormat::from_str("JSON", true), Ok(LogFormat::Json));
        assert!(LogFormat::from_str("xml", true).is_err());
    }
}
