//! Tracing setup for the Warden toolkit.
//!
//! A [`WardenTracer`] collects the layers the caller asks for (stdout, journald, a log file) and
//! installs them as the global subscriber. Every layer carries its own [`EnvFilter`], so stdout
//! can stay quiet while the log file records everything.
//!
//! ```no_run
//! use warden_tracing::{LayerInfo, LogFormat, Tracer, WardenTracer};
//!
//! let _guard = WardenTracer::new()
//!     .with_stdout(LayerInfo::new(LogFormat::Terminal, "info".to_string(), String::new(), None))
//!     .init()
//!     .expect("failed to initialize tracing");
//! ```
//!
//! [`EnvFilter`]: tracing_subscriber::EnvFilter

// Re-export tracing crates
pub use tracing;
pub use tracing_subscriber;

mod formatter;
mod layers;

pub use formatter::LogFormat;
pub use layers::{FileInfo, FileWorkerGuard};

use std::str::FromStr;

use layers::Layers;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Directive, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a global tracing subscriber.
pub trait Tracer {
    /// Initializes the subscriber. Returns a guard that must be held for as long as file logging
    /// should keep flushing, if a file layer was configured.
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>>;
}

/// Configuration of a single output layer.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    format: LogFormat,
    default_directive: String,
    filters: String,
    color: Option<String>,
}

impl LayerInfo {
    /// Creates a new [`LayerInfo`].
    ///
    /// * `format` - how events are rendered
    /// * `default_directive` - the level used when neither `RUST_LOG` nor `filters` match
    /// * `filters` - comma separated extra directives, such as `warden_vm=trace`
    /// * `color` - `always`, `auto` or `never`; `None` disables ANSI output
    pub fn new(
        format: LogFormat,
        default_directive: String,
        filters: String,
        color: Option<String>,
    ) -> Self {
        Self { format, default_directive, filters, color }
    }

    fn directive(&self) -> eyre::Result<Directive> {
        Ok(Directive::from_str(&self.default_directive)?)
    }
}

impl Default for LayerInfo {
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_directive: LevelFilter::INFO.to_string(),
            filters: String::new(),
            color: Some("always".to_string()),
        }
    }
}

/// The [`Tracer`] used by the Warden CLI.
#[derive(Debug, Clone, Default)]
pub struct WardenTracer {
    stdout: LayerInfo,
    journald: Option<String>,
    file: Option<(LayerInfo, FileInfo)>,
}

impl WardenTracer {
    /// Creates a tracer that logs `info` and above to stdout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stdout layer configuration.
    pub fn with_stdout(mut self, config: LayerInfo) -> Self {
        self.stdout = config;
        self
    }

    /// Adds a journald layer using `filter`.
    pub fn with_journald(mut self, filter: String) -> Self {
        self.journald = Some(filter);
        self
    }

    /// Adds a non-blocking file layer.
    pub fn with_file(mut self, config: LayerInfo, file: FileInfo) -> Self {
        self.file = Some((config, file));
        self
    }
}

impl Tracer for WardenTracer {
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut layers = Layers::new();

        layers.stdout(
            self.stdout.format,
            self.stdout.directive()?,
            &self.stdout.filters,
            self.stdout.color.as_deref(),
        )?;

        if let Some(filter) = &self.journald {
            layers.journald(filter)?;
        }

        let guard = match &self.file {
            Some((config, file)) => {
                Some(layers.file(config.format, config.directive()?, &config.filters, file)?)
            }
            None => None,
        };

        tracing_subscriber::registry().with(layers.into_inner()).try_init()?;
        Ok(guard)
    }
}
