//! Logging configuration and subscriber setup.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::error::{TelemetryError, TelemetryResult};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human friendly.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// Newline-delimited JSON.
    Json,
    /// The default `tracing-subscriber` format.
    Full,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            "full" => Ok(Self::Full),
            other => Err(TelemetryError::ConfigError(format!(
                "unknown log format: {other}"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogTarget {
    /// Standard error.
    #[default]
    Stderr,
    /// Standard output.
    Stdout,
    /// Append to a file. Parent directories are created.
    File(PathBuf),
}

/// Logging setup parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Global level filter.
    pub level: String,
    /// Line format.
    pub format: LogFormat,
    /// Extra `EnvFilter` directives, e.g. `proem_signal=trace`.
    pub directives: Vec<String>,
    /// Output target.
    pub target: LogTarget,
    /// Colorize output. Ignored for file targets.
    pub ansi: bool,
    /// Include the event's module target in each line.
    pub show_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("info")
    }
}

impl LogConfig {
    /// Create a config with the given global level and default format.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::default(),
            directives: Vec::new(),
            target: LogTarget::default(),
            ansi: true,
            show_target: true,
        }
    }

    /// Set the line format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Add a filter directive.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Set the output target.
    #[must_use]
    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Enable or disable colors.
    #[must_use]
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Build from the `[logging]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::ConfigError`] for an unknown format.
    #[cfg(feature = "config")]
    pub fn from_section(section: &proem_config::LoggingSection) -> TelemetryResult<Self> {
        Ok(Self {
            level: section.level.clone(),
            format: section.format.parse()?,
            directives: section.directives.clone(),
            ..Self::default()
        })
    }

    /// The combined `EnvFilter` directive string.
    #[must_use]
    pub fn filter_directive(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(self.directives.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> TelemetryResult<EnvFilter> {
        EnvFilter::try_new(self.filter_directive())
            .map_err(|e| TelemetryError::ConfigError(format!("invalid log filter: {e}")))
    }
}

fn make_writer(target: &LogTarget) -> TelemetryResult<BoxMakeWriter> {
    match target {
        LogTarget::Stderr => Ok(BoxMakeWriter::new(std::io::stderr)),
        LogTarget::Stdout => Ok(BoxMakeWriter::new(std::io::stdout)),
        LogTarget::File(path) => {
            let Some(file_name) = path.file_name() else {
                return Err(TelemetryError::ConfigError(format!(
                    "log file path has no file name: {}",
                    path.display()
                )));
            };
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), PathBuf::from);
            std::fs::create_dir_all(&dir)?;
            Ok(BoxMakeWriter::new(tracing_appender::rolling::never(
                dir, file_name,
            )))
        },
    }
}

fn build_layer(
    config: &LogConfig,
) -> TelemetryResult<Box<dyn Layer<Registry> + Send + Sync + 'static>> {
    let writer = make_writer(&config.target)?;
    let ansi = config.ansi && !matches!(config.target, LogTarget::File(_));
    let base = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(config.show_target);

    let layer = match config.format {
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Compact => base.compact().boxed(),
        LogFormat::Json => base.json().boxed(),
        LogFormat::Full => base.boxed(),
    };
    Ok(layer)
}

/// Install a global subscriber built from `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::ConfigError`] for a bad filter or file path,
/// [`TelemetryError::IoError`] if the log directory cannot be created, and
/// [`TelemetryError::InitError`] if a global subscriber is already set.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.env_filter()?;
    let layer = build_layer(config)?;

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| TelemetryError::InitError(e.to_string()))
}

/// Install a compact stderr subscriber at `info`, or at `RUST_LOG` when it
/// is set.
///
/// # Errors
///
/// Returns [`TelemetryError::InitError`] if a global subscriber is already
/// set.
pub fn setup_default_logging() -> TelemetryResult<()> {
    let config = match std::env::var("RUST_LOG") {
        Ok(level) if !level.trim().is_empty() => LogConfig::new(level),
        _ => LogConfig::default(),
    };
    setup_logging(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("full".parse::<LogFormat>().unwrap(), LogFormat::Full);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(TelemetryError::ConfigError(_))
        ));
    }

    #[test]
    fn test_format_display_round_trips() {
        for format in [
            LogFormat::Pretty,
            LogFormat::Compact,
            LogFormat::Json,
            LogFormat::Full,
        ] {
            assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_filter_directive() {
        let config = LogConfig::new("warn")
            .with_directive("proem_signal=trace")
            .with_directive("proem_filter=debug");
        assert_eq!(
            config.filter_directive(),
            "warn,proem_signal=trace,proem_filter=debug"
        );
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn test_bad_directive_rejected() {
        let config = LogConfig::new("info").with_directive("proem_signal=loud");
        assert!(matches!(
            config.env_filter(),
            Err(TelemetryError::ConfigError(_))
        ));
    }

    #[test]
    fn test_file_target_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("proem.log");

        assert!(make_writer(&LogTarget::File(path)).is_ok());
        assert!(dir.path().join("logs").is_dir());
    }

    #[test]
    fn test_file_target_needs_file_name() {
        assert!(matches!(
            make_writer(&LogTarget::File(PathBuf::from("/"))),
            Err(TelemetryError::ConfigError(_))
        ));
    }

    #[test]
    fn test_second_init_fails() {
        let config = LogConfig::new("warn").with_ansi(false);
        let _ = setup_logging(&config);
        assert!(matches!(
            setup_logging(&config),
            Err(TelemetryError::InitError(_))
        ));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_section() {
        let section = proem_config::LoggingSection {
            level: "debug".to_owned(),
            format: "json".to_owned(),
            directives: vec!["proem_service=trace".to_owned()],
        };
        let config = LogConfig::from_section(&section).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter_directive(), "debug,proem_service=trace");
    }
}
