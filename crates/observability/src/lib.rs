//! # Observability
//!
//! Logging and metrics for the merge tool.
//!
//! - `tracing` subscriber on stderr in one of three formats
//! - optional Prometheus scrape endpoint
//! - merge counters and the human-readable alignment summary
//!
//! ```ignore
//! use observability::{init_with_config, ObservabilityConfig};
//!
//! init_with_config(ObservabilityConfig::from_verbosity(1, false))?;
//! let (track, report) = aligner.align(&inputs)?;
//! println!("{}", observability::AlignSummary::from_report(&report));
//! ```

pub mod metrics;

use anyhow::{anyhow, Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use crate::metrics::{
    record_activity_fetched, record_align_report, record_fetch_latency_ms, record_merge_result,
    record_sink_write, AlignSummary, RunningStats, StatsSummary,
};

/// HTTP stack crates that are only interesting at trace level
const QUIET_DEPENDENCIES: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls", "h2"];

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    /// Prometheus port (None = disabled)
    pub metrics_port: Option<u16>,
    /// Filter used when RUST_LOG is unset
    pub default_log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Compact,
            metrics_port: None,
            default_log_level: "info".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Level from `-v` count and `-q`
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let level = match (quiet, verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        };
        Self {
            default_log_level: level.to_string(),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }

    pub fn with_metrics_port(mut self, port: Option<u16>) -> Self {
        self.metrics_port = port;
        self
    }

    /// Filter directive for the default level
    ///
    /// Below trace, the HTTP stack is held at `warn`.
    pub fn filter_directive(&self) -> String {
        let level = self.default_log_level.as_str();
        if level == "trace" {
            return level.to_string();
        }
        QUIET_DEPENDENCIES
            .iter()
            .fold(level.to_string(), |acc, krate| format!("{acc},{krate}=warn"))
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON
    Json,
    /// Multi-line human readable
    Pretty,
    /// Single line
    #[default]
    Compact,
}

/// Install the tracing subscriber and, when a port is set, the Prometheus exporter
///
/// Logs go to stderr so stdout stays clean for command output. `RUST_LOG`
/// wins over the configured level.
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.filter_directive())
            .with_context(|| format!("Invalid log level '{}'", config.default_log_level))?,
    };

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;

    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::debug!(
        format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        "Logging ready"
    );
    Ok(())
}

/// Serve Prometheus metrics on `port` (tracing set up elsewhere)
pub fn init_metrics_only(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .with_context(|| format!("Failed to start metrics endpoint on port {port}"))?;

    tracing::info!(port, "Serving Prometheus metrics");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.metrics_port, None);
        assert_eq!(config.log_format, LogFormat::Compact);
        assert_eq!(config.default_log_level, "info");
    }

    #[test]
    fn test_from_verbosity() {
        assert_eq!(ObservabilityConfig::from_verbosity(0, false).default_log_level, "info");
        assert_eq!(ObservabilityConfig::from_verbosity(1, false).default_log_level, "debug");
        assert_eq!(ObservabilityConfig::from_verbosity(3, false).default_log_level, "trace");
        assert_eq!(ObservabilityConfig::from_verbosity(2, true).default_log_level, "warn");
    }

    #[test]
    fn test_filter_directive_quiets_http_stack() {
        let directive = ObservabilityConfig::default().filter_directive();
        assert!(directive.starts_with("info,"));
        assert!(directive.contains("reqwest=warn"));
        assert!(directive.contains("hyper=warn"));

        let trace = ObservabilityConfig::from_verbosity(2, false).filter_directive();
        assert_eq!(trace, "trace");
    }

    #[test]
    fn test_builders() {
        let config = ObservabilityConfig::default()
            .with_format(LogFormat::Json)
            .with_metrics_port(Some(9100));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.metrics_port, Some(9100));
    }
}
