//! Structured logging setup
//!
//! Composition logs through `tracing`; hosts that want the output call
//! [`init_telemetry`] once at startup to install a JSON subscriber filtered
//! by `RUST_LOG`.

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_LOG_FILTER: &str = "info,kogito_operator=debug";

/// Errors that can occur during telemetry initialization
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Filter directive could not be parsed
    #[error("invalid log filter: {0}")]
    Filter(String),

    /// Failed to initialize tracing subscriber
    #[error("failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),
}

/// Configuration for telemetry initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Filter directives applied when `RUST_LOG` is not set
    pub default_filter: String,
    /// Include the current span (app, namespace) in each line
    pub with_current_span: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_filter: DEFAULT_LOG_FILTER.to_string(),
            with_current_span: true,
        }
    }
}

impl TelemetryConfig {
    /// Resolve the effective filter: `RUST_LOG` wins over the configured default
    pub fn env_filter(&self) -> Result<EnvFilter, TelemetryError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.default_filter)
                .map_err(|e| TelemetryError::Filter(e.to_string())),
        }
    }
}

/// Install the global JSON subscriber.
///
/// Fails if the default filter is invalid or a global subscriber is
/// already installed.
///
/// # Example
///
/// ```ignore
/// use kogito_operator::telemetry::{init_telemetry, TelemetryConfig};
///
/// init_telemetry(TelemetryConfig::default())?;
/// ```
pub fn init_telemetry(config: TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = config.env_filter()?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(config.with_current_span)
        .with_span_list(false)
        .with_target(true)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::SubscriberInit(e.to_string())
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfig::default();
        assert_eq!(config.default_filter, "info,kogito_operator=debug");
        assert!(config.with_current_span);
    }

    #[test]
    fn test_invalid_default_filter_is_rejected() {
        let config = TelemetryConfig {
            default_filter: "kogito_operator=notalevel".to_string(),
            with_current_span: false,
        };
        // Only meaningful when RUST_LOG does not override the default
        if std::env::var("RUST_LOG").is_err() {
            assert!(matches!(
                config.env_filter(),
                Err(TelemetryError::Filter(_))
            ));
        }
    }

    #[test]
    fn test_second_init_fails() {
        // The first call may already have been made by another test
        let _ = init_telemetry(TelemetryConfig::default());
        assert!(matches!(
            init_telemetry(TelemetryConfig::default()),
            Err(TelemetryError::SubscriberInit(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = TelemetryError::SubscriberInit("already set".to_string());
        assert_eq!(
            err.to_string(),
            "failed to initialize tracing subscriber: already set"
        );
    }
}
