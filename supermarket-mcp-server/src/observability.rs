//! Observability infrastructure for the supermarket MCP server.
//!
//! Provides structured logging and the startup health report. Everything is
//! written to stderr: stdout carries the MCP session.

use std::io;

use supermarket_mcp_bridge::config::{BridgeConfig, ConfigProvider};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Log format configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format for development.
    Pretty,
    /// JSON format for log aggregation.
    Json,
}

impl LogFormat {
    /// Determines log format from the `LOG_FORMAT` value.
    ///
    /// `json` (any case) selects [`LogFormat::Json`]; anything else, including
    /// an unset variable, selects [`LogFormat::Pretty`].
    #[must_use]
    pub fn from_env(env: &dyn ConfigProvider) -> Self {
        match env.get("LOG_FORMAT").unwrap_or_default().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Initializes structured logging.
///
/// # Environment Variables
///
/// - `LOG_FORMAT`: `json` or `pretty` (default: `pretty`)
/// - `RUST_LOG`: Log level filter (default: `info`)
pub fn init_observability(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_ansi(false)
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Json => {
            subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }
}

/// Overall server status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Every tool can serve requests.
    Healthy,
    /// The server runs but some tool will report errors.
    Degraded,
    /// The server cannot start.
    Unhealthy,
}

impl HealthStatus {
    /// Returns string representation for JSON serialization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

/// Health check status for individual checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCheckStatus {
    /// Check passed.
    Pass,
    /// Check failed.
    Fail,
    /// Check warning (degraded but operational).
    Warn,
}

impl HealthCheckStatus {
    /// Returns string representation for JSON serialization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Warn => "warn",
        }
    }
}

/// Individual health check result.
#[derive(Debug, Clone)]
pub struct HealthCheck {
    /// Check name.
    pub name: String,
    /// Check status.
    pub status: HealthCheckStatus,
    /// Details.
    pub message: String,
}

impl HealthCheck {
    /// Creates a passing check.
    #[must_use]
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), status: HealthCheckStatus::Pass, message: message.into() }
    }

    /// Creates a warning check.
    #[must_use]
    pub fn warn(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), status: HealthCheckStatus::Warn, message: message.into() }
    }

    /// Creates a failing check.
    #[must_use]
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), status: HealthCheckStatus::Fail, message: message.into() }
    }
}

/// Startup health report.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Overall status.
    pub status: HealthStatus,
    /// Server version.
    pub version: String,
    /// Individual checks.
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    /// Builds a report, deriving the overall status from the checks.
    #[must_use]
    pub fn new(checks: Vec<HealthCheck>) -> Self {
        Self {
            status: Self::compute_status(&checks),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            checks,
        }
    }

    /// Runs the startup checks against a loaded configuration.
    ///
    /// A missing Coles key only degrades the server; the Coles tool reports
    /// it per call.
    #[must_use]
    pub fn startup(config: &BridgeConfig, source: &str, secrets: &dyn ConfigProvider) -> Self {
        let key_env = &config.coles.api_key_env;
        let coles = if secrets.get(key_env).is_some() {
            HealthCheck::pass("coles_api_key", format!("{key_env} is set"))
        } else {
            HealthCheck::warn(
                "coles_api_key",
                format!("{key_env} is not set; get_coles_products will return config_error"),
            )
        };

        Self::new(vec![
            HealthCheck::pass("config", format!("loaded from {source}")),
            coles,
            HealthCheck::pass("woolworths", "no credential required"),
        ])
    }

    /// Serializes the report to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns error if JSON serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::json!({
            "status": self.status.as_str(),
            "version": self.version,
            "checks": self.checks.iter().map(|c| serde_json::json!({
                "name": c.name,
                "status": c.status.as_str(),
                "message": c.message,
            })).collect::<Vec<_>>(),
        });

        serde_json::to_string(&json)
    }

    /// Determines overall status from individual checks.
    #[must_use]
    pub fn compute_status(checks: &[HealthCheck]) -> HealthStatus {
        if checks.iter().any(|c| c.status == HealthCheckStatus::Fail) {
            HealthStatus::Unhealthy
        } else if checks.iter().any(|c| c.status == HealthCheckStatus::Warn) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}
