//! Error types for the supermarket MCP bridge.
//!
//! Every failure a tool call can hit is represented by [`BridgeError`]. The
//! tool surface converts these into error payloads returned through the MCP
//! envelope, so no variant ever terminates the protocol session.
//!
//! # Error Categories
//!
//! - **Configuration** ([`BridgeError::ConfigError`]): missing credential or
//!   invalid configuration file
//! - **Upstream** ([`BridgeError::HttpError`], [`BridgeError::UpstreamError`]):
//!   network failure or non-success status from a retailer
//! - **Parsing** ([`BridgeError::ParseError`]): retailer response does not have
//!   the expected shape
//! - **Validation** ([`BridgeError::ValidationError`]): bad tool arguments
//!
//! # Examples
//!
//! ```
//! use supermarket_mcp_bridge::error::{BridgeError, ErrorKind, Result};
//!
//! fn require_term(term: &str) -> Result<&str> {
//!     if term.trim().is_empty() {
//!         return Err(BridgeError::ValidationError("term must not be empty".to_owned()));
//!     }
//!     Ok(term)
//! }
//!
//! let err = require_term("  ").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Validation);
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Maximum number of characters of an upstream body kept in error messages.
const MAX_BODY_EXCERPT: usize = 512;

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur while serving a product search.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Required configuration is missing or invalid.
    ///
    /// Raised at call time when `COLES_API_KEY` is unset, and at startup when
    /// a configuration file fails validation.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed before a response was received.
    ///
    /// Wraps [`reqwest::Error`]: timeouts, refused connections, DNS and TLS
    /// failures.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Retailer answered with a non-success status.
    #[error("retailer returned status {status}: {body}")]
    UpstreamError {
        /// HTTP status code.
        status: u16,
        /// Leading excerpt of the response body.
        body: String,
    },

    /// Retailer response could not be understood.
    #[error("unexpected retailer response: {0}")]
    ParseError(String),

    /// Tool arguments were rejected.
    #[error("invalid arguments: {0}")]
    ValidationError(String),
}

impl BridgeError {
    /// Builds an [`UpstreamError`](Self::UpstreamError), keeping only a
    /// bounded excerpt of the response body.
    pub fn upstream(status: u16, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        let body = match text.char_indices().nth(MAX_BODY_EXCERPT) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.into_owned(),
        };
        Self::UpstreamError { status, body }
    }

    /// Returns the category reported to the agent.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigError(_) => ErrorKind::Config,
            Self::HttpError(_) | Self::UpstreamError { .. } => ErrorKind::Upstream,
            Self::ParseError(_) => ErrorKind::Parse,
            Self::ValidationError(_) => ErrorKind::Validation,
        }
    }
}

/// Error category exposed in tool error payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Missing credential or invalid configuration.
    #[serde(rename = "config_error")]
    Config,
    /// Network failure or non-success status from a retailer.
    #[serde(rename = "upstream_error")]
    Upstream,
    /// Retailer response shape mismatch.
    #[serde(rename = "parse_error")]
    Parse,
    /// Bad or missing tool arguments.
    #[serde(rename = "validation_error")]
    Validation,
}

impl ErrorKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config_error",
            Self::Upstream => "upstream_error",
            Self::Parse => "parse_error",
            Self::Validation => "validation_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = BridgeError::ConfigError("COLES_API_KEY is not set".into());
        assert_eq!(error.to_string(), "configuration error: COLES_API_KEY is not set");
    }

    #[test]
    fn test_upstream_error_display() {
        let error = BridgeError::upstream(503, b"Service Unavailable");
        assert_eq!(error.to_string(), "retailer returned status 503: Service Unavailable");
    }

    #[test]
    fn test_upstream_error_truncates_body() {
        let body = "x".repeat(2000);
        let BridgeError::UpstreamError { status, body } = BridgeError::upstream(500, body.as_bytes())
        else {
            unreachable!("expected UpstreamError");
        };
        assert_eq!(status, 500);
        assert_eq!(body.len(), MAX_BODY_EXCERPT + 3);
        assert!(body.ends_with("..."));
    }

    #[test]
    fn test_upstream_error_lossy_utf8() {
        let error = BridgeError::upstream(400, &[0xff, b'o', b'k']);
        assert!(error.to_string().contains("ok"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(BridgeError::ConfigError(String::new()).kind(), ErrorKind::Config);
        assert_eq!(BridgeError::upstream(404, b"").kind(), ErrorKind::Upstream);
        assert_eq!(BridgeError::ParseError(String::new()).kind(), ErrorKind::Parse);
        assert_eq!(BridgeError::ValidationError(String::new()).kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_error_kind_serialization() {
        let json = serde_json::to_string(&ErrorKind::Config).unwrap();
        assert_eq!(json, "\"config_error\"");
        assert_eq!(ErrorKind::Upstream.to_string(), "upstream_error");
    }
}
