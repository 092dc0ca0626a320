use std::fmt;

use thiserror::Error;

/// Top-level error type for the `rngbridge-api` crate.
///
/// Covers every failure mode of a device request: transport, an empty or
/// unsuccessful HTTP response, and a body that does not decode into the
/// expected shape. `rngbridge-core` classifies these via [`Error::fault_kind`].
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, timeout, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The `reqwest::Client` could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Response ────────────────────────────────────────────────────
    /// The device answered, but with nothing usable (error status or empty body).
    #[error("No response from RNGBridge - {url} ({reason})")]
    NoResponse { url: String, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Body was not JSON, was empty JSON, or did not match the expected
    /// shape. Carries the raw body for debugging.
    #[error("Malformed response from {url}: {message}")]
    MalformedResponse {
        url: String,
        message: String,
        body: String,
    },
}

/// Recoverable fault taxonomy for a single fetch.
///
/// Anything that does not classify into one of these is an unhandled fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Connection refused, timeout, reset mid-request.
    NetworkUnavailable,
    /// HTTP response received but empty or unsuccessful.
    NoResponse,
    /// Response body is not valid structured data of the expected shape.
    MalformedResponse,
}

impl FaultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NetworkUnavailable => "network_unavailable",
            Self::NoResponse => "no_response",
            Self::MalformedResponse => "malformed_response",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Classify this error into the recoverable fault taxonomy.
    ///
    /// Returns `None` for failures that are not transient device or network
    /// conditions (bad URL, client construction, redirect loops, ...).
    pub fn fault_kind(&self) -> Option<FaultKind> {
        match self {
            Self::Transport(e) if e.is_timeout() || e.is_connect() || e.is_request() => {
                Some(FaultKind::NetworkUnavailable)
            }
            // Connection dropped while streaming the body.
            Self::Transport(e) if e.is_body() => Some(FaultKind::NetworkUnavailable),
            Self::NoResponse { .. } => Some(FaultKind::NoResponse),
            Self::MalformedResponse { .. } => Some(FaultKind::MalformedResponse),
            _ => None,
        }
    }

    /// Returns `true` if the bridge should substitute defaults and carry on.
    pub fn is_recoverable(&self) -> bool {
        self.fault_kind().is_some()
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_errors_are_recoverable() {
        let no_response = Error::NoResponse {
            url: "http://device/api/state".into(),
            reason: "HTTP 503 Service Unavailable".into(),
        };
        assert_eq!(no_response.fault_kind(), Some(FaultKind::NoResponse));

        let malformed = Error::MalformedResponse {
            url: "http://device/api/state".into(),
            message: "expected value at line 1 column 1".into(),
            body: "<html>".into(),
        };
        assert_eq!(malformed.fault_kind(), Some(FaultKind::MalformedResponse));
        assert!(malformed.is_recoverable());
    }

    #[test]
    fn configuration_errors_are_not_recoverable() {
        let err = Error::InvalidUrl(url::ParseError::EmptyHost);
        assert_eq!(err.fault_kind(), None);
        assert!(!Error::ClientBuild("no TLS backend".into()).is_recoverable());
    }

    #[test]
    fn fault_kind_display_is_snake_case() {
        assert_eq!(
            FaultKind::NetworkUnavailable.to_string(),
            "network_unavailable"
        );
        assert_eq!(FaultKind::MalformedResponse.as_str(), "malformed_response");
    }
}
