//! Error types for upstream API calls.

use thiserror::Error;

/// A single upstream call can fail in one of these ways.
///
/// Transport failures and timeouts are kept apart so the HTTP layer can
/// answer 502 versus 504 without re-parsing error text.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream service could not be reached (DNS, connect, TLS, reset).
    #[error("upstream unreachable: {0}")]
    Unavailable(String),

    /// The call did not complete within the configured deadline.
    #[error("upstream timed out after {timeout_secs}s for {endpoint}")]
    Timeout { endpoint: String, timeout_secs: u64 },

    /// The upstream answered with a non-success status.
    #[error("upstream returned status {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    /// The body was not parseable JSON, or an expected field was missing.
    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

impl UpstreamError {
    /// Whether this failure is a deadline expiry rather than a hard fault.
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout { .. })
    }
}
