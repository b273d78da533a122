//! The Gateway's typed error taxonomy: callers see a simple
//! transient/permanent/auth-expired distinction, never raw transport errors.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Worth retrying: network blips, 5xx, timeouts.
    #[error("transient gateway error: {0}")]
    Transient(String),
    /// Not worth retrying: 4xx other than auth-expired, malformed responses.
    #[error("permanent gateway error: {0}")]
    Permanent(String),
    /// Bearer token expired mid-run; the caller refreshes once and retries.
    #[error("gateway authentication expired")]
    AuthExpired,
}

impl GatewayError {
    /// True for errors the retry policy should retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::AuthExpired)
    }
}
