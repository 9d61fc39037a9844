//! Backend client error types.

use byklab_auth::AuthError;
use byklab_core::PaymentValidationError;

/// Errors from backend calls and the checkout flow.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure, timeout, or an undecodable response body.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error detail from the response body.
        message: String,
    },

    /// The card form did not validate; nothing was sent.
    #[error(transparent)]
    Validation(#[from] PaymentValidationError),

    /// The plan does not map to a subscription tier.
    #[error("unknown plan: {0}")]
    UnknownPlan(String),

    /// The backend accepted the request but did not activate the plan.
    #[error("payment activation declined: {0}")]
    ActivationDeclined(String),

    /// Recording the result in the session failed.
    #[error("session update failed: {0}")]
    Session(#[from] AuthError),
}

impl ClientError {
    /// Whether the backend rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ClientError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
