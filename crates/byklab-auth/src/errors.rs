//! Session error types.

/// Errors raised by session mutations and the session store.
///
/// Malformed stored data is never an error: it reads as "no session".
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// JSON serialization failed while persisting.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error in the session store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A tier upgrade was requested with nobody logged in.
    #[error("no active session")]
    NoActiveSession,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
