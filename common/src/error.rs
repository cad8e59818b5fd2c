// common/src/error.rs
use thiserror::Error;

/// A bearer token whose payload could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("token is missing the `{0}` claim")]
    MissingClaim(&'static str),
}

/// Failure of the underlying key-value store (e.g. storage disabled)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("value for `{key}` cannot be stored: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Misuse of the session mutators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Setting one half of a session while the other half is absent
    #[error("cannot set `{0}` without an active session; use set_session")]
    Incomplete(&'static str),
    /// A slot could not be written; storage was left as it was before the call
    #[error("session could not be stored: {0}")]
    Storage(#[from] StoreError),
}

/// Authentication failures surfaced to the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("token has expired")]
    Expired,
    /// The backend declined the submitted credentials
    #[error("invalid email or password")]
    AuthRejected,
    /// Session accessor used outside the session provider's scope
    #[error("session context is not available for this request")]
    ContextUnavailable,
    #[error(transparent)]
    Session(#[from] SessionError),
}
