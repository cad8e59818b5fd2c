// common/src/guard.rs
use crate::claims::decode_claims;
use crate::config::AuthConfig;
use crate::error::{AuthError, DecodeError};
use crate::models::SessionState;
use crate::routes::login_with_origin;
use crate::session::AuthSession;
use crate::token_store::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardPolicy {
    /// When off, a present token grants access whatever it contains
    pub enforce_expiry: bool,
}

impl From<&AuthConfig> for GuardPolicy {
    fn from(config: &AuthConfig) -> Self {
        Self {
            enforce_expiry: config.enforce_expiry,
        }
    }
}

impl GuardPolicy {
    /// Whether a freshly issued `token` would get past the guard at `now`
    pub fn admit(&self, token: &str, now: i64) -> Result<(), AuthError> {
        if token.is_empty() {
            return Err(DecodeError::Malformed("empty token".to_string()).into());
        }
        if !self.enforce_expiry {
            return Ok(());
        }
        if decode_claims(token)?.is_expired_at(now) {
            return Err(AuthError::Expired);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin {
        /// Originally requested location, path and query
        from: String,
        state: SessionState,
    },
}

impl GuardDecision {
    /// `Location` to send the browser to, if access is refused
    pub fn location(&self) -> Option<String> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::RedirectToLogin { from, .. } => Some(login_with_origin(from)),
        }
    }
}

/// Decide whether `requested` may be rendered for `session` at `now`
pub fn check_access<S: KeyValueStore>(
    session: &AuthSession<S>,
    requested: &str,
    policy: GuardPolicy,
    now: i64,
) -> GuardDecision {
    let state = if session.token().is_none() {
        SessionState::Anonymous
    } else if policy.enforce_expiry {
        session.state_at(now)
    } else {
        SessionState::Authenticated
    };

    if state.is_authenticated() {
        GuardDecision::Allow
    } else {
        GuardDecision::RedirectToLogin {
            from: requested.to_string(),
            state,
        }
    }
}
