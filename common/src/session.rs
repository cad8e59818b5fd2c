// common/src/session.rs
//! Auth session context: the current user and token, kept in step with storage.
//!
//! The profile and the token are written and cleared as one unit. Storage
//! never holds one without the other after any mutator returns.

use crate::claims::{decode_claims, Claims};
use crate::error::{DecodeError, SessionError, StoreError};
use crate::models::{Session, SessionState, UserProfile};
use crate::token_store::{KeyValueStore, TokenStore, USER_KEY};

#[derive(Debug)]
pub struct AuthSession<S> {
    user: Option<UserProfile>,
    token: Option<String>,
    tokens: TokenStore<S>,
}

impl<S: KeyValueStore> AuthSession<S> {
    /// Populate from storage. A half-present or unreadable session is wiped.
    pub fn load(store: S) -> Self {
        let mut tokens = TokenStore::new(store);

        let token = tokens.get_token();
        let user = tokens.get_raw(USER_KEY).and_then(|raw| {
            serde_json::from_str::<UserProfile>(&raw)
                .map_err(|e| tracing::warn!("Discarding unreadable stored profile: {}", e))
                .ok()
        });

        match (user, token) {
            (Some(user), Some(token)) => Self {
                user: Some(user),
                token: Some(token),
                tokens,
            },
            (None, None) => Self {
                user: None,
                token: None,
                tokens,
            },
            (user, token) => {
                tracing::warn!(
                    "Stored session is incomplete (user: {}, token: {}), clearing it",
                    user.is_some(),
                    token.is_some()
                );
                tokens.remove_token();
                tokens.remove_raw(USER_KEY);
                Self {
                    user: None,
                    token: None,
                    tokens,
                }
            }
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    /// Snapshot of the whole session, if there is one
    pub fn current(&self) -> Option<Session> {
        match (&self.user, &self.token) {
            (Some(user), Some(token)) => Some(Session {
                user: user.clone(),
                token: token.clone(),
            }),
            _ => None,
        }
    }

    /// Store a fresh session: token first, then profile.
    ///
    /// When a slot cannot be written the previous session is kept, both in
    /// memory and in storage, and the store error is returned.
    pub fn set_session(&mut self, user: UserProfile, token: String) -> Result<(), SessionError> {
        let raw = serialize_profile(&user)?;
        self.tokens.try_set_token(&token)?;
        if let Err(e) = self.tokens.try_set_raw(USER_KEY, &raw) {
            tracing::warn!("Failed to persist profile of user {}: {}", user.id, e);
            self.restore_token();
            return Err(e.into());
        }

        tracing::info!("Session started for user {} ({})", user.id, user.role);

        self.token = Some(token);
        self.user = Some(user);
        Ok(())
    }

    /// Forget the session and both storage slots
    pub fn clear(&mut self) {
        if let Some(user) = &self.user {
            tracing::info!("Session cleared for user {}", user.id);
        }
        self.tokens.remove_token();
        self.tokens.remove_raw(USER_KEY);
        self.user = None;
        self.token = None;
    }

    /// `None` clears the session. `Some` replaces the profile of an active session.
    pub fn set_user(&mut self, user: Option<UserProfile>) -> Result<(), SessionError> {
        match user {
            None => {
                self.clear();
                Ok(())
            }
            Some(_) if self.token.is_none() => Err(SessionError::Incomplete("user")),
            Some(user) => {
                let raw = serialize_profile(&user)?;
                self.tokens.try_set_raw(USER_KEY, &raw)?;
                self.user = Some(user);
                Ok(())
            }
        }
    }

    /// `None` clears the session. `Some` replaces the token of an active session.
    pub fn set_token(&mut self, token: Option<String>) -> Result<(), SessionError> {
        match token {
            None => {
                self.clear();
                Ok(())
            }
            Some(_) if self.user.is_none() => Err(SessionError::Incomplete("token")),
            Some(token) => {
                self.tokens.try_set_token(&token)?;
                self.token = Some(token);
                Ok(())
            }
        }
    }

    /// Claims of the held token; `None` when signed out
    pub fn claims(&self) -> Option<Result<Claims, DecodeError>> {
        self.token.as_deref().map(decode_claims)
    }

    /// Classify the held token at `now` (seconds since the epoch)
    pub fn state_at(&self, now: i64) -> SessionState {
        match self.claims() {
            None => SessionState::Anonymous,
            Some(Err(_)) => SessionState::Invalid,
            Some(Ok(claims)) if claims.is_expired_at(now) => SessionState::Expired,
            Some(Ok(_)) => SessionState::Authenticated,
        }
    }

    pub fn store(&self) -> &S {
        self.tokens.store()
    }

    /// For flushing staged writes; the session slots must only change through the mutators
    pub fn store_mut(&mut self) -> &mut S {
        self.tokens.store_mut()
    }

    pub fn into_store(self) -> S {
        self.tokens.into_inner()
    }

    /// Put the token slot back in step with the profile slot
    fn restore_token(&mut self) {
        let restored = match &self.token {
            Some(previous) => self.tokens.try_set_token(previous),
            None => self.tokens.try_remove_token(),
        };
        if let Err(e) = restored {
            tracing::warn!("Could not restore the token slot ({}), clearing the session", e);
            self.clear();
        }
    }
}

fn serialize_profile(user: &UserProfile) -> Result<String, SessionError> {
    serde_json::to_string(user).map_err(|e| {
        SessionError::Storage(StoreError::InvalidValue {
            key: USER_KEY.to_string(),
            reason: e.to_string(),
        })
    })
}
