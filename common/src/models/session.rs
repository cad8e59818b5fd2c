// common/src/models/session.rs
use serde::{Deserialize, Serialize};

use super::UserProfile;

/// A complete session: a profile and the credential token, always together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    pub token: String,
}

/// How a stored session looks to the route guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// A token is present and usable
    Authenticated,
    /// Nothing stored
    Anonymous,
    /// A token is present but its `exp` has passed
    Expired,
    /// A token is present but its payload cannot be read
    Invalid,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated)
    }
}
