// dashboard-web/src/store.rs
//! The browser's cookie jar as the dashboard's key-value store.
//!
//! Values are base64url encoded so that serialized profiles survive cookie
//! syntax. Writes are staged and flushed onto the outgoing response.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use common::error::StoreError;
use common::token_store::{KeyValueStore, TOKEN_KEY, USER_KEY};
use std::collections::HashMap;

// Session cookies survive browser restarts for a week
const COOKIE_MAX_AGE: i64 = 7 * 86400;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CookieChange {
    Set(String, String),
    Remove(String),
}

#[derive(Debug, Clone, Default)]
pub struct CookieStore {
    values: HashMap<String, String>,
    changes: Vec<CookieChange>,
    secure: bool,
}

pub fn encode_value(value: &str) -> String {
    base64::encode_config(value, base64::URL_SAFE_NO_PAD)
}

pub fn decode_value(raw: &str) -> Option<String> {
    let bytes = base64::decode_config(raw, base64::URL_SAFE_NO_PAD).ok()?;
    String::from_utf8(bytes).ok()
}

impl CookieStore {
    pub fn new(secure: bool) -> Self {
        Self {
            values: HashMap::new(),
            changes: Vec::new(),
            secure,
        }
    }

    /// Snapshot the session cookies of `req`. Undecodable cookies read as absent.
    pub fn from_request(req: &HttpRequest, secure: bool) -> Self {
        let mut store = Self::new(secure);
        for key in [TOKEN_KEY, USER_KEY] {
            if let Some(cookie) = req.cookie(key) {
                match decode_value(cookie.value()) {
                    Some(value) => {
                        store.values.insert(key.to_string(), value);
                    }
                    None => tracing::warn!("Ignoring undecodable `{}` cookie", key),
                }
            }
        }
        store
    }

    /// Cookies to send back, in the order the writes happened
    pub fn pending_cookies(&self) -> Vec<(Cookie<'static>, bool)> {
        self.changes
            .iter()
            .map(|change| match change {
                CookieChange::Set(key, value) => (self.build_cookie(key, encode_value(value)), false),
                CookieChange::Remove(key) => (self.build_cookie(key, String::new()), true),
            })
            .collect()
    }

    /// Write the staged changes onto `response` and forget them
    pub fn flush_into<B>(&mut self, response: &mut HttpResponse<B>) {
        for (cookie, removal) in self.pending_cookies() {
            let result = if removal {
                response.add_removal_cookie(&cookie)
            } else {
                response.add_cookie(&cookie)
            };
            if let Err(e) = result {
                tracing::warn!("Failed to write `{}` cookie: {}", cookie.name(), e);
            }
        }
        self.changes.clear();
    }

    fn build_cookie(&self, key: &str, value: String) -> Cookie<'static> {
        Cookie::build(key.to_string(), value)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::seconds(COOKIE_MAX_AGE))
            .finish()
    }
}

impl KeyValueStore for CookieStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // browsers drop cookies over ~4KB
        if encode_value(value).len() > 3800 {
            return Err(StoreError::InvalidValue {
                key: key.to_string(),
                reason: "value too large for a cookie".to_string(),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        self.changes.retain(|change| !matches!(change, CookieChange::Set(k, _) | CookieChange::Remove(k) if k == key));
        self.changes.push(CookieChange::Set(key.to_string(), value.to_string()));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        self.changes.retain(|change| !matches!(change, CookieChange::Set(k, _) | CookieChange::Remove(k) if k == key));
        self.changes.push(CookieChange::Remove(key.to_string()));
        Ok(())
    }
}
