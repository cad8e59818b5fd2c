// common/src/token_store.rs
use std::collections::HashMap;

use crate::error::StoreError;

/// Storage key of the bearer token
pub const TOKEN_KEY: &str = "token";
/// Storage key of the serialized user profile
pub const USER_KEY: &str = "user";

/// Durable string key-value storage, e.g. the browser's cookie jar
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store. `unavailable()` builds one that refuses every operation.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    available: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            available: true,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            entries: HashMap::new(),
            available: false,
        }
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        if !self.available {
            return None;
        }
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable);
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable);
        }
        self.entries.remove(key);
        Ok(())
    }
}

/// Persists the credential string under [`TOKEN_KEY`].
///
/// Storage failures are logged and swallowed: a broken store reads as
/// "no session" and never surfaces an error to the caller.
#[derive(Debug, Clone)]
pub struct TokenStore<S> {
    store: S,
}

impl<S: KeyValueStore> TokenStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn set_token(&mut self, value: &str) {
        if let Err(e) = self.try_set_token(value) {
            tracing::warn!("Failed to persist token: {}", e);
        }
    }

    /// Like [`TokenStore::set_token`], for callers that must undo a paired write
    pub(crate) fn try_set_token(&mut self, value: &str) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, value)
    }

    pub fn get_token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub(crate) fn try_remove_token(&mut self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)
    }

    pub fn remove_token(&mut self) {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            tracing::warn!("Failed to remove token: {}", e);
        }
    }

    /// Profile slot kept next to the token
    pub(crate) fn try_set_raw(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.store.set(key, value)
    }

    pub(crate) fn get_raw(&self, key: &str) -> Option<String> {
        self.store.get(key).filter(|v| !v.is_empty())
    }

    pub(crate) fn remove_raw(&mut self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!("Failed to remove `{}`: {}", key, e);
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
