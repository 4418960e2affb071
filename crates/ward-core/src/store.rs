//! Credential store contract and the in-memory reference store.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::tokens::{AntiforgeryToken, SessionToken};

/// The logical keys held by a [`CredentialStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    /// Bearer session token, populated by the login flow.
    SessionToken,
    /// Cached anti-forgery token.
    AntiforgeryToken,
}

impl CredentialKey {
    /// All keys, in persistence order.
    pub const ALL: [CredentialKey; 2] = [CredentialKey::SessionToken, CredentialKey::AntiforgeryToken];

    /// The storage name of this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKey::SessionToken => "SESSION_TOKEN",
            CredentialKey::AntiforgeryToken => "CSRF_TOKEN",
        }
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key-value store for the credentials shared by all requests of a client.
///
/// There is no expiry and no eviction; callers invalidate entries by
/// overwriting them. A missing key is `None`, never an error. Writes must be
/// visible to the next read on the same store.
pub trait CredentialStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: CredentialKey) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: CredentialKey, value: String);

    /// Returns the stored session token, if any.
    fn session_token(&self) -> Option<SessionToken> {
        self.get(CredentialKey::SessionToken).map(SessionToken::new)
    }

    /// Returns the cached anti-forgery token, if any.
    ///
    /// A cached value that cannot be sent as a header is treated as absent.
    fn antiforgery_token(&self) -> Option<AntiforgeryToken> {
        self.get(CredentialKey::AntiforgeryToken)
            .and_then(|value| AntiforgeryToken::new(value).ok())
    }
}

/// In-memory credential store.
///
/// Clones share the same entries; each [`MemoryStore::new`] is isolated.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<CredentialKey, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the session token.
    pub fn set_session_token(&self, token: impl Into<String>) {
        self.set(CredentialKey::SessionToken, token.into());
    }

    /// Remove a value.
    pub fn remove(&self, key: CredentialKey) -> Option<String> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key)
    }

    /// Remove every value.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Snapshot of all entries.
    pub fn entries(&self) -> HashMap<CredentialKey, String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: CredentialKey) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    fn set(&self, key: CredentialKey, value: String) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }
}

// Intentionally hide values in Debug output
impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<_> = self.entries().into_keys().collect();
        f.debug_struct("MemoryStore")
            .field("keys", &keys)
            .field("values", &"[REDACTED]")
            .finish()
    }
}
