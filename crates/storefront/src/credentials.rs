//! Process-wide bearer token store.
//!
//! Where the token ultimately lives (keychain, browser storage, a file) is
//! the embedding application's business. This store only holds the current
//! token in memory and hands it to the gateway on every request.

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};

/// Shared, cloneable holder for the current access token.
#[derive(Clone, Default)]
pub struct CredentialStore {
    token: Arc<RwLock<Option<SecretString>>>,
}

impl CredentialStore {
    /// An empty store (signed out).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with a token.
    #[must_use]
    pub fn with_token(token: SecretString) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token))),
        }
    }

    /// Replace the current token.
    pub fn set(&self, token: SecretString) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Forget the current token.
    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Value for the `Authorization` header, if a token is stored.
    pub(crate) fn authorization(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| format!("Bearer {}", t.expose_secret()))
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("signed_in", &self.is_signed_in())
            .finish()
    }
}
