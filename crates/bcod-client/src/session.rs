//! Credential storage and the route-level session gate.
//!
//! The gate is a coarse presence check only: it never validates expiry or
//! signature. The remote API is trusted to reject a stale token on the
//! next request, which surfaces as [`StoreError::Unauthenticated`]
//! rather than a silent retry.
//!
//! [`StoreError::Unauthenticated`]: crate::error::StoreError::Unauthenticated

use std::sync::{Arc, RwLock};

/// Persisted bearer-credential storage, read at request-build time so a
/// token set mid-session takes effect on the very next request.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// In-memory token store for tests and short-lived sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a token, convenient in tests.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.read().map(|t| t.clone()).unwrap_or_default()
    }

    fn set(&self, token: &str) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }
}

/// Outcome of a gate check for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Redirect to the login entry point, retaining the originally
    /// requested location for the post-login return.
    RedirectToLogin { return_to: String },
}

/// Decides, per navigation, whether a bearer credential is present.
pub struct SessionGate {
    tokens: Arc<dyn TokenStore>,
}

impl SessionGate {
    #[must_use]
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens }
    }

    /// Synchronous presence check of the persisted credential.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.tokens.get().is_some()
    }

    /// Gates access to `requested`; unauthenticated access redirects to
    /// login with the original path preserved.
    #[must_use]
    pub fn check(&self, requested: &str) -> Access {
        if self.is_authorized() {
            Access::Granted
        } else {
            Access::RedirectToLogin {
                return_to: requested.to_string(),
            }
        }
    }
}
