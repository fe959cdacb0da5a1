//! Login state shared between the auth gate and the HTTP client
//!
//! The store is the single place credentials live. The HTTP client reads it
//! on every request, so a login or logout takes effect for the very next
//! call without rebuilding the client.

use std::sync::Arc;

use parking_lot::RwLock;

/// Operator credentials and the logged-in flag
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub is_logged_in: bool,
}

/// Cloneable handle to the session's credentials
#[derive(Clone, Debug, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Credentials>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record credentials and flip the logged-in flag on
    pub fn set(&self, username: &str, password: &str) {
        let mut guard = self.inner.write();
        *guard = Credentials {
            username: username.to_string(),
            password: password.to_string(),
            is_logged_in: true,
        };
    }

    /// Drop credentials and flip the logged-in flag off
    pub fn clear(&self) {
        *self.inner.write() = Credentials::default();
    }

    pub fn snapshot(&self) -> Credentials {
        self.inner.read().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.read().is_logged_in
    }

    /// Basic-auth pair to attach to outgoing requests, only while logged in
    pub fn basic_auth(&self) -> Option<(String, String)> {
        let guard = self.inner.read();
        if guard.is_logged_in {
            Some((guard.username.clone(), guard.password.clone()))
        } else {
            None
        }
    }
}
