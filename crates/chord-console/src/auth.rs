//! Auth gate: login state and credential verification
//!
//! The credential check sits behind [`CredentialCheck`] so the probe endpoint
//! can be replaced without touching callers. The shipped check,
//! [`StatusProbeCheck`], treats `404 Not Found` on a protected path as
//! "credentials accepted": the endpoint has no success response of its own,
//! it only reports the resource as absent once authorization has passed.

use std::sync::Arc;

use async_trait::async_trait;
use chord_client::{ClusterClient, ConsoleError, CredentialStore, Result};
use reqwest::StatusCode;
use tracing::{info, warn};

/// Decides whether a username/password pair is valid
#[async_trait]
pub trait CredentialCheck: Send + Sync {
    async fn check(&self, username: &str, password: &str) -> bool;
}

/// Credential check against a fixed URL that answers 404 to authorized callers
pub struct StatusProbeCheck {
    client: Arc<ClusterClient>,
    check_url: String,
}

impl StatusProbeCheck {
    pub const ACCEPTED_STATUS: StatusCode = StatusCode::NOT_FOUND;

    pub fn new(client: Arc<ClusterClient>, check_url: impl Into<String>) -> Self {
        Self {
            client,
            check_url: check_url.into(),
        }
    }
}

#[async_trait]
impl CredentialCheck for StatusProbeCheck {
    async fn check(&self, username: &str, password: &str) -> bool {
        match self
            .client
            .http_client()
            .probe_status(&self.check_url, username, password)
            .await
        {
            Ok(status) => {
                let accepted = status == Self::ACCEPTED_STATUS;
                if !accepted {
                    info!(%status, "Credential check rejected");
                }
                accepted
            }
            Err(e) => {
                warn!("Credential check failed: {}", e);
                false
            }
        }
    }
}

/// Holds login state and gates the rest of the console
pub struct AuthGate {
    checker: Option<Arc<dyn CredentialCheck>>,
    credentials: CredentialStore,
}

impl AuthGate {
    pub fn new(checker: Option<Arc<dyn CredentialCheck>>, credentials: CredentialStore) -> Self {
        Self {
            checker,
            credentials,
        }
    }

    /// Ask the configured check whether the pair is valid; no check configured means rejected
    pub async fn verify(&self, username: &str, password: &str) -> bool {
        match &self.checker {
            Some(checker) => checker.check(username, password).await,
            None => {
                warn!("No credential check endpoint configured");
                false
            }
        }
    }

    /// Record credentials and mark the session logged in, without verifying them
    pub fn login(&self, username: &str, password: &str) {
        self.credentials.set(username, password);
        info!(username, "Logged in");
    }

    /// Verify, then log in on success
    pub async fn verify_and_login(&self, username: &str, password: &str) -> Result<()> {
        if username.is_empty() || password.is_empty() {
            return Err(ConsoleError::validation(
                "Please provide a username and a password",
            ));
        }
        if !self.verify(username, password).await {
            return Err(ConsoleError::AuthFailed(
                "Invalid username or password".to_string(),
            ));
        }
        self.login(username, password);
        Ok(())
    }

    pub fn logout(&self) {
        self.credentials.clear();
        info!("Logged out");
    }

    pub fn is_logged_in(&self) -> bool {
        self.credentials.is_logged_in()
    }

    pub fn username(&self) -> Option<String> {
        let credentials = self.credentials.snapshot();
        credentials.is_logged_in.then_some(credentials.username)
    }
}
