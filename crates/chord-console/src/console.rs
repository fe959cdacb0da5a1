//! Console facade wiring every component to one session
//!
//! [`ChordConsole`] owns the single authoritative [`Session`] and credential
//! store for a running console. Only the auth gate is reachable while
//! logged out (when login is required); every other accessor returns
//! [`ConsoleError::NotLoggedIn`].

use std::sync::Arc;

use chord_client::{ClusterClient, ConsoleError, CredentialStore, Result};
use tracing::info;

use crate::{
    auth::{AuthGate, CredentialCheck, StatusProbeCheck},
    config::Configuration,
    management::PhysicalManagement,
    operations::DhtOperations,
    overlay::OverlayViewer,
    registry::HostRegistry,
    session::Session,
    workflow::NodeSelection,
};

pub struct ChordConsole {
    auth: AuthGate,
    auth_required: bool,
    session: Session,
    selection: NodeSelection,
    operations: DhtOperations,
    management: PhysicalManagement,
    overlay: OverlayViewer,
}

impl ChordConsole {
    /// Build a console from layered configuration
    pub fn from_configuration(configuration: &Configuration) -> Result<Self> {
        let auth_required = configuration.auth_required();
        let check_url = configuration.auth_check_url();
        if auth_required && check_url.is_none() {
            return Err(ConsoleError::validation(
                "auth.check_url must be configured when login is required",
            ));
        }

        let registry = configuration
            .host_registry()
            .map_err(|e| ConsoleError::validation(format!("Invalid host registry: {}", e)))?;
        let credentials = CredentialStore::new();
        let client = Arc::new(ClusterClient::from_config(
            &configuration.http_client_config(),
            credentials.clone(),
        )?);
        let checker = check_url.map(|url| {
            Arc::new(StatusProbeCheck::new(client.clone(), url)) as Arc<dyn CredentialCheck>
        });

        info!(
            hosts = registry.len(),
            auth_required, "Console configured"
        );
        Ok(Self::with_parts(
            registry,
            client,
            credentials,
            checker,
            auth_required,
        ))
    }

    /// Build a console from explicit parts.
    ///
    /// `credentials` must be the store `client` was built with, so that
    /// logging in through the gate authenticates the client's requests.
    pub fn with_parts(
        registry: HostRegistry,
        client: Arc<ClusterClient>,
        credentials: CredentialStore,
        checker: Option<Arc<dyn CredentialCheck>>,
        auth_required: bool,
    ) -> Self {
        let session = Session::new();
        Self {
            auth: AuthGate::new(checker, credentials),
            auth_required,
            selection: NodeSelection::new(session.clone(), client.clone(), registry),
            operations: DhtOperations::new(session.clone(), client.clone()),
            management: PhysicalManagement::new(session.clone(), client.clone()),
            overlay: OverlayViewer::new(session.clone(), client),
            session,
        }
    }

    pub fn auth(&self) -> &AuthGate {
        &self.auth
    }

    pub fn auth_required(&self) -> bool {
        self.auth_required
    }

    fn gate(&self) -> Result<()> {
        if self.auth_required && !self.auth.is_logged_in() {
            Err(ConsoleError::NotLoggedIn)
        } else {
            Ok(())
        }
    }

    pub fn session(&self) -> Result<&Session> {
        self.gate()?;
        Ok(&self.session)
    }

    pub fn selection(&mut self) -> Result<&mut NodeSelection> {
        self.gate()?;
        Ok(&mut self.selection)
    }

    pub fn operations(&self) -> Result<&DhtOperations> {
        self.gate()?;
        Ok(&self.operations)
    }

    pub fn management(&self) -> Result<&PhysicalManagement> {
        self.gate()?;
        Ok(&self.management)
    }

    pub fn overlay(&mut self) -> Result<&mut OverlayViewer> {
        self.gate()?;
        Ok(&mut self.overlay)
    }

    /// Log out and forget the selection made under the previous login
    pub fn logout(&self) {
        self.auth.logout();
        self.session.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AUTH_REQUIRED;
    use chord_client::ErrorKind;
    use config::Config;

    fn configuration(overrides: &[(&str, &str)]) -> Configuration {
        let mut builder = Config::builder();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value).unwrap();
        }
        Configuration {
            config: builder.build().unwrap(),
        }
    }

    #[test]
    fn test_from_configuration_without_auth() {
        let configuration = configuration(&[
            ("hosts.vm1", "https://localhost/vm1"),
            (AUTH_REQUIRED, "false"),
        ]);
        let mut console = ChordConsole::from_configuration(&configuration).unwrap();
        assert!(!console.auth_required());
        assert_eq!(console.selection().unwrap().registry().len(), 1);
    }

    #[test]
    fn test_missing_check_url_is_validation_error() {
        let err = ChordConsole::from_configuration(&configuration(&[]))
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_invalid_host_registry_is_validation_error() {
        let configuration = configuration(&[
            ("hosts.vm1.address", "https://localhost/vm1"),
            (AUTH_REQUIRED, "false"),
        ]);
        let err = ChordConsole::from_configuration(&configuration)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().starts_with("Invalid host registry"));
    }
}
