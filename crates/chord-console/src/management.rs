// Physical management panel: lifecycle actions on the selected host

use std::sync::Arc;

use chord_client::{
    ClusterClient, ConsistencyModel, ConsoleError, ManagementAction, Result, error_message,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::session::Session;

/// Spawn, bootstrap and kill logical members on the selected physical host.
///
/// Each successful action clears the selected worker id, since existing
/// member ids may no longer be valid. The host stays selected.
pub struct PhysicalManagement {
    session: Session,
    client: Arc<ClusterClient>,
}

impl PhysicalManagement {
    pub fn new(session: Session, client: Arc<ClusterClient>) -> Self {
        Self { session, client }
    }

    async fn run(&self, host: &str, action: ManagementAction) -> Result<Value> {
        let body = self
            .client
            .management_request(host, &action)
            .await
            .inspect_err(|e| {
                warn!(host, endpoint = action.endpoint(), "Management call failed: {}", e)
            })?;

        if let Some(message) = error_message(&body) {
            warn!(host, endpoint = action.endpoint(), "Management call rejected: {}", message);
            return Err(ConsoleError::Application(message));
        }

        self.session.clear_worker_on(host);
        info!(host, endpoint = action.endpoint(), "Management call succeeded");
        Ok(body)
    }

    pub async fn spawn(&self) -> Result<Value> {
        let host = self.session.require_host()?;
        self.run(&host, ManagementAction::Spawn).await
    }

    pub async fn spawn_bootstrap(
        &self,
        consistency_model: ConsistencyModel,
        replication_factor: u32,
    ) -> Result<Value> {
        let host = self.session.require_host()?;
        let action = ManagementAction::spawn_bootstrap(consistency_model, replication_factor)?;
        self.run(&host, action).await
    }

    pub async fn kill_all(&self) -> Result<Value> {
        let host = self.session.require_host()?;
        self.run(&host, ManagementAction::KillAll).await
    }
}
