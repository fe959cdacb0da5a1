//! Node-selection workflow
//!
//! Three manually advanced steps: pick a physical host, list its logical
//! members, pick (or type) a worker id. Moving between steps never resets
//! anything; only committing a different host does.

use std::sync::Arc;

use chord_client::{ClusterClient, ConsoleError, Result, WorkerId};
use tracing::{info, warn};

use crate::{registry::HostRegistry, session::Session};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionStep {
    PickHost,
    ListMembers,
    PickWorker,
}

impl SelectionStep {
    pub const ALL: [SelectionStep; 3] = [
        SelectionStep::PickHost,
        SelectionStep::ListMembers,
        SelectionStep::PickWorker,
    ];

    pub fn index(self) -> usize {
        match self {
            SelectionStep::PickHost => 0,
            SelectionStep::ListMembers => 1,
            SelectionStep::PickWorker => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SelectionStep::PickHost => "Select Physical Node",
            SelectionStep::ListMembers => "List Logicals",
            SelectionStep::PickWorker => "Select Worker ID",
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    pub fn back(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }
}

/// Guided selection of the active `(host, worker)` target
pub struct NodeSelection {
    session: Session,
    client: Arc<ClusterClient>,
    registry: HostRegistry,
    step: SelectionStep,
}

impl NodeSelection {
    pub fn new(session: Session, client: Arc<ClusterClient>, registry: HostRegistry) -> Self {
        Self {
            session,
            client,
            registry,
            step: SelectionStep::PickHost,
        }
    }

    pub fn step(&self) -> SelectionStep {
        self.step
    }

    pub fn next(&mut self) -> SelectionStep {
        self.step = self.step.next();
        self.step
    }

    pub fn back(&mut self) -> SelectionStep {
        self.step = self.step.back();
        self.step
    }

    pub fn registry(&self) -> &HostRegistry {
        &self.registry
    }

    /// Step 1: commit the host registered under `label`.
    ///
    /// Re-selecting the current host keeps the worker and member list.
    pub fn select_host(&mut self, label: &str) -> Result<String> {
        let address = self.registry.resolve(label)?.to_string();
        if self.session.host().as_deref() != Some(address.as_str()) {
            self.session.select_host(&address);
        }
        Ok(address)
    }

    /// Step 2: list the logical members of the selected host.
    ///
    /// On failure the previously listed members are left as they were.
    pub async fn list_members(&mut self) -> Result<Vec<WorkerId>> {
        let host = self
            .session
            .host()
            .ok_or_else(|| ConsoleError::validation("No physical node selected"))?;

        let members = self.client.list_workers(&host).await.inspect_err(|e| {
            warn!(host = %host, "Listing logical members failed: {}", e);
        })?;

        if self.session.replace_members(&host, members.clone()) {
            info!(host = %host, count = members.len(), "Listed logical members");
        } else {
            info!(host = %host, "Host changed while listing; result discarded");
        }
        Ok(members)
    }

    pub fn members(&self) -> Vec<WorkerId> {
        self.session.members()
    }

    /// Step 3: pick a worker id, listed or not
    pub fn select_worker(&mut self, worker: WorkerId) -> Result<()> {
        if self.session.host().is_none() {
            return Err(ConsoleError::validation("Please select a physical node first"));
        }
        self.session.select_worker(Some(worker));
        Ok(())
    }

    /// Step 3, manual entry: an empty entry clears the selection
    pub fn enter_worker(&mut self, input: &str) -> Result<Option<WorkerId>> {
        let input = input.trim();
        if input.is_empty() {
            self.session.select_worker(None);
            return Ok(None);
        }
        let worker: WorkerId = input.parse().map_err(|_| {
            ConsoleError::validation(format!(
                "Worker ID must be a non-negative integer, got `{}`",
                input
            ))
        })?;
        self.select_worker(worker)?;
        Ok(Some(worker))
    }
}
