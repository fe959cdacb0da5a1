//! Session state: the selected physical host and logical worker
//!
//! One [`Session`] exists per running console and is handed to every
//! component that needs it. Clones share state. Each write takes the lock
//! once, so a reader never sees a new host paired with the old worker id.

use std::sync::Arc;

use chord_client::{ConsoleError, Result, WorkerId};
use parking_lot::RwLock;
use tracing::info;

#[derive(Debug, Default)]
struct SessionState {
    /// Empty when no host is selected
    host: String,
    worker: Option<WorkerId>,
    /// Members last listed for `host`
    members: Vec<WorkerId>,
}

/// Consistent snapshot of the current selection
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub host: Option<String>,
    pub worker: Option<WorkerId>,
}

/// Shared, injectable session handle
#[derive(Clone, Debug, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a physical host; the worker id and listed members are cleared with it
    pub fn select_host(&self, address: &str) {
        let mut state = self.inner.write();
        state.host = address.to_string();
        state.worker = None;
        state.members.clear();
        info!(host = address, "Selected physical host");
    }

    /// Set or clear the worker id without touching the host
    pub fn select_worker(&self, worker: Option<WorkerId>) {
        self.inner.write().worker = worker;
        match worker {
            Some(id) => info!(worker = id, "Selected worker"),
            None => info!("Cleared worker selection"),
        }
    }

    pub fn clear(&self) {
        *self.inner.write() = SessionState::default();
    }

    pub fn host(&self) -> Option<String> {
        let state = self.inner.read();
        (!state.host.is_empty()).then(|| state.host.clone())
    }

    pub fn worker(&self) -> Option<WorkerId> {
        self.inner.read().worker
    }

    pub fn selection(&self) -> Selection {
        let state = self.inner.read();
        Selection {
            host: (!state.host.is_empty()).then(|| state.host.clone()),
            worker: state.worker,
        }
    }

    pub fn members(&self) -> Vec<WorkerId> {
        self.inner.read().members.clone()
    }

    /// Replace the listed members, but only if `host` is still the selected host.
    ///
    /// Returns `false` when the host changed while the listing was in flight.
    pub fn replace_members(&self, host: &str, members: Vec<WorkerId>) -> bool {
        let mut state = self.inner.write();
        if state.host != host {
            return false;
        }
        state.members = members;
        true
    }

    /// Clear the worker id if the selection is still `(host, worker)`
    pub fn clear_worker_if(&self, host: &str, worker: WorkerId) -> bool {
        let mut state = self.inner.write();
        if state.host == host && state.worker == Some(worker) {
            state.worker = None;
            true
        } else {
            false
        }
    }

    /// Clear the worker id if `host` is still the selected host
    pub fn clear_worker_on(&self, host: &str) -> bool {
        let mut state = self.inner.write();
        if state.host == host {
            state.worker = None;
            true
        } else {
            false
        }
    }

    /// The selected host, or a validation error
    pub fn require_host(&self) -> Result<String> {
        self.host()
            .ok_or_else(|| ConsoleError::validation("Please select a physical node first"))
    }

    /// The selected `(host, worker)` pair, or a validation error if either is missing
    pub fn require_target(&self) -> Result<(String, WorkerId)> {
        match self.selection() {
            Selection {
                host: Some(host),
                worker: Some(worker),
            } => Ok((host, worker)),
            _ => Err(ConsoleError::validation(
                "No physical node / worker node selected",
            )),
        }
    }
}
