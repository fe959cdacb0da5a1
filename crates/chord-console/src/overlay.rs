// Overlay viewer: ring topology as seen from the selected worker

use std::sync::Arc;

use chord_client::{ClusterClient, OverlayEntry, Result};
use tracing::{info, warn};

use crate::{format::short_hex, session::Session};

/// Display form of one overlay entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayRow {
    pub address: String,
    pub predecessor: String,
    pub successor: String,
    pub key_range_start: String,
    pub key_range_end: String,
}

impl OverlayRow {
    pub fn key_range(&self) -> String {
        format!("{} - {}", self.key_range_start, self.key_range_end)
    }
}

impl From<&OverlayEntry> for OverlayRow {
    fn from(entry: &OverlayEntry) -> Self {
        Self {
            address: entry.address.clone(),
            predecessor: entry.predecessor_address.clone(),
            successor: entry.successor_address.clone(),
            key_range_start: short_hex(&entry.key_range_start),
            key_range_end: short_hex(&entry.key_range_end),
        }
    }
}

pub struct OverlayViewer {
    session: Session,
    client: Arc<ClusterClient>,
    snapshot: Vec<OverlayEntry>,
}

impl OverlayViewer {
    pub fn new(session: Session, client: Arc<ClusterClient>) -> Self {
        Self {
            session,
            client,
            snapshot: Vec::new(),
        }
    }

    /// Fetch a fresh snapshot, replacing the previous one only on success
    pub async fn fetch(&mut self) -> Result<&[OverlayEntry]> {
        let (host, worker) = self.session.require_target()?;
        let entries = self
            .client
            .overlay(&host, worker)
            .await
            .inspect_err(|e| warn!(host = %host, worker, "Overlay fetch failed: {}", e))?;

        info!(host = %host, worker, members = entries.len(), "Fetched overlay");
        self.snapshot = entries;
        Ok(&self.snapshot)
    }

    /// Last fetched snapshot with the raw decimal key ranges
    pub fn snapshot(&self) -> &[OverlayEntry] {
        &self.snapshot
    }

    pub fn rows(&self) -> Vec<OverlayRow> {
        self.snapshot.iter().map(OverlayRow::from).collect()
    }
}
