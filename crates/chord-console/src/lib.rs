//! Chord Console - operator console core for a Chord DHT cluster
//!
//! This crate provides:
//! - Session state shared by every component (selected host and worker)
//! - The auth gate and its credential check
//! - The node-selection workflow
//! - DHT operations, physical management and the overlay viewer
//! - Key-space formatting and layered configuration

pub mod auth;
pub mod config;
pub mod console;
pub mod format;
pub mod management;
pub mod operations;
pub mod overlay;
pub mod registry;
pub mod session;
pub mod workflow;

pub use auth::{AuthGate, CredentialCheck, StatusProbeCheck};
pub use config::{ConfigOverrides, Configuration};
pub use console::ChordConsole;
pub use format::{short_hex, short_hex_opt};
pub use management::PhysicalManagement;
pub use operations::{DhtOperations, QueryAllResult};
pub use overlay::{OverlayRow, OverlayViewer};
pub use registry::HostRegistry;
pub use session::{Selection, Session};
pub use workflow::{NodeSelection, SelectionStep};
