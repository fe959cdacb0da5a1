//! Chord Client - HTTP client for a Chord DHT cluster
//!
//! This crate provides:
//! - An HTTP transport that attaches the session's basic-auth credentials
//! - Typed request variants for the management and per-member surfaces
//! - Response envelopes and the overlay snapshot model
//! - A uniform error taxonomy (validation, application, transport)

pub mod client;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod http;
pub mod model;

pub use client::ClusterClient;
pub use config::HttpClientConfig;
pub use credentials::{CredentialStore, Credentials};
pub use error::{ConsoleError, ErrorKind, Result, Severity};
pub use http::ChordHttpClient;
pub use model::*;
