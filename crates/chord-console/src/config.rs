//! Configuration management for the Chord console
//!
//! Settings are layered: an optional YAML/TOML file, then `CHORD_*`
//! environment variables (`__` separates nested keys, e.g.
//! `CHORD_AUTH__CHECK_URL`), then explicit overrides from the command line.

use std::path::Path;

use chord_client::HttpClientConfig;
use config::{Config, Environment, File};

use crate::registry::HostRegistry;

/// Looked up relative to the working directory when no file is given
pub const DEFAULT_CONFIG_FILE: &str = "conf/console";

pub const HOSTS: &str = "hosts";
pub const AUTH_CHECK_URL: &str = "auth.check_url";
pub const AUTH_REQUIRED: &str = "auth.required";
pub const HTTP_CONNECT_TIMEOUT_MS: &str = "http.connect_timeout_ms";
pub const HTTP_READ_TIMEOUT_MS: &str = "http.read_timeout_ms";
pub const HTTP_ACCEPT_INVALID_CERTS: &str = "http.accept_invalid_certs";
pub const LOGGING_DIR: &str = "logging.dir";
pub const LOGGING_CONSOLE: &str = "logging.console";
pub const LOGGING_FILE: &str = "logging.file";
pub const LOGGING_LEVEL: &str = "logging.level";

/// Values supplied on the command line; `None` leaves the layered value alone
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub hosts: Vec<(String, String)>,
    pub auth_check_url: Option<String>,
    pub auth_required: Option<bool>,
    pub accept_invalid_certs: Option<bool>,
    pub log_level: Option<String>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut builder = Config::builder().add_source(file_source).add_source(
            Environment::with_prefix("CHORD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        for (label, address) in &overrides.hosts {
            builder = builder.set_override(format!("{}.{}", HOSTS, label), address.as_str())?;
        }
        if let Some(url) = &overrides.auth_check_url {
            builder = builder.set_override(AUTH_CHECK_URL, url.as_str())?;
        }
        if let Some(required) = overrides.auth_required {
            builder = builder.set_override(AUTH_REQUIRED, required)?;
        }
        if let Some(accept) = overrides.accept_invalid_certs {
            builder = builder.set_override(HTTP_ACCEPT_INVALID_CERTS, accept)?;
        }
        if let Some(level) = &overrides.log_level {
            builder = builder.set_override(LOGGING_LEVEL, level.as_str())?;
        }

        Ok(Self {
            config: builder.build()?,
        })
    }

    // ========================================================================
    // Cluster
    // ========================================================================

    pub fn host_registry(&self) -> anyhow::Result<HostRegistry> {
        let table = match self.config.get_table(HOSTS) {
            Ok(table) => table,
            Err(config::ConfigError::NotFound(_)) => return Ok(HostRegistry::new()),
            Err(e) => return Err(e.into()),
        };

        let mut pairs = Vec::with_capacity(table.len());
        for (label, value) in table {
            let address = value
                .into_string()
                .map_err(|e| anyhow::anyhow!("Invalid address for host `{}`: {}", label, e))?;
            pairs.push((label, address));
        }
        Ok(HostRegistry::from_pairs(pairs))
    }

    // ========================================================================
    // Auth
    // ========================================================================

    pub fn auth_check_url(&self) -> Option<String> {
        self.config
            .get_string(AUTH_CHECK_URL)
            .ok()
            .filter(|url| !url.is_empty())
    }

    pub fn auth_required(&self) -> bool {
        self.config.get_bool(AUTH_REQUIRED).unwrap_or(true)
    }

    // ========================================================================
    // HTTP
    // ========================================================================

    pub fn http_client_config(&self) -> HttpClientConfig {
        let defaults = HttpClientConfig::default();
        HttpClientConfig {
            connect_timeout_ms: self
                .config
                .get_int(HTTP_CONNECT_TIMEOUT_MS)
                .map(|v| v as u64)
                .unwrap_or(defaults.connect_timeout_ms),
            read_timeout_ms: self
                .config
                .get_int(HTTP_READ_TIMEOUT_MS)
                .map(|v| v as u64)
                .unwrap_or(defaults.read_timeout_ms),
            accept_invalid_certs: self
                .config
                .get_bool(HTTP_ACCEPT_INVALID_CERTS)
                .unwrap_or(defaults.accept_invalid_certs),
        }
    }

    // ========================================================================
    // Logging
    // ========================================================================

    pub fn log_dir(&self) -> Option<String> {
        self.config.get_string(LOGGING_DIR).ok()
    }

    pub fn log_console(&self) -> bool {
        self.config.get_bool(LOGGING_CONSOLE).unwrap_or(true)
    }

    pub fn log_file(&self) -> bool {
        self.config.get_bool(LOGGING_FILE).unwrap_or(false)
    }

    pub fn log_level(&self) -> String {
        self.config
            .get_string(LOGGING_LEVEL)
            .unwrap_or("info".to_string())
    }
}
