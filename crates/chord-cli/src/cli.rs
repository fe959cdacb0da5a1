//! Command line arguments for chordctl

use std::path::PathBuf;

use chord_console::ConfigOverrides;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "chordctl",
    version,
    about = "Interactive operator console for a Chord DHT cluster"
)]
pub struct Cli {
    /// Configuration file (YAML or TOML); defaults to conf/console.yml when present
    #[arg(short = 'c', long = "config", env = "CHORD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Register a physical host, e.g. `--host vm1=https://10.0.0.1/vm1`
    #[arg(long = "host", value_name = "LABEL=URL", value_parser = parse_host)]
    pub hosts: Vec<(String, String)>,

    /// URL of the credential check endpoint
    #[arg(long = "auth-check-url")]
    pub auth_check_url: Option<String>,

    /// Log in with these credentials on startup
    #[arg(short = 'u', long = "username", env = "CHORD_USERNAME")]
    pub username: Option<String>,

    #[arg(
        short = 'p',
        long = "password",
        env = "CHORD_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Do not require login before using the console
    #[arg(long = "no-auth")]
    pub no_auth: bool,

    /// Accept invalid TLS certificates (self-signed cluster hosts)
    #[arg(long = "insecure")]
    pub insecure: bool,

    #[arg(long = "log-level", env = "CHORD_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            hosts: self.hosts.clone(),
            auth_check_url: self.auth_check_url.clone(),
            auth_required: self.no_auth.then_some(false),
            accept_invalid_certs: self.insecure.then_some(true),
            log_level: self.log_level.clone(),
        }
    }
}

fn parse_host(value: &str) -> Result<(String, String), String> {
    let (label, address) = value
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=URL, got `{}`", value))?;
    let (label, address) = (label.trim(), address.trim());
    if label.is_empty() || address.is_empty() {
        return Err(format!("expected LABEL=URL, got `{}`", value));
    }
    Ok((label.to_string(), address.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host() {
        assert_eq!(
            parse_host("vm1=https://localhost/vm1").unwrap(),
            ("vm1".to_string(), "https://localhost/vm1".to_string())
        );
        assert!(parse_host("vm1").is_err());
        assert!(parse_host("=https://localhost").is_err());
        assert!(parse_host("vm1=").is_err());
    }

    #[test]
    fn test_overrides_from_flags() {
        let cli = Cli::parse_from([
            "chordctl",
            "--host",
            "vm1=https://localhost/vm1",
            "--host",
            "vm2=https://localhost/vm2",
            "--no-auth",
            "--insecure",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.hosts.len(), 2);
        assert_eq!(overrides.auth_required, Some(false));
        assert_eq!(overrides.accept_invalid_certs, Some(true));
        assert_eq!(overrides.auth_check_url, None);
    }

    #[test]
    fn test_flags_absent_leave_config_alone() {
        let cli = Cli::parse_from(["chordctl", "--auth-check-url", "https://localhost/check"]);
        let overrides = cli.overrides();
        assert_eq!(overrides.auth_required, None);
        assert_eq!(overrides.accept_invalid_certs, None);
        assert_eq!(
            overrides.auth_check_url.as_deref(),
            Some("https://localhost/check")
        );
    }
}
