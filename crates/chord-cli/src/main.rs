//! chordctl - operator console for a Chord DHT cluster.
//!
//! Loads layered configuration, initializes logging, optionally logs in with
//! credentials from the command line and then runs the interactive shell.

mod cli;
mod command;
mod logging;
mod shell;

use chord_console::{ChordConsole, Configuration};
use clap::Parser;
use tracing::{info, warn};

use crate::{cli::Cli, logging::LoggingConfig, shell::Shell};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let configuration = Configuration::load(cli.config.as_deref(), &cli.overrides())?;

    let logging_config = LoggingConfig::from_configuration(&configuration);
    let _logging_guard = logging::init_logging(&logging_config)?;

    let console = ChordConsole::from_configuration(&configuration)?;
    let mut shell = Shell::new(console);

    match (cli.username.as_deref(), cli.password.as_deref()) {
        (Some(username), Some(password)) => match shell.login(username, password).await {
            Ok(()) => info!(username, "Logged in from command line"),
            Err(e) => shell::report(&e),
        },
        (Some(_), None) | (None, Some(_)) => {
            warn!("Both --username and --password are needed to log in on startup")
        }
        (None, None) => {}
    }

    shell.run().await
}
