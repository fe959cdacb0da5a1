// Interactive shell driving a ChordConsole

use std::io::Write;

use chord_client::{ConsoleError, Result, Severity};
use chord_console::{ChordConsole, QueryAllResult};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::command::{Command, HELP, parse_command};

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub fn notify(severity: Severity, message: impl std::fmt::Display) {
    println!("[{}] {}", severity, message);
}

pub fn report(error: &ConsoleError) {
    notify(error.severity(), error);
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

pub struct Shell {
    console: ChordConsole,
}

impl Shell {
    pub fn new(console: ChordConsole) -> Self {
        Self { console }
    }

    /// Log in, verifying the credentials first when login is required
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        if self.console.auth_required() {
            self.console
                .auth()
                .verify_and_login(username, password)
                .await
        } else {
            self.console.auth().login(username, password);
            Ok(())
        }
    }

    fn prompt(&mut self) -> String {
        let Ok(session) = self.console.session() else {
            return "chord (logged out)> ".to_string();
        };
        let selection = session.selection();
        let host = selection.host.as_deref().map(|address| {
            self.console
                .selection()
                .ok()
                .and_then(|s| s.registry().label_of(address).map(str::to_string))
                .unwrap_or_else(|| address.to_string())
        });
        match (host, selection.worker) {
            (Some(host), Some(worker)) => format!("chord [{}:{}]> ", host, worker),
            (Some(host), None) => format!("chord [{}]> ", host),
            _ => "chord> ".to_string(),
        }
    }

    /// Read commands from stdin until `exit` or end of input
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("Type `help` for a list of commands.");

        loop {
            print!("{}", self.prompt());
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                println!();
                break;
            };

            let outcome = match parse_command(&line) {
                Ok(command) => self.execute(command).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    debug!("Command failed: {:?}", e);
                    report(&e);
                }
            }
        }
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Nothing => {}
            Command::Help => println!("{}", HELP),
            Command::Exit => return Ok(Flow::Exit),

            // ================================================================
            // Session
            // ================================================================
            Command::Login { username, password } => {
                self.login(&username, &password).await?;
                notify(Severity::Success, format!("Logged in as {}", username));
            }
            Command::Logout => {
                self.console.logout();
                notify(Severity::Info, "Logged out");
            }

            // ================================================================
            // Node selection
            // ================================================================
            Command::ListPhysicals => {
                let current = self.console.session()?.host();
                let registry = self.console.selection()?.registry();
                if registry.is_empty() {
                    notify(Severity::Info, "No physical nodes configured");
                }
                for (label, address) in registry.iter() {
                    let marker = if current.as_deref() == Some(address) { "*" } else { " " };
                    println!("{} {:<12} {}", marker, label, address);
                }
            }
            Command::SetPhysical(label) => {
                let address = self.console.selection()?.select_host(&label)?;
                notify(
                    Severity::Success,
                    format!("Selected physical node {} ({})", label, address),
                );
            }
            Command::ListLogicals => {
                let members = self.console.selection()?.list_members().await?;
                if members.is_empty() {
                    notify(Severity::Info, "No logical nodes running");
                } else {
                    let ids: Vec<String> = members.iter().map(|id| id.to_string()).collect();
                    println!("{}", ids.join(" "));
                }
            }
            Command::SetLogical(entry) => match self.console.selection()?.enter_worker(&entry)? {
                Some(worker) => notify(Severity::Success, format!("Selected worker {}", worker)),
                None => notify(Severity::Info, "Worker selection cleared"),
            },
            Command::ShowSelected => {
                let selection = self.console.session()?.selection();
                let host = selection.host.as_deref().unwrap_or("-");
                let worker = selection
                    .worker
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("Physical node: {}", host);
                println!("Worker:        {}", worker);
            }
            Command::Step | Command::Next | Command::Back => {
                let selection = self.console.selection()?;
                let step = match command {
                    Command::Next => selection.next(),
                    Command::Back => selection.back(),
                    _ => selection.step(),
                };
                println!("Step {}/3: {}", step.index() + 1, step.label());
            }

            // ================================================================
            // DHT operations
            // ================================================================
            Command::Insert { key, value } => {
                let result = self.console.operations()?.insert(&key, &value).await?;
                notify(Severity::Success, render_value(&result));
            }
            Command::Delete(key) => {
                let result = self.console.operations()?.delete(&key).await?;
                notify(Severity::Success, render_value(&result));
            }
            Command::Query(key) => {
                let result = self.console.operations()?.query(&key).await?;
                println!("{}", render_value(&result));
            }
            Command::QueryAll => match self.console.operations()?.query_all().await? {
                QueryAllResult::Empty => notify(Severity::Info, "No data in the DHT"),
                QueryAllResult::Entries(entries) => {
                    for (key, value) in &entries {
                        println!("{:<20} {}", key, render_value(value));
                    }
                }
                QueryAllResult::Other(value) => println!("{}", render_value(&value)),
            },
            Command::Depart => {
                let result = self.console.operations()?.depart().await?;
                notify(Severity::Success, render_value(&result));
            }
            Command::Overlay => {
                let overlay = self.console.overlay()?;
                overlay.fetch().await?;
                let rows = overlay.rows();
                if rows.is_empty() {
                    notify(Severity::Info, "Overlay is empty");
                }
                for row in rows {
                    println!(
                        "{}\n  predecessor: {}\n  successor:   {}\n  key range:   {}",
                        row.address,
                        row.predecessor,
                        row.successor,
                        row.key_range()
                    );
                }
            }

            // ================================================================
            // Physical management
            // ================================================================
            Command::Spawn => {
                let result = self.console.management()?.spawn().await?;
                notify(Severity::Success, format!("Spawned: {}", render_value(&result)));
            }
            Command::SpawnBootstrap {
                model,
                replication_factor,
            } => {
                let result = self
                    .console
                    .management()?
                    .spawn_bootstrap(model, replication_factor)
                    .await?;
                notify(
                    Severity::Success,
                    format!("Bootstrap spawned: {}", render_value(&result)),
                );
            }
            Command::KillAll => {
                self.console.management()?.kill_all().await?;
                notify(Severity::Success, "All workers stopped");
            }
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chord_client::{ClusterClient, CredentialStore, ErrorKind, HttpClientConfig};
    use chord_console::HostRegistry;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn shell_for(server: &MockServer, auth_required: bool) -> Shell {
        let credentials = CredentialStore::new();
        let client = Arc::new(
            ClusterClient::from_config(
                &HttpClientConfig::default().with_timeouts(1000, 2000),
                credentials.clone(),
            )
            .unwrap(),
        );
        let registry = HostRegistry::from_pairs([("east", server.uri())]);
        Shell::new(ChordConsole::with_parts(
            registry,
            client,
            credentials,
            None,
            auth_required,
        ))
    }

    #[tokio::test]
    async fn test_failed_command_keeps_shell_usable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/management/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([5, 9])))
            .expect(1)
            .mount(&server)
            .await;

        let mut shell = shell_for(&server, false);

        let err = shell
            .execute(Command::Insert {
                key: "a".to_string(),
                value: "1".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let flow = shell
            .execute(Command::SetPhysical("east".to_string()))
            .await
            .unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(shell.execute(Command::ListLogicals).await.unwrap(), Flow::Continue);
        shell
            .execute(Command::SetLogical("9".to_string()))
            .await
            .unwrap();

        let session = shell.console.session().unwrap();
        assert_eq!(session.members(), vec![5, 9]);
        assert_eq!(session.host(), Some(server.uri()));
        assert_eq!(session.worker(), Some(9));
    }

    #[tokio::test]
    async fn test_remote_error_keeps_selection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/api/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "no such key"})))
            .mount(&server)
            .await;

        let mut shell = shell_for(&server, false);
        shell
            .execute(Command::SetPhysical("east".to_string()))
            .await
            .unwrap();
        shell
            .execute(Command::SetLogical("2".to_string()))
            .await
            .unwrap();

        let err = shell
            .execute(Command::Query("k".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Application);
        assert_eq!(shell.console.session().unwrap().worker(), Some(2));
        assert_eq!(shell.execute(Command::ShowSelected).await.unwrap(), Flow::Continue);
    }

    #[tokio::test]
    async fn test_exit_ends_the_loop() {
        let server = MockServer::start().await;
        let mut shell = shell_for(&server, false);
        assert_eq!(shell.execute(Command::Nothing).await.unwrap(), Flow::Continue);
        assert_eq!(shell.execute(Command::Help).await.unwrap(), Flow::Continue);
        assert_eq!(shell.execute(Command::Exit).await.unwrap(), Flow::Exit);
    }

    #[tokio::test]
    async fn test_commands_gated_until_login() {
        let server = MockServer::start().await;
        let mut shell = shell_for(&server, true);

        let err = shell.execute(Command::ListLogicals).await.unwrap_err();
        assert!(matches!(err, ConsoleError::NotLoggedIn));

        // No credential check configured, so every login is rejected
        let err = shell
            .execute(Command::Login {
                username: "admin".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::AuthFailed(_)));

        assert_eq!(shell.prompt(), "chord (logged out)> ");
        assert_eq!(shell.execute(Command::Help).await.unwrap(), Flow::Continue);
    }

    #[tokio::test]
    async fn test_prompt_shows_selection() {
        let server = MockServer::start().await;
        let mut shell = shell_for(&server, false);
        assert_eq!(shell.prompt(), "chord> ");

        shell
            .execute(Command::SetPhysical("east".to_string()))
            .await
            .unwrap();
        shell
            .execute(Command::SetLogical("4".to_string()))
            .await
            .unwrap();
        assert_eq!(shell.prompt(), "chord [east:4]> ");
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!("Node 3 departed")), "Node 3 departed");
        assert_eq!(render_value(&json!(42)), "42");
        assert_eq!(render_value(&json!({"id": 4})), "{\n  \"id\": 4\n}");
    }
}
