//! Shell command grammar

use chord_client::{ConsistencyModel, ConsoleError, Result};

pub const HELP: &str = "\
Session
  login <username> <password>       verify credentials and log in
  logout                            log out and clear the selection
Node selection
  list-physicals                    list registered physical nodes
  set-physical <label>              select a physical node
  list-logicals                     list workers on the selected physical node
  set-logical [id]                  select a worker (no id clears the selection)
  show-selected                     show the current selection
  step | next | back                show or move the selection step
DHT operations
  insert <key> <value>              insert or update a key
  delete <key>                      delete a key
  query <key>                       look up a key
  query-all                         list every stored key
  depart                            make the selected worker leave the ring
  overlay                           show the ring as seen from the selected worker
Physical management
  spawn                             start a worker on the selected physical node
  spawn-bootstrap <MODEL> <RF>      start a bootstrap worker (LINEARIZABLE|EVENTUAL)
  killall                           stop every worker on the selected physical node
Other
  help                              show this help
  exit                              leave the shell";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Login { username: String, password: String },
    Logout,
    ListPhysicals,
    SetPhysical(String),
    ListLogicals,
    /// Raw manual entry; empty clears the worker
    SetLogical(String),
    ShowSelected,
    Step,
    Next,
    Back,
    Insert { key: String, value: String },
    Delete(String),
    Query(String),
    QueryAll,
    Depart,
    Overlay,
    Spawn,
    SpawnBootstrap {
        model: ConsistencyModel,
        replication_factor: u32,
    },
    KillAll,
    Help,
    Exit,
    /// Blank line
    Nothing,
}

fn usage(text: &str) -> ConsoleError {
    ConsoleError::validation(format!("Usage: {}", text))
}

/// At most one argument; a missing one is returned empty
fn single_arg(rest: &str, usage_text: &str) -> Result<String> {
    let mut args = rest.split_whitespace();
    let arg = args.next().unwrap_or_default().to_string();
    if args.next().is_some() {
        return Err(usage(usage_text));
    }
    Ok(arg)
}

/// Parse one input line.
///
/// Missing key or value arguments parse to empty strings; the operation
/// itself rejects them. Keys are single words; extra words after a key are a
/// usage error, except for `insert`, where everything after the key belongs
/// to the value.
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let command = match name.to_lowercase().as_str() {
        "" => Command::Nothing,
        "login" => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next(), args.next()) {
                (Some(username), Some(password), None) => Command::Login {
                    username: username.to_string(),
                    password: password.to_string(),
                },
                _ => return Err(usage("login <username> <password>")),
            }
        }
        "logout" => Command::Logout,
        "list-physicals" => Command::ListPhysicals,
        "set-physical" => {
            let label = single_arg(rest, "set-physical <label>")?;
            if label.is_empty() {
                return Err(usage("set-physical <label>"));
            }
            Command::SetPhysical(label)
        }
        "list-logicals" => Command::ListLogicals,
        "set-logical" => Command::SetLogical(rest.to_string()),
        "show-selected" => Command::ShowSelected,
        "step" => Command::Step,
        "next" => Command::Next,
        "back" => Command::Back,
        "insert" => {
            let (key, value) = match rest.split_once(char::is_whitespace) {
                Some((key, value)) => (key, value.trim()),
                None => (rest, ""),
            };
            Command::Insert {
                key: key.to_string(),
                value: value.to_string(),
            }
        }
        "delete" => Command::Delete(single_arg(rest, "delete <key>")?),
        "query" => Command::Query(single_arg(rest, "query <key>")?),
        "query-all" => Command::QueryAll,
        "depart" => Command::Depart,
        "overlay" => Command::Overlay,
        "spawn" => Command::Spawn,
        "spawn-bootstrap" => {
            let mut args = rest.split_whitespace();
            let (Some(model), Some(factor)) = (args.next(), args.next()) else {
                return Err(usage("spawn-bootstrap <LINEARIZABLE|EVENTUAL> <replication factor>"));
            };
            let model: ConsistencyModel = model.parse()?;
            let replication_factor = factor.parse().map_err(|_| {
                ConsoleError::validation("Replication factor must be a positive integer")
            })?;
            Command::SpawnBootstrap {
                model,
                replication_factor,
            }
        }
        "killall" => Command::KillAll,
        "help" | "?" => Command::Help,
        "exit" | "quit" => Command::Exit,
        other => {
            return Err(ConsoleError::validation(format!(
                "Unknown command `{}`; type `help` for a list of commands",
                other
            )));
        }
    };
    Ok(command)
}
