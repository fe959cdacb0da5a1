//! Typed request variants for both cluster surfaces
//!
//! Each action is a closed enum variant carrying its own payload, so an
//! insert without a value or a bootstrap with a zero replication factor
//! cannot be constructed in the first place. The `Serialize` impls produce
//! exactly the JSON body the remote end expects.

use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

use crate::{
    constants::{management_path, member_path},
    error::{ConsoleError, Result},
};

/// Identifier of a logical member, unique within its physical host
pub type WorkerId = u32;

/// Consistency model requested when bootstrapping a ring
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsistencyModel {
    Linearizable,
    Eventual,
}

impl ConsistencyModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsistencyModel::Linearizable => "LINEARIZABLE",
            ConsistencyModel::Eventual => "EVENTUAL",
        }
    }
}

impl fmt::Display for ConsistencyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsistencyModel {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("LINEARIZABLE") {
            Ok(ConsistencyModel::Linearizable)
        } else if s.eq_ignore_ascii_case("EVENTUAL") {
            Ok(ConsistencyModel::Eventual)
        } else {
            Err(ConsoleError::validation(format!(
                "Unsupported consistency model `{}` (expected LINEARIZABLE or EVENTUAL)",
                s
            )))
        }
    }
}

/// Payload of a `spawnBootstrap` management call
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BootstrapRequest {
    pub consistency_model: ConsistencyModel,
    pub replication_factor: NonZeroU32,
}

/// Actions on a physical host's management surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManagementAction {
    List,
    Spawn,
    SpawnBootstrap(BootstrapRequest),
    KillAll,
}

impl ManagementAction {
    /// Build a bootstrap action, rejecting a replication factor below 1
    pub fn spawn_bootstrap(
        consistency_model: ConsistencyModel,
        replication_factor: u32,
    ) -> Result<Self> {
        let replication_factor = NonZeroU32::new(replication_factor).ok_or_else(|| {
            ConsoleError::validation("Replication factor must be a positive integer")
        })?;
        Ok(ManagementAction::SpawnBootstrap(BootstrapRequest {
            consistency_model,
            replication_factor,
        }))
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            ManagementAction::List => management_path::LIST,
            ManagementAction::Spawn => management_path::SPAWN,
            ManagementAction::SpawnBootstrap(_) => management_path::SPAWN_BOOTSTRAP,
            ManagementAction::KillAll => management_path::KILL_ALL,
        }
    }
}

impl Serialize for ManagementAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ManagementAction::SpawnBootstrap(request) => request.serialize(serializer),
            _ => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

/// Payload of a `query` call; the key `*` selects every entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub key: String,
}

/// Payload of a `modify` call
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum Modification {
    Insert { key: String, value: String },
    Delete { key: String },
}

/// Actions on one logical member's surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberAction {
    Query(QueryRequest),
    Modify(Modification),
    Depart,
    Overlay,
}

fn require_key(key: &str) -> Result<String> {
    if key.is_empty() {
        Err(ConsoleError::validation("Please provide a key"))
    } else {
        Ok(key.to_string())
    }
}

impl MemberAction {
    pub fn insert(key: &str, value: &str) -> Result<Self> {
        if key.is_empty() || value.is_empty() {
            return Err(ConsoleError::validation("Please provide a key and a value"));
        }
        Ok(MemberAction::Modify(Modification::Insert {
            key: key.to_string(),
            value: value.to_string(),
        }))
    }

    pub fn delete(key: &str) -> Result<Self> {
        Ok(MemberAction::Modify(Modification::Delete {
            key: require_key(key)?,
        }))
    }

    pub fn query(key: &str) -> Result<Self> {
        Ok(MemberAction::Query(QueryRequest {
            key: require_key(key)?,
        }))
    }

    pub fn query_all() -> Self {
        MemberAction::Query(QueryRequest {
            key: member_path::QUERY_ALL_KEY.to_string(),
        })
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            MemberAction::Query(_) => member_path::QUERY,
            MemberAction::Modify(_) => member_path::MODIFY,
            MemberAction::Depart => member_path::DEPART,
            MemberAction::Overlay => member_path::OVERLAY,
        }
    }
}

impl Serialize for MemberAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            MemberAction::Query(request) => request.serialize(serializer),
            MemberAction::Modify(modification) => modification.serialize(serializer),
            MemberAction::Depart | MemberAction::Overlay => {
                serializer.serialize_map(Some(0))?.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_management_bodies() {
        assert_eq!(
            serde_json::to_value(ManagementAction::List).unwrap(),
            json!({})
        );
        assert_eq!(
            serde_json::to_value(ManagementAction::KillAll).unwrap(),
            json!({})
        );

        let action = ManagementAction::spawn_bootstrap(ConsistencyModel::Eventual, 3).unwrap();
        assert_eq!(action.endpoint(), "spawnBootstrap");
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"consistency_model": "EVENTUAL", "replication_factor": 3})
        );
    }

    #[test]
    fn test_bootstrap_rejects_zero_replication() {
        let err = ManagementAction::spawn_bootstrap(ConsistencyModel::Linearizable, 0).unwrap_err();
        assert!(matches!(err, ConsoleError::Validation(_)));
    }

    #[test]
    fn test_consistency_model_parse() {
        assert_eq!(
            "LINEARIZABLE".parse::<ConsistencyModel>().unwrap(),
            ConsistencyModel::Linearizable
        );
        assert_eq!(
            "eventual".parse::<ConsistencyModel>().unwrap(),
            ConsistencyModel::Eventual
        );
        assert!("STRONG".parse::<ConsistencyModel>().is_err());
    }

    #[test]
    fn test_member_bodies() {
        let insert = MemberAction::insert("a", "1").unwrap();
        assert_eq!(insert.endpoint(), "modify");
        assert_eq!(
            serde_json::to_value(&insert).unwrap(),
            json!({"operation": "insert", "key": "a", "value": "1"})
        );

        let delete = MemberAction::delete("a").unwrap();
        assert_eq!(
            serde_json::to_value(&delete).unwrap(),
            json!({"operation": "delete", "key": "a"})
        );

        assert_eq!(
            serde_json::to_value(MemberAction::query_all()).unwrap(),
            json!({"key": "*"})
        );
        assert_eq!(
            serde_json::to_value(MemberAction::Depart).unwrap(),
            json!({})
        );
        assert_eq!(MemberAction::Overlay.endpoint(), "overlay");
    }

    #[test]
    fn test_member_constructors_reject_empty_fields() {
        assert!(MemberAction::insert("", "1").is_err());
        assert!(MemberAction::insert("a", "").is_err());
        assert!(MemberAction::delete("").is_err());
        assert!(MemberAction::query("").is_err());
    }
}
