// DHT operation panel: data operations against the selected worker

use std::sync::Arc;

use chord_client::{ClusterClient, MemberAction, Result};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::session::Session;

/// Interpretation of a `query *` result
#[derive(Clone, Debug, PartialEq)]
pub enum QueryAllResult {
    /// Key → value table
    Entries(Map<String, Value>),
    /// Nothing stored in the DHT
    Empty,
    /// Some other non-empty result, passed through as-is
    Other(Value),
}

impl QueryAllResult {
    fn from_response(response: Value) -> Self {
        match response {
            Value::Null => QueryAllResult::Empty,
            Value::Object(map) if map.is_empty() => QueryAllResult::Empty,
            Value::Object(map) => QueryAllResult::Entries(map),
            Value::Array(items) if items.is_empty() => QueryAllResult::Empty,
            other => QueryAllResult::Other(other),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, QueryAllResult::Empty)
    }
}

/// Insert, delete, query and depart against the session's current target.
///
/// Every operation checks the selection first and returns a validation
/// error without touching the network if host or worker is missing.
pub struct DhtOperations {
    session: Session,
    client: Arc<ClusterClient>,
}

impl DhtOperations {
    pub fn new(session: Session, client: Arc<ClusterClient>) -> Self {
        Self { session, client }
    }

    async fn run(&self, action: impl FnOnce() -> Result<MemberAction>) -> Result<Value> {
        let (host, worker) = self.session.require_target()?;
        let action = action()?;
        let endpoint = action.endpoint();
        self.client
            .member_request(&host, worker, &action)
            .await
            .inspect_err(|e| warn!(host = %host, worker, endpoint, "DHT operation failed: {}", e))
    }

    pub async fn insert(&self, key: &str, value: &str) -> Result<Value> {
        let result = self.run(|| MemberAction::insert(key, value)).await?;
        info!(key, "Insert succeeded");
        Ok(result)
    }

    pub async fn delete(&self, key: &str) -> Result<Value> {
        let result = self.run(|| MemberAction::delete(key)).await?;
        info!(key, "Delete succeeded");
        Ok(result)
    }

    pub async fn query(&self, key: &str) -> Result<Value> {
        self.run(|| MemberAction::query(key)).await
    }

    pub async fn query_all(&self) -> Result<QueryAllResult> {
        let response = self.run(|| Ok(MemberAction::query_all())).await?;
        Ok(QueryAllResult::from_response(response))
    }

    /// Make the selected worker leave the ring; on success it is no longer selected
    pub async fn depart(&self) -> Result<Value> {
        let (host, worker) = self.session.require_target()?;
        let result = self
            .client
            .member_request(&host, worker, &MemberAction::Depart)
            .await
            .inspect_err(|e| warn!(host = %host, worker, "Depart failed: {}", e))?;
        self.session.clear_worker_if(&host, worker);
        info!(host = %host, worker, "Worker departed");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_all_interpretation() {
        assert_eq!(QueryAllResult::from_response(json!({})), QueryAllResult::Empty);
        assert_eq!(QueryAllResult::from_response(Value::Null), QueryAllResult::Empty);
        assert_eq!(QueryAllResult::from_response(json!([])), QueryAllResult::Empty);

        match QueryAllResult::from_response(json!({"a": "1", "b": "2"})) {
            QueryAllResult::Entries(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map["a"], "1");
            }
            other => panic!("unexpected: {:?}", other),
        }

        assert_eq!(
            QueryAllResult::from_response(json!("Ok query_star")),
            QueryAllResult::Other(json!("Ok query_star"))
        );
    }
}
