// ClusterClient - facade for the management and per-member surfaces

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    config::HttpClientConfig,
    constants::{management_path, member_path},
    credentials::CredentialStore,
    error::{ConsoleError, Result},
    http::ChordHttpClient,
    model::{
        ConsistencyModel, ManagementAction, MemberAction, MemberEnvelope, OverlayEntry, WorkerId,
        error_message,
    },
};

/// Two-tier request client for a Chord cluster.
///
/// Management calls go to `<hostBase>/management/<action>` and return the raw
/// decoded body. Per-member calls go to `<hostBase>/<workerId>/api/<action>`,
/// fail on a truthy `error` field, and return the `response` field.
pub struct ClusterClient {
    http_client: ChordHttpClient,
    member_locks: DashMap<(String, WorkerId), Arc<Mutex<()>>>,
}

impl ClusterClient {
    pub fn new(http_client: ChordHttpClient) -> Self {
        Self {
            http_client,
            member_locks: DashMap::new(),
        }
    }

    pub fn from_config(config: &HttpClientConfig, credentials: CredentialStore) -> Result<Self> {
        Ok(Self::new(ChordHttpClient::new(config, credentials)?))
    }

    pub fn http_client(&self) -> &ChordHttpClient {
        &self.http_client
    }

    pub fn management_url(host_base: &str, action: &ManagementAction) -> String {
        format!(
            "{}/{}/{}",
            host_base.trim_end_matches('/'),
            management_path::PREFIX,
            action.endpoint()
        )
    }

    pub fn member_url(host_base: &str, worker_id: WorkerId, action: &MemberAction) -> String {
        format!(
            "{}/{}/{}/{}",
            host_base.trim_end_matches('/'),
            worker_id,
            member_path::API,
            action.endpoint()
        )
    }

    // ============================================================================
    // Raw request shapes
    // ============================================================================

    /// Issue a management call and return the decoded body uninterpreted
    pub async fn management_request(
        &self,
        host_base: &str,
        action: &ManagementAction,
    ) -> Result<Value> {
        let url = Self::management_url(host_base, action);
        self.http_client.post_json(&url, action).await
    }

    /// Issue a per-member call.
    ///
    /// Calls against the same `(host, worker)` pair are serialized so that a
    /// depart never interleaves with a modify on the same member.
    pub async fn member_request(
        &self,
        host_base: &str,
        worker_id: WorkerId,
        action: &MemberAction,
    ) -> Result<Value> {
        let url = Self::member_url(host_base, worker_id, action);
        let key = (host_base.trim_end_matches('/').to_string(), worker_id);

        let lock = self.member_locks.entry(key.clone()).or_default().clone();
        let guard = lock.lock().await;

        let result = self
            .http_client
            .post_json::<MemberEnvelope, _>(&url, action)
            .await
            .and_then(MemberEnvelope::into_result);
        drop(guard);
        drop(lock);

        // A departed member is no longer addressable; forget its lock unless
        // another call is still waiting on it.
        if result.is_ok() && matches!(action, MemberAction::Depart) {
            self.member_locks
                .remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);
        }
        result
    }

    #[cfg(test)]
    fn tracked_members(&self) -> usize {
        self.member_locks.len()
    }

    // ============================================================================
    // Management APIs
    // ============================================================================

    /// List the logical members currently running on a physical host
    pub async fn list_workers(&self, host_base: &str) -> Result<Vec<WorkerId>> {
        let body = self
            .management_request(host_base, &ManagementAction::List)
            .await?;
        if let Some(message) = error_message(&body) {
            return Err(ConsoleError::Application(message));
        }
        let workers: Vec<WorkerId> = serde_json::from_value(body)?;
        debug!("Host {} lists {} workers", host_base, workers.len());
        Ok(workers)
    }

    pub async fn spawn(&self, host_base: &str) -> Result<Value> {
        self.management_request(host_base, &ManagementAction::Spawn)
            .await
    }

    pub async fn spawn_bootstrap(
        &self,
        host_base: &str,
        consistency_model: ConsistencyModel,
        replication_factor: u32,
    ) -> Result<Value> {
        let action = ManagementAction::spawn_bootstrap(consistency_model, replication_factor)?;
        self.management_request(host_base, &action).await
    }

    pub async fn kill_all(&self, host_base: &str) -> Result<Value> {
        self.management_request(host_base, &ManagementAction::KillAll)
            .await
    }

    // ============================================================================
    // Per-member APIs
    // ============================================================================

    pub async fn query(&self, host_base: &str, worker_id: WorkerId, key: &str) -> Result<Value> {
        self.member_request(host_base, worker_id, &MemberAction::query(key)?)
            .await
    }

    pub async fn query_all(&self, host_base: &str, worker_id: WorkerId) -> Result<Value> {
        self.member_request(host_base, worker_id, &MemberAction::query_all())
            .await
    }

    pub async fn insert(
        &self,
        host_base: &str,
        worker_id: WorkerId,
        key: &str,
        value: &str,
    ) -> Result<Value> {
        self.member_request(host_base, worker_id, &MemberAction::insert(key, value)?)
            .await
    }

    pub async fn delete(&self, host_base: &str, worker_id: WorkerId, key: &str) -> Result<Value> {
        self.member_request(host_base, worker_id, &MemberAction::delete(key)?)
            .await
    }

    pub async fn depart(&self, host_base: &str, worker_id: WorkerId) -> Result<Value> {
        self.member_request(host_base, worker_id, &MemberAction::Depart)
            .await
    }

    /// Fetch the ring topology as seen from one member; an absent result is an empty ring
    pub async fn overlay(&self, host_base: &str, worker_id: WorkerId) -> Result<Vec<OverlayEntry>> {
        let response = self
            .member_request(host_base, worker_id, &MemberAction::Overlay)
            .await?;
        if response.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[test]
    fn test_management_url() {
        assert_eq!(
            ClusterClient::management_url("http://east.example", &ManagementAction::List),
            "http://east.example/management/list"
        );
        assert_eq!(
            ClusterClient::management_url("http://east.example/", &ManagementAction::KillAll),
            "http://east.example/management/killall"
        );
    }

    #[test]
    fn test_member_url() {
        let action = MemberAction::insert("a", "1").unwrap();
        assert_eq!(
            ClusterClient::member_url("http://east.example", 9, &action),
            "http://east.example/9/api/modify"
        );
        assert_eq!(
            ClusterClient::member_url("https://localhost/vm1/", 0, &MemberAction::Overlay),
            "https://localhost/vm1/0/api/overlay"
        );
    }

    fn client() -> ClusterClient {
        ClusterClient::from_config(&HttpClientConfig::default(), CredentialStore::new()).unwrap()
    }

    #[tokio::test]
    async fn test_depart_forgets_member_lock() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/3/api/depart"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "bye"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/4/api/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "v"})))
            .mount(&server)
            .await;

        let client = client();
        client.query(&server.uri(), 3, "k").await.unwrap_err();
        client.query(&server.uri(), 4, "k").await.unwrap();
        assert_eq!(client.tracked_members(), 2);

        client.depart(&server.uri(), 3).await.unwrap();
        assert_eq!(client.tracked_members(), 1);
    }

    #[tokio::test]
    async fn test_failed_depart_keeps_member_lock() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/0/api/depart"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"error": "Bootstrap node cannot depart"})),
            )
            .mount(&server)
            .await;

        let client = client();
        client.depart(&server.uri(), 0).await.unwrap_err();
        assert_eq!(client.tracked_members(), 1);
    }
}
