//! HTTP transport for the Chord console
//!
//! A thin wrapper over `reqwest` that attaches the session's credentials as
//! basic authentication while logged in and maps every non-2xx status or
//! undecodable body into a transport-kind [`ConsoleError`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, warn};

use crate::{
    config::HttpClientConfig,
    credentials::CredentialStore,
    error::{ConsoleError, Result},
};

/// HTTP client shared by every console component
pub struct ChordHttpClient {
    client: Client,
    credentials: CredentialStore,
}

impl ChordHttpClient {
    /// Create a new HTTP client reading credentials from `credentials` on every request
    pub fn new(config: &HttpClientConfig, credentials: CredentialStore) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms));

        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
            credentials,
        })
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.credentials.basic_auth() {
            Some((username, password)) => builder.basic_auth(username, Some(password)),
            None => builder,
        }
    }

    /// Make a POST request with JSON body
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        debug!("POST {}", url);

        let response = self
            .authorize(self.client.post(url))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", url, e);
                ConsoleError::Http(e)
            })?;

        self.handle_response(response).await
    }

    /// GET `url` with explicit basic-auth credentials and return only the status code.
    ///
    /// Stored credentials are not consulted; the caller is probing whether
    /// the given pair would be accepted.
    pub async fn probe_status(
        &self,
        url: &str,
        username: &str,
        password: &str,
    ) -> Result<StatusCode> {
        debug!("GET {} (credential probe)", url);

        let response = self
            .client
            .get(url)
            .basic_auth(username, Some(password))
            .send()
            .await?;

        Ok(response.status())
    }

    /// Handle response and parse JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            error!("Request failed with status {}: {}", status, body);
            Err(ConsoleError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_with_defaults() {
        let client = ChordHttpClient::new(&HttpClientConfig::default(), CredentialStore::new());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_shares_credential_store() {
        let store = CredentialStore::new();
        let client = ChordHttpClient::new(&HttpClientConfig::default(), store.clone()).unwrap();
        store.set("admin", "secret");
        assert!(client.credentials().is_logged_in());
    }
}
