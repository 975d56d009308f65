//! Backend API client
//!
//! Thin wrapper over the five dashboard endpoints. Every call is one
//! round trip: attach the JSON content type and, when a token is set, a
//! bearer header; parse the `{success, data, error}` envelope; map the
//! failure modes onto [`ApiError`].
//!
//! A 401 is reported as [`ApiError::AuthRequired`] — the TUI reacts by
//! clearing the stored token and opening the settings dialog. Requests
//! carry no explicit timeout; the transport's own behavior applies.

use crate::error::{ApiError, Result};
use crate::types::{CustomCommandRequest, Envelope, RegistryServer, RunServerRequest, ServerInfo};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use tracing::debug;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    /// Current bearer token; swappable at runtime from the settings dialog
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(token.filter(|t| !t.trim().is_empty())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock poisoned") =
            token.filter(|t| !t.trim().is_empty());
    }

    pub fn clear_token(&self) {
        self.set_token(None);
    }

    fn current_token(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header(reqwest::header::CONTENT_TYPE, "application/json");
        match self.current_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Run an ad-hoc backend command, returning its combined output
    pub async fn run_command(&self, command: &str) -> Result<String> {
        let request = self.request(self.http.post(self.url("/api/command"))).json(
            &CustomCommandRequest {
                command: command.to_string(),
            },
        );
        self.execute(request).await
    }

    /// List the currently managed servers
    pub async fn list_servers(&self) -> Result<Vec<ServerInfo>> {
        let request = self.request(self.http.get(self.url("/api/servers")));
        self.execute(request).await
    }

    /// Stop a running server by name
    pub async fn stop_server(&self, name: &str) -> Result<String> {
        let request = self.request(
            self.http
                .post(self.url(&format!("/api/servers/{}/stop", name))),
        );
        self.execute(request).await
    }

    /// Search the registry of installable server images
    pub async fn search_registry(&self, query: &str) -> Result<Vec<RegistryServer>> {
        let request = self
            .request(self.http.get(self.url("/api/registry/search")))
            .query(&[("q", query)]);
        self.execute(request).await
    }

    /// Start a server by its registry name, returning the run output
    pub async fn run_from_registry(&self, name: &str) -> Result<String> {
        let request = self
            .request(self.http.post(self.url("/api/servers")))
            .json(&RunServerRequest {
                name: name.to_string(),
            });
        self.execute(request).await
    }

    async fn execute<T>(&self, request: reqwest::RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(%status, "backend response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::AuthRequired);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        // The envelope is expected regardless of status; a non-2xx body
        // that fails to parse still yields a usable status-line error.
        let envelope: Envelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(ApiError::Decode(e.to_string())),
            Err(_) => {
                return Err(ApiError::Http {
                    status: status.as_u16(),
                    message: status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string(),
                });
            }
        };

        if !status.is_success() {
            return Err(match envelope.error {
                Some(message) => ApiError::Server(message),
                None => ApiError::Http {
                    status: status.as_u16(),
                    message: status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string(),
                },
            });
        }

        if !envelope.success {
            return Err(ApiError::Server(
                envelope
                    .error
                    .unwrap_or_else(|| "Operation failed".to_string()),
            ));
        }

        Ok(envelope.data.unwrap_or_default())
    }
}
