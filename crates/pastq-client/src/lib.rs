//! Shared HTTP client for the past-question library API.
//!
//! Provides a minimal client with Bearer-token auth, generic GET/POST
//! helpers that decode the API's `{success, ...}` envelope, and domain
//! methods (login, list, upload, update, rename, delete, import). The CLI
//! uses this client directly.

pub mod api;
pub mod snapshot;

use std::time::Duration;

use pastq_core::{AppError, Config};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the past-question API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String, token: Option<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Create a client from the typed config plus the locally stored token
    /// (empty token means unauthenticated).
    pub fn from_config(config: &Config, token: String) -> Result<Self, AppError> {
        Self::new(config.api_base.clone(), Some(token))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.is_empty());
    }

    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// GET request with query parameters. Decodes the JSON envelope.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);
        request = self.apply_auth(request);

        if !query.is_empty() {
            request = request.query(query);
        }

        tracing::debug!(url = %url, "GET");
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Failed to send request: {}", e)))?;

        Self::decode(response).await
    }

    /// POST a JSON body and decode the envelope.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).json(body));

        tracing::debug!(url = %url, "POST json");
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Failed to send request: {}", e)))?;

        Self::decode(response).await
    }

    /// POST a multipart form and decode the envelope.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, AppError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).multipart(form));

        tracing::debug!(url = %url, "POST multipart");
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Failed to send request: {}", e)))?;

        Self::decode(response).await
    }

    /// Decode a response: non-2xx and `success: false` bodies both surface
    /// the server's `error`/`message` field, else "HTTP {status}".
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::from_response(status.as_u16(), &text));
        }

        let value: serde_json::Value = if text.trim().is_empty() {
            serde_json::Value::Object(Default::default())
        } else {
            serde_json::from_str(&text)
                .map_err(|e| AppError::Network(format!("Invalid JSON response: {}", e)))?
        };

        if value.get("success").and_then(|v| v.as_bool()) == Some(false) {
            return Err(AppError::from_response(status.as_u16(), &text));
        }

        serde_json::from_value(value)
            .map_err(|e| AppError::Network(format!("Unexpected response shape: {}", e)))
    }
}

// Re-export domain request/response types for convenience.
pub use api::{ImportReport, UploadRequest};
pub use snapshot::read_snapshot;
