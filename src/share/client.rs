//! Share service clients.
//!
//! [`ShareClient`] is the seam between share creation and the network.
//! [`HttpShareClient`] talks to the real service; tests use
//! [`MockShareClient`](super::mock::MockShareClient).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{ShareError, ShareResult};
use super::request::{ShareInfo, ShareRequest};

/// Path of the share creation endpoint, relative to the server URL.
pub const CREATE_PATH: &str = "/api/share/create";

/// Success code of the service's response envelope.
pub const SUCCESS_CODE: i64 = 200;

/// Anything that can create shares.
#[async_trait]
pub trait ShareClient: Send + Sync {
    /// Name of this client (for logging).
    fn name(&self) -> &'static str;

    /// Create a share. Each call is an independent remote attempt.
    async fn create_share(&self, request: &ShareRequest) -> ShareResult<ShareInfo>;
}

/// Response envelope used by the share service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Wrap a successful payload.
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    /// Build a failure envelope.
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Unwrap the payload, turning failure codes into [`ShareError::Remote`].
    pub fn into_result(self) -> ShareResult<T> {
        if self.code != SUCCESS_CODE {
            return Err(ShareError::remote(self.code, self.message));
        }
        self.data
            .ok_or_else(|| ShareError::invalid_response("success response without data"))
    }
}

/// Client for the share service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpShareClient {
    server_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpShareClient {
    /// Create a client for the service at `server_url`.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into().trim_end_matches('/').to_string(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Authenticate requests with `token`.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Full URL of the create endpoint.
    pub fn create_url(&self) -> String {
        format!("{}{}", self.server_url, CREATE_PATH)
    }
}

#[async_trait]
impl ShareClient for HttpShareClient {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn create_share(&self, request: &ShareRequest) -> ShareResult<ShareInfo> {
        let url = self.create_url();
        debug!(url = %url, files = request.paths.len(), "Posting share request");

        let mut builder = self.client.post(&url).json(request);
        if let Some(ref token) = self.token {
            builder = builder.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ShareError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Share service returned HTTP error");
            return Err(http_error(status, &body));
        }

        let envelope: ApiResponse<ShareInfo> = response
            .json()
            .await
            .map_err(|e| ShareError::invalid_response(e.to_string()))?;

        envelope.into_result()
    }
}

/// Error for a non-2xx reply. Prefers the service's own envelope when the body
/// carries one, falling back to the raw body or the status line.
fn http_error(status: reqwest::StatusCode, body: &str) -> ShareError {
    if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(body) {
        if !envelope.message.is_empty() {
            let code = if envelope.code == SUCCESS_CODE {
                status.as_u16().into()
            } else {
                envelope.code
            };
            return ShareError::remote(code, envelope.message);
        }
    }

    let body = body.trim();
    let message = if body.is_empty() {
        status.to_string()
    } else {
        body.to_string()
    };
    ShareError::remote(status.as_u16().into(), message)
}
