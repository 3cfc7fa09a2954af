//! Mock share client for testing.
//!
//! Returns predictable shares without touching the network. Supports
//! simulated latency and remote failures, and records every request it sees.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use super::client::ShareClient;
use super::error::{ShareError, ShareResult};
use super::request::{ShareInfo, ShareRequest};

/// Configuration for mock client behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Extra fields merged into every returned share.
    pub extra_fields: serde_json::Map<String, Value>,
    /// Simulated latency before answering.
    pub delay: Option<Duration>,
    /// If set, every call fails with this error.
    pub error: Option<ShareError>,
}

impl MockConfig {
    /// Create a config that adds `key` to every returned share.
    pub fn with_field(key: impl Into<String>, value: Value) -> Self {
        let mut config = Self::default();
        config.extra_fields.insert(key.into(), value);
        config
    }

    /// Create a config with simulated latency.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    /// Create a config that fails every call.
    pub fn with_error(error: ShareError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }
}

/// Mock share client.
///
/// Returned shares echo the request (`files`, `expires`, `pwd`, `max_accessed`,
/// `readme`, `remark`) under a fresh `id`.
#[derive(Debug, Clone, Default)]
pub struct MockShareClient {
    config: Arc<MockConfig>,
    calls: Arc<AtomicU64>,
    requests: Arc<Mutex<Vec<ShareRequest>>>,
}

impl MockShareClient {
    /// Create a mock client with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock client with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config: Arc::new(config),
            ..Default::default()
        }
    }

    /// Number of create calls received so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<ShareRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn echo(&self, request: &ShareRequest) -> Value {
        let mut share = json!({
            "id": Uuid::new_v4().simple().to_string(),
            "files": request.paths,
            "expires": request.expires_at,
            "pwd": request.password,
            "max_accessed": request.max_accessed,
            "accessed": 0,
            "readme": request.readme,
            "remark": request.remark,
        });
        if let Value::Object(ref mut map) = share {
            for (key, value) in &self.config.extra_fields {
                map.insert(key.clone(), value.clone());
            }
        }
        share
    }
}

#[async_trait]
impl ShareClient for MockShareClient {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_share(&self, request: &ShareRequest) -> ShareResult<ShareInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(delay) = self.config.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(ref error) = self.config.error {
            return Err(error.clone());
        }

        ShareInfo::from_value(self.echo(request))
    }
}
