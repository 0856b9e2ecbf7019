//! Content store clients

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::error::ContentError;
use super::query::StoreQuery;
use crate::config::StoreConfig;

/// Executes queries against a content store
///
/// Implementations return the raw query result: an array for list and slug
/// queries, an object or `null` for slug lookups.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn fetch(&self, query: &StoreQuery) -> Result<Value, ContentError>;
}

/// GROQ-over-HTTP client for a Sanity project
pub struct HttpStore {
    client: Client,
    config: StoreConfig,
}

impl HttpStore {
    /// Create a new client; configuration is checked on first use
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Query endpoint URL
    pub fn endpoint(&self) -> Result<String, ContentError> {
        let config = &self.config;
        if config.project_id.trim().is_empty() {
            return Err(ContentError::Misconfigured("missing project id".to_string()));
        }
        if config.dataset.trim().is_empty() {
            return Err(ContentError::Misconfigured("missing dataset".to_string()));
        }

        let host = if config.use_cdn {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        let version = config.api_version.trim_start_matches('v');

        Ok(format!(
            "https://{}.{}/v{}/data/query/{}",
            config.project_id, host, version, config.dataset
        ))
    }
}

#[async_trait]
impl ContentStore for HttpStore {
    async fn fetch(&self, query: &StoreQuery) -> Result<Value, ContentError> {
        let url = self.endpoint()?;

        let mut params = vec![("query".to_string(), query.to_groq())];
        for (name, value) in query.params() {
            params.push((format!("${}", name), value.to_string()));
        }

        tracing::debug!("Querying {}: {}", url, params[0].1);

        let mut request = self.client.get(&url).query(&params);
        if let Some(token) = self.config.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status(status.as_u16()));
        }

        let mut body: Value = response.json().await?;
        body.get_mut("result")
            .map(Value::take)
            .ok_or_else(|| ContentError::Malformed("missing `result` field".to_string()))
    }
}
