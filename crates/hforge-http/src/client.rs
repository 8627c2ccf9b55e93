//! HTTP class registry backed by `reqwest`.
//!
//! One GET per lookup against `{base_url}{path_template}`. The body is read
//! chunk by chunk into a buffer that grows as data arrives, capped at
//! `max_body_bytes`, and decoded once the stream is drained.

use async_trait::async_trait;

use hforge_core::{ClassRegistry, RegistryName, ResolveError, Resolver};

use crate::config::RegistryConfig;

/// Registry client talking to an hforge HTTP endpoint.
pub struct HttpRegistryClient {
    config: RegistryConfig,
    http: reqwest::Client,
}

impl HttpRegistryClient {
    /// Create a client for the given configuration.
    pub fn new(config: RegistryConfig) -> Result<Self, ResolveError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ResolveError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    /// Create with default configuration against `base_url`.
    pub fn default_for(base_url: impl Into<String>) -> Result<Self, ResolveError> {
        Self::new(RegistryConfig::with_base_url(base_url))
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Wrap this client in a [`Resolver`] using the configured timeout and retry.
    pub fn into_resolver(self) -> Resolver<Self> {
        let config = self.config.resolver_config();
        Resolver::new(self, config)
    }

    async fn fetch(&self, url: &str) -> Result<String, ResolveError> {
        let mut resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        if !resp.status().is_success() {
            return Err(ResolveError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        let limit = self.config.max_body_bytes;
        if resp.content_length().is_some_and(|len| len > limit as u64) {
            return Err(ResolveError::BodyTooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await.map_err(|e| self.map_error(e))? {
            if body.len() + chunk.len() > limit {
                return Err(ResolveError::BodyTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
            tracing::trace!(url, bytes = body.len(), "read registry body chunk");
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn map_error(&self, e: reqwest::Error) -> ResolveError {
        if e.is_timeout() {
            ResolveError::Timeout {
                ms: self.config.timeout_ms,
            }
        } else {
            ResolveError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl ClassRegistry for HttpRegistryClient {
    async fn lookup(&self, name: &RegistryName) -> Result<String, ResolveError> {
        let url = self.config.lookup_url(name);
        tracing::debug!(url = %url, "fetching class from registry");
        let result = self.fetch(&url).await;
        if let Err(e) = &result {
            tracing::debug!(url = %url, error = %e, "registry lookup failed");
        }
        result
    }

    fn endpoint(&self) -> &str {
        &self.config.base_url
    }
}
