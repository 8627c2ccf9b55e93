//! Registry endpoint configuration.

use std::path::Path;
use std::time::Duration;

use hforge_core::policy::RetryConfig;
use hforge_core::{RegistryName, ResolveError, ResolverConfig};
use serde::{Deserialize, Serialize};

/// Placeholder replaced by the registry name in [`RegistryConfig::path_template`].
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Where and how to reach the class registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Scheme, host and port, e.g. "http://172.22.2.117:3000"
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path appended to `base_url`; `{name}` is replaced verbatim
    #[serde(default = "default_path_template")]
    pub path_template: String,
    /// Per-attempt deadline in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Largest accepted response body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_base_url() -> String { "http://172.22.2.117:3000".into() }
fn default_path_template() -> String { "/list/{name}/class".into() }
fn default_timeout_ms() -> u64 { 15_000 }
fn default_max_body_bytes() -> usize { 1 << 24 }
fn default_user_agent() -> String { concat!("hforge/", env!("CARGO_PKG_VERSION")).into() }

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path_template: default_path_template(),
            timeout_ms: default_timeout_ms(),
            max_body_bytes: default_max_body_bytes(),
            user_agent: default_user_agent(),
            retry: RetryConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Default configuration pointing at `http://{host}:{port}`.
    pub fn from_host_port(host: &str, port: u16) -> Self {
        Self::with_base_url(format!("http://{host}:{port}"))
    }

    /// Default configuration pointing at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ResolveError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ResolveError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ResolveError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ResolveError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Check that the base URL parses and the template has a placeholder.
    pub fn validate(&self) -> Result<(), ResolveError> {
        reqwest::Url::parse(&self.base_url)
            .map_err(|e| ResolveError::Config(format!("invalid base_url {:?}: {e}", self.base_url)))?;
        if !self.path_template.contains(NAME_PLACEHOLDER) {
            return Err(ResolveError::Config(format!(
                "path_template {:?} has no {NAME_PLACEHOLDER} placeholder",
                self.path_template
            )));
        }
        if self.max_body_bytes == 0 {
            return Err(ResolveError::Config("max_body_bytes must be positive".into()));
        }
        Ok(())
    }

    /// Lookup URL for `name`, e.g. `http://host:3000/list/acme/widget/class`.
    pub fn lookup_url(&self, name: &RegistryName) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.path_template.replace(NAME_PLACEHOLDER, name.as_str())
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolver settings matching this registry's timeout and retry policy.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            timeout: Some(self.timeout()),
            retry: self.retry.clone(),
        }
    }
}
