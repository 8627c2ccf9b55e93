//! Reference resolution: marker detection, validation, timeout and retry.

use std::future::Future;
use std::time::Duration;

use crate::error::ResolveError;
use crate::policy::{RetryConfig, RetryPolicy};
use crate::reference::{ClassReference, RegistryName};
use crate::registry::ClassRegistry;

/// Configuration for [`Resolver`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Deadline for a single lookup attempt. `None` disables the outer timeout.
    pub timeout: Option<Duration>,
    pub retry: RetryConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(15)),
            retry: RetryConfig::default(),
        }
    }
}

/// Resolves raw class references against a [`ClassRegistry`].
///
/// Direct references never touch the registry. Registry references are
/// validated first and only valid names reach [`ClassRegistry::lookup`].
pub struct Resolver<R> {
    registry: R,
    retry: RetryPolicy,
    timeout: Option<Duration>,
}

impl<R: ClassRegistry> Resolver<R> {
    pub fn new(registry: R, config: ResolverConfig) -> Self {
        Self {
            registry,
            retry: RetryPolicy::new(config.retry),
            timeout: config.timeout,
        }
    }

    /// Create with default configuration.
    pub fn with_defaults(registry: R) -> Self {
        Self::new(registry, ResolverConfig::default())
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Resolve `raw` to an implementation class name.
    pub async fn resolve(&self, raw: &str) -> Result<String, ResolveError> {
        match ClassReference::parse(raw)? {
            ClassReference::Direct(class) => Ok(class),
            ClassReference::Registry(name) => self.lookup(&name).await,
        }
    }

    /// Like [`resolve`](Self::resolve), but gives up with
    /// [`ResolveError::Cancelled`] as soon as `cancel` completes.
    pub async fn resolve_until<F>(&self, raw: &str, cancel: F) -> Result<String, ResolveError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            res = self.resolve(raw) => res,
            _ = cancel => {
                tracing::debug!(reference = raw, "resolution cancelled");
                Err(ResolveError::Cancelled)
            }
        }
    }

    /// Look up a validated registry name, applying timeout and retry.
    pub async fn lookup(&self, name: &RegistryName) -> Result<String, ResolveError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.lookup_once(name).await {
                Ok(class) => {
                    tracing::debug!(
                        name = %name,
                        class = %class,
                        endpoint = self.registry.endpoint(),
                        "resolved registry reference"
                    );
                    return Ok(class);
                }
                Err(e) if e.is_retryable() => match self.retry.next_delay(attempt) {
                    Some(delay) => {
                        tracing::warn!(
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            name = %name,
                            "retrying registry lookup"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        if attempt > 1 {
                            tracing::error!(attempt, error = %e, name = %name, "max retries exceeded");
                        }
                        return Err(e);
                    }
                },
                Err(e) => return Err(e),
            }
        }
    }

    async fn lookup_once(&self, name: &RegistryName) -> Result<String, ResolveError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.registry.lookup(name))
                .await
                .map_err(|_| ResolveError::Timeout {
                    ms: limit.as_millis() as u64,
                })?,
            None => self.registry.lookup(name).await,
        }
    }
}
