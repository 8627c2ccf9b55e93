//! The `ClassRegistry` trait — the abstraction over registry backends.

use async_trait::async_trait;

use crate::error::ResolveError;
use crate::reference::RegistryName;

/// A backend that maps registry names to implementation class names.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` for use across Tokio tasks.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn ClassRegistry>`.
#[async_trait]
pub trait ClassRegistry: Send + Sync + 'static {
    /// Look up the class name for `name`.
    ///
    /// Only called with validated names; backends do not re-check the `/`.
    async fn lookup(&self, name: &RegistryName) -> Result<String, ResolveError>;

    /// Identifier of the backend (base URL or a label), used in logs.
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<R: ClassRegistry + ?Sized> ClassRegistry for std::sync::Arc<R> {
    async fn lookup(&self, name: &RegistryName) -> Result<String, ResolveError> {
        (**self).lookup(name).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}
