//! In-memory `ClassRegistry` implementation.
//!
//! Suitable for testing, offline CLI use, and embedded deployments.
//! Thread-safe via `Arc<RwLock<HashMap>>`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::ResolveError;
use crate::reference::RegistryName;
use crate::registry::ClassRegistry;

/// Thread-safe in-memory registry of name → class entries.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    entries: Arc<RwLock<HashMap<String, String>>>,
    lookups: Arc<AtomicU64>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_entry(self, name: impl Into<String>, class: impl Into<String>) -> Self {
        self.insert(name, class);
        self
    }

    /// Add or replace an entry. Returns the previous class, if any.
    pub fn insert(&self, name: impl Into<String>, class: impl Into<String>) -> Option<String> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.into(), class.into())
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `lookup` calls served so far.
    pub fn lookup_count(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Load entries from a JSON object: `{ "acme/widget": "com.acme.Widget" }`.
    ///
    /// Keys must be valid registry names.
    pub fn from_json_str(json: &str) -> Result<Self, ResolveError> {
        let map: HashMap<RegistryName, String> =
            serde_json::from_str(json).map_err(|e| ResolveError::Config(e.to_string()))?;
        let registry = Self::new();
        for (name, class) in map {
            registry.insert(String::from(name), class);
        }
        Ok(registry)
    }

    /// Load entries from a JSON file. See [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ResolveError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ResolveError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}

#[async_trait]
impl ClassRegistry for StaticRegistry {
    async fn lookup(&self, name: &RegistryName) -> Result<String, ResolveError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| ResolveError::NotFound {
                name: name.to_string(),
            })
    }

    fn endpoint(&self) -> &str {
        "static"
    }
}
