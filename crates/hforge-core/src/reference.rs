//! Class references: direct class names and `hforge:` registry entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Marker that turns a class reference into a registry lookup.
///
/// Matched ASCII case-insensitively, so `HFORGE:` and `hForge:` also count.
pub const REGISTRY_MARKER: &str = "hforge:";

/// A validated registry entry name, e.g. `acme/widget`.
///
/// Always non-empty and contains at least one `/`. Nothing else is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistryName(String);

impl RegistryName {
    /// Validate `name` as a registry entry name.
    pub fn new(name: impl Into<String>) -> Result<Self, ResolveError> {
        let name = name.into();
        if Self::is_valid(&name) {
            Ok(Self(name))
        } else {
            Err(ResolveError::InvalidReference { name })
        }
    }

    /// Returns `true` if `name` is non-empty and contains a `/`.
    pub fn is_valid(name: &str) -> bool {
        !name.is_empty() && name.contains('/')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RegistryName {
    type Error = ResolveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RegistryName> for String {
    fn from(name: RegistryName) -> Self {
        name.0
    }
}

/// A parsed class reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassReference {
    /// Used verbatim as the implementation class.
    Direct(String),
    /// Must be looked up in a registry.
    Registry(RegistryName),
}

impl ClassReference {
    /// Parse a raw class reference.
    ///
    /// Input shorter than the marker (including `""`) is a direct reference.
    /// A marker followed by an invalid registry name is an
    /// [`ResolveError::InvalidReference`].
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        match strip_marker(raw) {
            Some(rest) => RegistryName::new(rest).map(Self::Registry),
            None => Ok(Self::Direct(raw.to_string())),
        }
    }

    /// Returns `true` if `raw` starts with the registry marker.
    pub fn has_marker(raw: &str) -> bool {
        strip_marker(raw).is_some()
    }

    pub fn is_registry(&self) -> bool {
        matches!(self, Self::Registry(_))
    }
}

impl fmt::Display for ClassReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(class) => f.write_str(class),
            Self::Registry(name) => write!(f, "{REGISTRY_MARKER}{name}"),
        }
    }
}

/// Returns the text after the marker, or `None` if `raw` does not start with it.
fn strip_marker(raw: &str) -> Option<&str> {
    // `get` yields None both for short input and for a non-char boundary.
    let head = raw.get(..REGISTRY_MARKER.len())?;
    if head.eq_ignore_ascii_case(REGISTRY_MARKER) {
        Some(&raw[REGISTRY_MARKER.len()..])
    } else {
        None
    }
}
