//! `CreateFunctionDesc` — the plan descriptor for `CREATE FUNCTION`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::registry::ClassRegistry;
use crate::resolver::Resolver;

/// Plan nodes that can render themselves for `EXPLAIN`.
pub trait Explain {
    /// Heading shown for the node.
    fn display_name(&self) -> &'static str;

    /// Labelled fields, in display order.
    fn explain_fields(&self) -> Vec<(&'static str, String)>;
}

/// Descriptor recording "create function `name` implemented by `class`".
///
/// The class is resolved once at construction and cannot be changed later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFunctionDesc {
    function_name: String,
    class_name: Option<String>,
}

impl CreateFunctionDesc {
    /// Bind `function_name` to `class_name` without any resolution.
    pub fn direct(function_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            class_name: Some(class_name.into()),
        }
    }

    /// Resolve `class_ref` and bind the result to `function_name`.
    pub async fn resolve<R: ClassRegistry>(
        function_name: impl Into<String>,
        class_ref: &str,
        resolver: &Resolver<R>,
    ) -> Result<Self, ResolveError> {
        let class_name = resolver.resolve(class_ref).await?;
        Ok(Self {
            function_name: function_name.into(),
            class_name: Some(class_name),
        })
    }

    /// Resolve `class_ref`, leaving the class unset if resolution fails.
    ///
    /// Never returns an error; check [`is_resolved`](Self::is_resolved).
    pub async fn resolve_lenient<R: ClassRegistry>(
        function_name: impl Into<String>,
        class_ref: &str,
        resolver: &Resolver<R>,
    ) -> Self {
        let function_name = function_name.into();
        let class_name = match resolver.resolve(class_ref).await {
            Ok(class) => Some(class),
            Err(e) => {
                tracing::warn!(
                    function = %function_name,
                    reference = class_ref,
                    error = %e,
                    "class reference unresolved; leaving class unset"
                );
                None
            }
        };
        Self {
            function_name,
            class_name,
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn set_function_name(&mut self, function_name: impl Into<String>) {
        self.function_name = function_name.into();
    }

    /// The resolved implementation class, `None` if resolution failed.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        self.class_name.is_some()
    }
}

impl Explain for CreateFunctionDesc {
    fn display_name(&self) -> &'static str {
        "Create Function"
    }

    fn explain_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.function_name.clone()),
            ("class", self.class_name.clone().unwrap_or_default()),
        ]
    }
}

impl fmt::Display for CreateFunctionDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.display_name())?;
        for (label, value) in self.explain_fields() {
            writeln!(f, "  {label}: {value}")?;
        }
        Ok(())
    }
}
