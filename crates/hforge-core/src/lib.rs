//! hforge-core — class-reference resolution for CREATE FUNCTION descriptors.
//!
//! # Overview
//!
//! A function descriptor binds a function name to an implementation class.
//! The class may be given directly (`com.acme.Widget`) or as a registry
//! reference (`hforge:acme/widget`) that is looked up remotely. This crate
//! defines:
//!
//! - [`ClassReference`] / [`RegistryName`] — parsing and validation
//! - [`ClassRegistry`] — the async trait every registry backend implements
//! - [`Resolver`] — prefix detection, validation, timeout and retry
//! - [`ResolveError`] — structured error type
//! - [`StaticRegistry`] — in-memory backend
//! - [`CreateFunctionDesc`] — the descriptor and its explain output
//! - [`policy`] module — retry backoff

pub mod desc;
pub mod error;
pub mod policy;
pub mod reference;
pub mod registry;
pub mod resolver;
pub mod static_registry;

pub use desc::{CreateFunctionDesc, Explain};
pub use error::ResolveError;
pub use reference::{ClassReference, RegistryName, REGISTRY_MARKER};
pub use registry::ClassRegistry;
pub use resolver::{Resolver, ResolverConfig};
pub use static_registry::StaticRegistry;
