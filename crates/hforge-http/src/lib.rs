//! hforge-http — HTTP registry backend for class-reference resolution.
//!
//! ```ignore
//! let client = HttpRegistryClient::new(RegistryConfig::from_host_port("registry", 3000))?;
//! let resolver = client.into_resolver();
//! let class = resolver.resolve("hforge:acme/widget").await?;
//! ```

pub mod client;
pub mod config;

pub use client::HttpRegistryClient;
pub use config::RegistryConfig;
