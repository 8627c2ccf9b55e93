//! Lookup policies.
//!
//! ```text
//! Resolver → [timeout] → [RetryPolicy] → [ClassRegistry]
//! ```

pub mod retry;

pub use retry::{RetryConfig, RetryPolicy};
