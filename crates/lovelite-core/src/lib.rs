//! Shared service plumbing for LoveLite.
//!
//! Health probes, the request-id layer, and tracing setup. No domain logic
//! lives here; services keep their own error and config types.

pub mod health;
pub mod middleware;
pub mod tracing;
