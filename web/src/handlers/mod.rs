//! HTTP request handlers shared by every CodeFusion service.
//!
//! Domain routes live in the application crate; this module holds the
//! plumbing they reuse.

pub mod health;
pub mod sse;

// Re-export common handler utilities
pub use health::{health_check, readiness_check, ComponentHealth, HealthStatus, ReadinessProbe};
pub use sse::{action_stream, SseStep};
