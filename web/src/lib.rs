//! Axum integration for the CodeFusion registration service.
//!
//! This crate is the imperative shell around the reducer stores:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, SSE
//! │  - Request parsing                      │  ← Correlation ids
//! │  - Response serialization               │  ← Logging
//! ├─────────────────────────────────────────┤
//! │         Functional Core                 │
//! │  - Component reducers                   │  ← Form, ticket view, countdown
//! │  - Effect descriptions (values)         │  ← Email, snapshot, timers
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Build Actions** from the request body
//! 3. **Dispatch** them through a per-request `Store`
//! 4. **Wait** for the terminal result action
//! 5. **Map result** to an HTTP response (or an [`AppError`])

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use middleware::{correlation_id, CorrelationId, CORRELATION_ID_HEADER};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
