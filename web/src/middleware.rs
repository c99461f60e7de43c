//! Correlation id tracking.
//!
//! Every request gets a correlation id: the one sent by the client in
//! `X-Correlation-ID` when it parses as a UUID, a fresh v4 otherwise. The id
//! is stored in request extensions, attached to a tracing span around the
//! handler, and echoed back in the response header.
//!
//! # Example
//!
//! ```ignore
//! use axum::{middleware::from_fn, Router};
//! use codefusion_web::correlation_id;
//!
//! let app = Router::new()
//!     .route("/api/registrations", post(submit_registration))
//!     .layer(from_fn(correlation_id));
//! ```

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::fmt;
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Correlation id of the current request.
///
/// Reads the id stored by [`correlation_id`]; without the middleware it
/// falls back to the request header or a fresh UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn from_headers(headers: &HeaderMap) -> Uuid {
    headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4)
}

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .extensions
            .get::<Self>()
            .copied()
            .unwrap_or_else(|| Self(from_headers(&parts.headers)));
        Ok(id)
    }
}

/// Middleware function assigning a correlation id to each request.
///
/// Install with `axum::middleware::from_fn(correlation_id)`.
pub async fn correlation_id(mut req: Request, next: Next) -> Response {
    let id = CorrelationId(from_headers(req.headers()));
    req.extensions_mut().insert(id);

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %id,
        method = %req.method(),
        uri = %req.uri(),
    );

    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}
