//! Request correlation
//!
//! Each request carries a UUID in `x-request-id`. A well-formed incoming value
//! is kept so callers can correlate their own logs; anything else is replaced.
//! Handlers take [`RequestId`] as an extractor and the trace span records it.

use std::{convert::Infallible, fmt};

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses the incoming header, if present and a valid UUID
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let raw = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?;
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    fn header_value(self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.0.hyphenated().to_string()).ok()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Routers mounted without the middleware still get a usable ID
        let id = parts
            .extensions
            .get::<RequestId>()
            .copied()
            .or_else(|| RequestId::from_headers(&parts.headers))
            .unwrap_or_else(RequestId::generate);
        Ok(id)
    }
}

/// Stores the request's ID in its extensions and mirrors it on the response
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let id = RequestId::from_headers(request.headers()).unwrap_or_else(RequestId::generate);
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;
    if let Some(value) = id.header_value() {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// `TraceLayer` span carrying method, path and request ID
pub fn make_span_with_request_id(request: &Request<Body>) -> tracing::Span {
    let span = tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = request.uri().path(),
        request_id = tracing::field::Empty,
    );
    if let Some(id) = request.extensions().get::<RequestId>() {
        span.record("request_id", tracing::field::display(id));
    }
    span
}
