//! Request id propagation.
//!
//! Every request carries an id, either supplied by the caller in
//! `X-Request-ID` or minted here. The id tags the request span and is
//! echoed back on the response so clients can quote it in bug reports.

use axum::body::Body;
use axum::http::header::HeaderName;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

/// Inbound header consulted for a caller-supplied request id.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request id stored in request extensions for downstream handlers.
#[derive(Debug, Clone)]
pub struct RequestId(#[allow(dead_code)] pub String);

/// Middleware that tags each request with an id and a tracing span.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let id = caller_supplied_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let started = std::time::Instant::now();
    let mut response = next.run(req).instrument(span).await;

    tracing::info!(
        request_id = %id,
        status = response.status().as_u16(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-request-id"), value);
    }

    response
}

fn caller_supplied_id(req: &Request<Body>) -> Option<String> {
    let raw = req.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_header(value: &str) -> Request<Body> {
        Request::builder()
            .header(REQUEST_ID_HEADER, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn caller_id_is_honoured() {
        let req = request_with_header("abc-123");
        assert_eq!(caller_supplied_id(&req), Some("abc-123".to_string()));
    }

    #[test]
    fn empty_header_is_ignored() {
        let req = request_with_header("");
        assert_eq!(caller_supplied_id(&req), None);
    }

    #[test]
    fn absent_header_yields_none() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(caller_supplied_id(&req), None);
    }
}
