//! Request identity and inspection.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Extract dispatch-relevant information (host, Accept)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The ID is echoed on the response by the propagate layer

use axum::http::{header, HeaderMap, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates `x-request-id` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(value))
    }
}

/// Request ID set by the middleware, or "unknown".
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Host header, falling back to the URI authority (HTTP/2).
pub fn host<B>(request: &Request<B>) -> Option<String> {
    request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.to_string()))
}

/// All `Accept` header values, in order.
pub fn accept_values(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_make_request_id_is_uuid() {
        let req = Request::builder().body(Body::empty()).unwrap();
        let id = MakeRequestUuid.make_request_id(&req).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }

    #[test]
    fn test_host_and_accept() {
        let req = Request::builder()
            .uri("/ipfs/bafyroot")
            .header("Host", "bafyroot.ipfs.localhost")
            .header("Accept", "text/html")
            .header("Accept", "*/*;q=0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(host(&req).as_deref(), Some("bafyroot.ipfs.localhost"));
        assert_eq!(accept_values(req.headers()), vec!["text/html", "*/*;q=0.1"]);
        assert_eq!(request_id(req.headers()), "unknown");

        let req = Request::builder()
            .uri("http://example.com:8080/x")
            .body(Body::empty())
            .unwrap();
        assert_eq!(host(&req).as_deref(), Some("example.com:8080"));
    }
}
