//! Request ID middleware for request tracing and correlation.
//!
//! Every response carries an `x-request-id`. An ID supplied by an upstream
//! proxy is reused when it looks sane; otherwise a UUID v4 is generated. The
//! ID is also recorded on the tracing span and the Sentry scope.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Accept an upstream request ID only if it is short and plain ASCII.
fn sanitize_request_id(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    let valid = !raw.is_empty()
        && raw.len() <= MAX_REQUEST_ID_LEN
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    valid.then_some(raw)
}

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(sanitize_request_id)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_accepts_proxy_ids() {
        assert_eq!(
            sanitize_request_id("8d3f2c1a-6b7e-4c1d-9f00-abcdef012345"),
            Some("8d3f2c1a-6b7e-4c1d-9f00-abcdef012345")
        );
        assert_eq!(sanitize_request_id(" cf.ray_123 "), Some("cf.ray_123"));
    }

    #[test]
    fn test_sanitize_rejects_odd_values() {
        assert_eq!(sanitize_request_id(""), None);
        assert_eq!(sanitize_request_id("has space"), None);
        assert_eq!(sanitize_request_id("<script>"), None);
        assert_eq!(sanitize_request_id(&"a".repeat(200)), None);
    }
}
