//! Cross-origin policy: a single allowed origin, any method, any header.

use axum::extract::{Request, State};
use axum::http::header::{self, HeaderMap, HeaderValue, InvalidHeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

const ALLOW_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";
const PREFLIGHT_MAX_AGE: &str = "600";

/// Origin allowed to call the API from a browser
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origin: HeaderValue,
}

impl CorsPolicy {
    pub fn new(origin: &str) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            origin: HeaderValue::from_str(origin)?,
        })
    }

    pub fn allows(&self, origin: &HeaderValue) -> bool {
        *origin == self.origin
    }

    fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.origin.clone());
        headers.append(header::VARY, HeaderValue::from_static("Origin"));
    }

    /// Answer an `OPTIONS` preflight without reaching the handlers
    fn preflight(&self, origin: &HeaderValue, requested_headers: Option<HeaderValue>) -> Response {
        if !self.allows(origin) {
            return (StatusCode::BAD_REQUEST, "Disallowed CORS origin").into_response();
        }

        let mut response = (StatusCode::OK, "OK").into_response();
        let headers = response.headers_mut();
        self.apply(headers);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        if let Some(requested) = requested_headers {
            headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested);
        }
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE),
        );
        response
    }
}

/// Middleware applying [`CorsPolicy`] to every route
pub async fn apply_cors(State(policy): State<CorsPolicy>, req: Request, next: Next) -> Response {
    let origin = req.headers().get(header::ORIGIN).cloned();

    if let Some(origin) = &origin {
        if req.method() == Method::OPTIONS
            && req
                .headers()
                .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
        {
            let requested = req
                .headers()
                .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
                .cloned();
            return policy.preflight(origin, requested);
        }
    }

    let mut response = next.run(req).await;
    if origin.is_some_and(|o| policy.allows(&o)) {
        policy.apply(response.headers_mut());
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_only_configured_origin() {
        let policy = CorsPolicy::new("http://localhost:3000").unwrap();
        assert!(policy.allows(&HeaderValue::from_static("http://localhost:3000")));
        assert!(!policy.allows(&HeaderValue::from_static("http://localhost:3001")));
        assert!(!policy.allows(&HeaderValue::from_static("https://evil.example")));
    }

    #[test]
    fn test_preflight_echoes_requested_headers() {
        let policy = CorsPolicy::new("http://localhost:3000").unwrap();
        let response = policy.preflight(
            &HeaderValue::from_static("http://localhost:3000"),
            Some(HeaderValue::from_static("content-type, x-trace")),
        );

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "content-type, x-trace"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
    }

    #[test]
    fn test_preflight_rejects_other_origins() {
        let policy = CorsPolicy::new("http://localhost:3000").unwrap();
        let response = policy.preflight(&HeaderValue::from_static("http://other:3000"), None);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[test]
    fn test_rejects_invalid_origin_value() {
        assert!(CorsPolicy::new("http://bad\norigin").is_err());
    }
}
