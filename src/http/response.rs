//! Response construction.
//!
//! # Responsibilities
//! - Render a resolved view with its content type
//! - Map navigation failures to status codes
//!
//! # Design Decisions
//! - `NotFound` → 404 with a small HTML page
//! - `ViewLoad` → 503 with `Retry-After`, since the next attempt reloads
//! - The matched route name is exposed in `X-Route-Name`

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::routing::{Resolution, ResolveError};

/// Header naming the route that served a response.
pub const X_ROUTE_NAME: HeaderName = HeaderName::from_static("x-route-name");

/// Seconds a client should wait before retrying a failed view load.
pub const RETRY_AFTER_SECS: u64 = 1;

impl IntoResponse for Resolution {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.view.body().clone()));

        let headers = response.headers_mut();
        if let Ok(ct) = HeaderValue::from_str(self.view.content_type()) {
            headers.insert(header::CONTENT_TYPE, ct);
        }
        if let Ok(name) = HeaderValue::from_str(&self.route.name) {
            headers.insert(X_ROUTE_NAME, name);
        }
        response
    }
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        match self {
            ResolveError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                "<!doctype html><title>Not Found</title><h1>404</h1><p>Page not found.</p>",
            )
                .into_response(),
            ResolveError::ViewLoad(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                [
                    (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                    (header::RETRY_AFTER, RETRY_AFTER_SECS.to_string()),
                ],
                "View temporarily unavailable, retry shortly",
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::ViewLoadError;

    #[test]
    fn test_not_found_status() {
        let response = ResolveError::NotFound { path: "/x".into() }.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_view_load_is_retryable() {
        let response = ResolveError::ViewLoad(ViewLoadError::new("docs", "gone")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::RETRY_AFTER], "1");
    }
}
