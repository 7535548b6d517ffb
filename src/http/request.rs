//! Request handling.
//!
//! # Responsibilities
//! - Expose the parts of a request that routing looks at (method, path, headers)
//! - Extract the User-Agent for condition evaluation
//! - Read the request ID set by the middleware stack
//!
//! # Design Decisions
//! - Views borrow from the request; nothing is copied per condition
//! - A missing or non-UTF-8 User-Agent reads as the empty string

use axum::http::{header, HeaderMap, Method, Request};

pub use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Borrowed view of the request inputs routing depends on.
#[derive(Debug, Clone, Copy)]
pub struct RequestView<'a> {
    method: &'a Method,
    path: &'a str,
    headers: &'a HeaderMap,
}

impl<'a> RequestView<'a> {
    pub fn new(method: &'a Method, path: &'a str, headers: &'a HeaderMap) -> Self {
        Self {
            method,
            path,
            headers,
        }
    }

    pub fn from_request<B>(request: &'a Request<B>) -> Self {
        Self::new(request.method(), request.uri().path(), request.headers())
    }

    pub fn method(&self) -> &'a Method {
        self.method
    }

    pub fn path(&self) -> &'a str {
        self.path
    }

    /// The User-Agent header, or `""` when absent.
    pub fn user_agent(&self) -> &'a str {
        self.headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    /// The request ID assigned by the middleware, if any.
    pub fn request_id(&self) -> &'a str {
        self.headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}
