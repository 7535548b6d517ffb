//! Response construction.
//!
//! # Responsibilities
//! - Map an evaluation outcome to the route's redirect
//! - Apply the not-found policy for unmatched requests
//! - Answer known paths hit with the wrong method with 405 + Allow
//! - Send `/a/` and `/a` to whichever of the two has a route
//!
//! # Design Decisions
//! - Success and failure share the route's status code
//! - Redirects carry only a Location header, no body

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::RedirectConfig;
use crate::routing::{Outcome, Route};

/// A redirect ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectResponse {
    pub location: HeaderValue,
    pub status: StatusCode,
}

impl IntoResponse for RedirectResponse {
    fn into_response(self) -> Response {
        (self.status, [(header::LOCATION, self.location)]).into_response()
    }
}

/// Pick the redirect for an outcome.
pub fn dispatch(route: &Route, outcome: Outcome) -> RedirectResponse {
    let location = match outcome {
        Outcome::Success => route.success_target.clone(),
        Outcome::Failure => route.failure_target.clone(),
    };
    RedirectResponse {
        location,
        status: route.redirect_status,
    }
}

/// What to do with requests no route claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundPolicy {
    Redirect(RedirectResponse),
    NotFound,
}

impl NotFoundPolicy {
    /// The redirect is on only when both target and status are configured.
    pub fn from_config(config: &RedirectConfig) -> Self {
        let target = config.not_found_redirect.as_deref().filter(|t| !t.is_empty());

        match (target, config.not_found_redirect_status) {
            (Some(target), Some(status)) => {
                let location = HeaderValue::from_str(target);
                let status = StatusCode::from_u16(status)
                    .ok()
                    .filter(StatusCode::is_redirection);
                match (location, status) {
                    (Ok(location), Some(status)) => {
                        NotFoundPolicy::Redirect(RedirectResponse { location, status })
                    }
                    _ => {
                        tracing::warn!(
                            location = %target,
                            "Ignoring invalid not-found redirect, returning 404s"
                        );
                        NotFoundPolicy::NotFound
                    }
                }
            }
            (None, None) => NotFoundPolicy::NotFound,
            _ => {
                tracing::warn!(
                    "not_found_redirect and not_found_redirect_status must both be set; returning 404s"
                );
                NotFoundPolicy::NotFound
            }
        }
    }

    pub fn respond(&self) -> Response {
        match self {
            NotFoundPolicy::Redirect(redirect) => redirect.clone().into_response(),
            NotFoundPolicy::NotFound => (StatusCode::NOT_FOUND, "404 page not found").into_response(),
        }
    }
}

/// 405 with the methods the path does accept.
pub fn method_not_allowed(allowed: &[Method]) -> Response {
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let mut response = Response::new(Body::from("Method Not Allowed"));
    *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

/// Permanent redirect to the canonical form of a path, keeping the query.
///
/// GET gets 301; other methods get 308 so clients replay the body.
pub fn trailing_slash_redirect(method: &Method, path: &str, query: Option<&str>) -> Response {
    let status = if method == Method::GET {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::PERMANENT_REDIRECT
    };
    let target = match query {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };

    match HeaderValue::from_str(&target) {
        Ok(location) => RedirectResponse { location, status }.into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Route {
        Route {
            name: "/chrome".into(),
            path: "/chrome".into(),
            conditions: vec![],
            allowed_methods: vec![Method::GET],
            success_target: HeaderValue::from_static("/panel"),
            failure_target: HeaderValue::from_static("/bye"),
            redirect_status: StatusCode::TEMPORARY_REDIRECT,
        }
    }

    #[test]
    fn test_dispatch_success_and_failure() {
        let route = route();

        let ok = dispatch(&route, Outcome::Success);
        assert_eq!(ok.location, "/panel");
        assert_eq!(ok.status, StatusCode::TEMPORARY_REDIRECT);

        let fail = dispatch(&route, Outcome::Failure);
        assert_eq!(fail.location, "/bye");
        assert_eq!(fail.status, StatusCode::TEMPORARY_REDIRECT);
    }

    #[test]
    fn test_redirect_into_response() {
        let response = dispatch(&route(), Outcome::Success).into_response();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/panel");
    }

    #[test]
    fn test_not_found_policy_requires_both_fields() {
        let mut config = RedirectConfig::default();
        assert_eq!(NotFoundPolicy::from_config(&config), NotFoundPolicy::NotFound);

        config.not_found_redirect = Some("https://example.com".into());
        assert_eq!(NotFoundPolicy::from_config(&config), NotFoundPolicy::NotFound);

        config.not_found_redirect_status = Some(301);
        assert_eq!(
            NotFoundPolicy::from_config(&config),
            NotFoundPolicy::Redirect(RedirectResponse {
                location: HeaderValue::from_static("https://example.com"),
                status: StatusCode::MOVED_PERMANENTLY,
            })
        );

        config.not_found_redirect = Some(String::new());
        assert_eq!(NotFoundPolicy::from_config(&config), NotFoundPolicy::NotFound);
    }

    #[test]
    fn test_not_found_responses() {
        let response = NotFoundPolicy::NotFound.respond();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let policy = NotFoundPolicy::Redirect(RedirectResponse {
            location: HeaderValue::from_static("/"),
            status: StatusCode::FOUND,
        });
        let response = policy.respond();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[test]
    fn test_method_not_allowed_lists_methods() {
        let response = method_not_allowed(&[Method::GET, Method::POST]);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, POST");
    }

    #[test]
    fn test_trailing_slash_redirect_status_and_query() {
        let response = trailing_slash_redirect(&Method::GET, "/chrome", Some("a=1"));
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "/chrome?a=1");

        let response = trailing_slash_redirect(&Method::POST, "/chrome", None);
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/chrome");
    }
}
