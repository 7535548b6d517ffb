//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (redirect statuses, addresses, methods)
//! - Detect conflicting routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectConfig → Result<(), Vec<ValidationError>>
//! - Condition syntax is left to the condition compiler

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::http::{HeaderValue, Method};
use thiserror::Error;

use crate::config::schema::{RedirectConfig, RouteConfig};
use crate::http::demo::DEMO_PATHS;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),

    #[error("route '{route}': path '{path}' must start with '/'")]
    PathNotAbsolute { route: String, path: String },

    #[error("route '{route}': no allowed methods")]
    NoMethods { route: String },

    #[error("route '{route}': invalid method '{method}'")]
    InvalidMethod { route: String, method: String },

    #[error("route '{route}': {field} must be a non-empty header-safe URL")]
    InvalidTarget { route: String, field: &'static str },

    #[error("route '{route}': redirect status {status} is not a 3xx code")]
    InvalidRedirectStatus { route: String, status: u16 },

    #[error("not-found redirect status {0} is not a 3xx code")]
    InvalidNotFoundStatus(u16),

    #[error("not-found redirect target is not a header-safe URL")]
    InvalidNotFoundTarget,

    #[error("routes '{first}' and '{second}' both handle {method} {path}")]
    DuplicateRoute {
        first: String,
        second: String,
        method: String,
        path: String,
    },

    #[error("route '{route}' uses {path}, which is served by the demo pages")]
    ShadowsDemoEndpoint { route: String, path: String },
}

/// Check the configuration, collecting every problem found.
pub fn validate_config(config: &RedirectConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.bind_address().parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress(config.address.clone()));
    }

    if let Some(status) = config.not_found_redirect_status {
        if !is_redirect_status(status) {
            errors.push(ValidationError::InvalidNotFoundStatus(status));
        }
    }
    if let Some(target) = &config.not_found_redirect {
        if HeaderValue::from_str(target).is_err() {
            errors.push(ValidationError::InvalidNotFoundTarget);
        }
    }

    // (METHOD, path) -> owning route name
    let mut claimed: HashMap<(String, String), String> = HashMap::new();

    for (name, path, route) in config.routes_with_paths() {
        validate_route(name, path, route, &mut errors);

        // The demo router owns these paths for every method.
        if config.demo_endpoints && DEMO_PATHS.contains(&path) {
            errors.push(ValidationError::ShadowsDemoEndpoint {
                route: name.to_string(),
                path: path.to_string(),
            });
        }

        for method in &route.allowed_methods {
            let method = method.to_ascii_uppercase();

            let key = (method.clone(), path.to_string());
            if let Some(first) = claimed.get(&key) {
                errors.push(ValidationError::DuplicateRoute {
                    first: first.clone(),
                    second: name.to_string(),
                    method,
                    path: path.to_string(),
                });
            } else {
                claimed.insert(key, name.to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(name: &str, path: &str, route: &RouteConfig, errors: &mut Vec<ValidationError>) {
    if !path.starts_with('/') {
        errors.push(ValidationError::PathNotAbsolute {
            route: name.to_string(),
            path: path.to_string(),
        });
    }

    if route.allowed_methods.is_empty() {
        errors.push(ValidationError::NoMethods {
            route: name.to_string(),
        });
    }
    for method in &route.allowed_methods {
        if Method::from_bytes(method.to_ascii_uppercase().as_bytes()).is_err() {
            errors.push(ValidationError::InvalidMethod {
                route: name.to_string(),
                method: method.clone(),
            });
        }
    }

    for (field, target) in [
        ("success_redirect", &route.success_redirect),
        ("failure_redirect", &route.failure_redirect),
    ] {
        if target.is_empty() || HeaderValue::from_str(target).is_err() {
            errors.push(ValidationError::InvalidTarget {
                route: name.to_string(),
                field,
            });
        }
    }

    if !is_redirect_status(route.redirect_status) {
        errors.push(ValidationError::InvalidRedirectStatus {
            route: name.to_string(),
            status: route.redirect_status,
        });
    }
}

fn is_redirect_status(status: u16) -> bool {
    (300..=399).contains(&status)
}
