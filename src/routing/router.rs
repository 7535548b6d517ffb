//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Compile every configured route (conditions, methods, targets) once
//! - Look up the route for a request by method and path
//! - Return matched route, method-not-allowed, or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) lookup via HashMap keyed by exact path, then method
//! - Explicit NotFound rather than silent default

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{HeaderValue, Method, StatusCode};
use thiserror::Error;

use crate::config::{RedirectConfig, RouteConfig};
use crate::routing::condition::{Condition, ConditionError};

/// Errors raised while compiling the route table.
#[derive(Debug, Error)]
pub enum RouteTableError {
    #[error("route '{route}': {source}")]
    Condition {
        route: String,
        #[source]
        source: ConditionError,
    },

    #[error("route '{route}': invalid method '{method}'")]
    InvalidMethod { route: String, method: String },

    #[error("route '{route}': invalid redirect status {status}")]
    InvalidStatus { route: String, status: u16 },

    #[error("route '{route}': invalid redirect target '{target}'")]
    InvalidTarget { route: String, target: String },

    #[error("route '{route}': {method} {path} is already handled by another route")]
    DuplicateRoute {
        route: String,
        method: Method,
        path: String,
    },
}

/// A compiled routing rule.
#[derive(Debug)]
pub struct Route {
    pub name: String,
    pub path: String,
    /// Evaluation order; the first failing condition decides.
    pub conditions: Vec<Condition>,
    pub allowed_methods: Vec<Method>,
    pub success_target: HeaderValue,
    pub failure_target: HeaderValue,
    pub redirect_status: StatusCode,
}

impl Route {
    /// Compile a route from its config entry.
    pub fn compile(name: &str, config: &RouteConfig) -> Result<Self, RouteTableError> {
        let conditions = config
            .conditions
            .iter()
            .map(|raw| Condition::compile(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| RouteTableError::Condition {
                route: name.to_string(),
                source,
            })?;

        let allowed_methods = config
            .allowed_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.to_ascii_uppercase().as_bytes()).map_err(|_| {
                    RouteTableError::InvalidMethod {
                        route: name.to_string(),
                        method: m.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let redirect_status = StatusCode::from_u16(config.redirect_status)
            .ok()
            .filter(StatusCode::is_redirection)
            .ok_or_else(|| RouteTableError::InvalidStatus {
                route: name.to_string(),
                status: config.redirect_status,
            })?;

        Ok(Self {
            name: name.to_string(),
            path: config.match_path(name).to_string(),
            conditions,
            allowed_methods,
            success_target: target(name, &config.success_redirect)?,
            failure_target: target(name, &config.failure_redirect)?,
            redirect_status,
        })
    }
}

fn target(route: &str, value: &str) -> Result<HeaderValue, RouteTableError> {
    HeaderValue::from_str(value).map_err(|_| RouteTableError::InvalidTarget {
        route: route.to_string(),
        target: value.to_string(),
    })
}

/// Result of looking up a request.
#[derive(Debug)]
pub enum Lookup {
    Found(Arc<Route>),
    /// The path exists, but not for this method.
    MethodNotAllowed(Vec<Method>),
    /// No exact match, but the path with its trailing slash toggled
    /// has a route for this method.
    RedirectTrailingSlash(String),
    NotFound,
}

/// Immutable table of compiled routes.
#[derive(Debug, Default)]
pub struct RouteTable {
    by_path: HashMap<String, HashMap<Method, Arc<Route>>>,
    routes: Vec<Arc<Route>>,
}

impl RouteTable {
    /// Compile every route in the configuration.
    pub fn compile(config: &RedirectConfig) -> Result<Self, RouteTableError> {
        let mut table = Self::default();
        for (name, route) in &config.routes {
            table.insert(Route::compile(name, route)?)?;
        }
        Ok(table)
    }

    fn insert(&mut self, route: Route) -> Result<(), RouteTableError> {
        let route = Arc::new(route);
        let methods = self.by_path.entry(route.path.clone()).or_default();

        for method in &route.allowed_methods {
            if methods.contains_key(method) {
                return Err(RouteTableError::DuplicateRoute {
                    route: route.name.clone(),
                    method: method.clone(),
                    path: route.path.clone(),
                });
            }
            methods.insert(method.clone(), route.clone());
        }

        self.routes.push(route);
        Ok(())
    }

    /// Find the route for a method and path.
    pub fn lookup(&self, method: &Method, path: &str) -> Lookup {
        match self.by_path.get(path) {
            Some(methods) => match methods.get(method) {
                Some(route) => Lookup::Found(route.clone()),
                None => {
                    let mut allowed: Vec<Method> = methods.keys().cloned().collect();
                    allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
                    Lookup::MethodNotAllowed(allowed)
                }
            },
            None => match toggle_trailing_slash(path) {
                Some(alternate) if self.serves(method, &alternate) => {
                    Lookup::RedirectTrailingSlash(alternate)
                }
                _ => Lookup::NotFound,
            },
        }
    }

    fn serves(&self, method: &Method, path: &str) -> bool {
        self.by_path
            .get(path)
            .is_some_and(|methods| methods.contains_key(method))
    }

    /// All routes, in configuration order.
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// `/a/` ⇄ `/a`. The root path has no alternate.
fn toggle_trailing_slash(path: &str) -> Option<String> {
    match path.strip_suffix('/') {
        Some("") => None,
        Some(trimmed) => Some(trimmed.to_string()),
        None => Some(format!("{}/", path)),
    }
}
