//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the redirector.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the redirector.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Listen address (e.g., "0.0.0.0:8080" or ":8080").
    pub address: String,

    /// Verbose logging of every condition evaluation.
    pub debug: bool,

    /// Where unmatched requests are sent. Needs `not_found_redirect_status` too.
    pub not_found_redirect: Option<String>,

    /// Status code used for the not-found redirect.
    pub not_found_redirect_status: Option<u16>,

    /// Serve the static `/panel` and `/bye` pages.
    pub demo_endpoints: bool,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route definitions keyed by route name.
    pub routes: BTreeMap<String, RouteConfig>,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:8080".to_string(),
            debug: false,
            not_found_redirect: None,
            not_found_redirect_status: None,
            demo_endpoints: true,
            request_timeout_secs: 30,
            observability: ObservabilityConfig::default(),
            routes: BTreeMap::new(),
        }
    }
}

impl RedirectConfig {
    /// Address suitable for binding a socket.
    ///
    /// A bare `:port` binds on all interfaces.
    pub fn bind_address(&self) -> String {
        if self.address.starts_with(':') {
            format!("0.0.0.0{}", self.address)
        } else {
            self.address.clone()
        }
    }

    /// Iterate routes together with their effective match path.
    pub fn routes_with_paths(&self) -> impl Iterator<Item = (&str, &str, &RouteConfig)> {
        self.routes
            .iter()
            .map(|(name, route)| (name.as_str(), route.match_path(name), route))
    }
}

/// A single routing rule as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path to match. Defaults to the route's key.
    #[serde(default)]
    pub path: Option<String>,

    /// Raw conditions, e.g. `"User-Agent has Chrome"`. Evaluated in order.
    #[serde(default)]
    pub conditions: Vec<String>,

    /// HTTP methods this route answers.
    #[serde(default)]
    pub allowed_methods: Vec<String>,

    /// Redirect target when every condition holds.
    pub success_redirect: String,

    /// Redirect target when any condition fails.
    pub failure_redirect: String,

    /// Status code for both redirects.
    #[serde(default = "default_redirect_status")]
    pub redirect_status: u16,
}

impl RouteConfig {
    /// The path this route is served on.
    pub fn match_path<'a>(&'a self, name: &'a str) -> &'a str {
        self.path.as_deref().unwrap_or(name)
    }
}

fn default_redirect_status() -> u16 {
    302
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Prometheus scrape listener. Metrics export is off when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_address: None,
        }
    }
}
