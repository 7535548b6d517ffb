//! Shared utilities for integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use redirect_router::config::{parse_config, ConfigFormat, RedirectConfig};
use redirect_router::http::{HttpServer, NotFoundPolicy};
use redirect_router::routing::{FixedClock, RouteTable};
use tower::ServiceExt;

pub const CHROME_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.77 Safari/537.36";
pub const FIREFOX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:62.0) Gecko/20100101 Firefox/62.0";

/// The sample configuration: Chrome users inside a time window get the panel.
pub const CHROME_CONFIG: &str = r#"
address: ":8080"
debug: true
routes:
  /chrome:
    conditions:
      - "User-Agent has Chrome"
      - "Time lt 2018-10-28T20:00:00+01:00"
      - "Time gt 2018-10-28T10:00:00+01:00"
    allowed_methods: ["GET", "POST"]
    success_redirect: "/panel"
    failure_redirect: "/bye"
    redirect_status: 302
"#;

pub fn config(yaml: &str) -> RedirectConfig {
    parse_config(yaml, ConfigFormat::Yaml).expect("config should parse")
}

/// Build the full router with time frozen at `now`.
#[allow(dead_code)]
pub fn router_at(config: &RedirectConfig, now: &str) -> Router {
    let table = RouteTable::compile(config).expect("routes should compile");
    let clock = Arc::new(FixedClock::parse(now).expect("valid timestamp"));
    HttpServer::with_clock(config, table, NotFoundPolicy::from_config(config), clock).router()
}

/// Send one request through the router.
#[allow(dead_code)]
pub async fn send(router: &Router, method: Method, path: &str, user_agent: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(ua) = user_agent {
        builder = builder.header(header::USER_AGENT, ua);
    }
    router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[allow(dead_code)]
pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
