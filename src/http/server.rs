//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the demo pages and the redirect handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener with graceful shutdown
//! - Dispatch requests through lookup → evaluate → redirect

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RedirectConfig;
use crate::http::demo::demo_router;
use crate::http::request::{MakeRequestUuid, PropagateRequestIdLayer, RequestView, SetRequestIdLayer};
use crate::http::response::{dispatch, method_not_allowed, trailing_slash_redirect, NotFoundPolicy};
use crate::observability::metrics;
use crate::routing::{evaluate, Clock, Lookup, RouteTable, SystemClock};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub not_found: Arc<NotFoundPolicy>,
    pub clock: Arc<dyn Clock>,
}

/// HTTP server for the redirector.
pub struct HttpServer {
    router: Router,
    table: Arc<RouteTable>,
}

impl HttpServer {
    /// Create a server reading the system clock.
    pub fn new(config: &RedirectConfig, table: RouteTable, not_found: NotFoundPolicy) -> Self {
        Self::with_clock(config, table, not_found, Arc::new(SystemClock))
    }

    /// Create a server with an explicit time source.
    pub fn with_clock(
        config: &RedirectConfig,
        table: RouteTable,
        not_found: NotFoundPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let table = Arc::new(table);
        let state = AppState {
            table: table.clone(),
            not_found: Arc::new(not_found),
            clock,
        };

        let router = Self::build_router(config, state);
        Self { router, table }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RedirectConfig, state: AppState) -> Router {
        let mut router: Router<AppState> = Router::new();
        if config.demo_endpoints {
            router = router.merge(demo_router::<AppState>());
        }

        router
            .fallback(redirect_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The configured router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.table.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Looks up the route, evaluates its conditions, and redirects.
async fn redirect_handler(State(state): State<AppState>, request: Request) -> Response {
    let started = Instant::now();
    let view = RequestView::from_request(&request);

    match state.table.lookup(view.method(), view.path()) {
        Lookup::Found(route) => {
            let outcome = evaluate(&route, &view, state.clock.now());
            let redirect = dispatch(&route, outcome);

            tracing::debug!(
                request_id = %view.request_id(),
                route = %route.name,
                outcome = outcome.as_str(),
                location = ?redirect.location,
                status = redirect.status.as_u16(),
                "Request evaluated"
            );
            metrics::record_outcome(&route.name, outcome, started);

            redirect.into_response()
        }
        Lookup::MethodNotAllowed(allowed) => {
            tracing::warn!(
                request_id = %view.request_id(),
                method = %view.method(),
                path = %view.path(),
                "Method not allowed"
            );
            metrics::record_unmatched("method_not_allowed");
            method_not_allowed(&allowed)
        }
        Lookup::RedirectTrailingSlash(path) => {
            tracing::debug!(
                request_id = %view.request_id(),
                method = %view.method(),
                path = %view.path(),
                location = %path,
                "Redirecting to canonical path"
            );
            metrics::record_unmatched("trailing_slash");
            trailing_slash_redirect(view.method(), &path, request.uri().query())
        }
        Lookup::NotFound => {
            tracing::info!(
                request_id = %view.request_id(),
                method = %view.method(),
                path = %view.path(),
                "No route matched"
            );
            metrics::record_unmatched("not_found");
            state.not_found.respond()
        }
    }
}
