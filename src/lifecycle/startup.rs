//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Compile the route table
//! - Start the metrics exporter, then bind the listener and serve
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

use std::fmt::Write as _;
use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, RedirectConfig};
use crate::http::{HttpServer, NotFoundPolicy};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::routing::{RouteTable, RouteTableError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to compile routes: {0}")]
    Routes(#[from] RouteTableError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything needed to serve, built once.
#[derive(Debug)]
pub struct Prepared {
    pub config: RedirectConfig,
    pub table: RouteTable,
    pub not_found: NotFoundPolicy,
}

/// Read and validate the config file.
pub fn load(path: &Path) -> Result<RedirectConfig, StartupError> {
    Ok(load_config(path)?)
}

/// Compile routes and resolve the not-found policy.
pub fn prepare(config: RedirectConfig) -> Result<Prepared, StartupError> {
    let table = RouteTable::compile(&config)?;
    if table.is_empty() {
        tracing::warn!("No routes configured; every request takes the not-found path");
    }

    for route in table.routes() {
        let methods: Vec<&str> = route.allowed_methods.iter().map(|m| m.as_str()).collect();
        let conditions: Vec<&str> = route.conditions.iter().map(|c| c.raw()).collect();
        tracing::info!(
            route = %route.name,
            path = %route.path,
            methods = %methods.join(", "),
            success = ?route.success_target,
            failure = ?route.failure_target,
            status = route.redirect_status.as_u16(),
            conditions = ?conditions,
            "Loaded route"
        );
    }

    let not_found = NotFoundPolicy::from_config(&config);
    match &not_found {
        NotFoundPolicy::Redirect(redirect) => tracing::info!(
            location = ?redirect.location,
            status = redirect.status.as_u16(),
            "Not found redirect is ON"
        ),
        NotFoundPolicy::NotFound => tracing::info!("Not found redirect is OFF, returning 404s"),
    }

    Ok(Prepared {
        config,
        table,
        not_found,
    })
}

/// Serve until `shutdown` fires.
pub async fn serve(prepared: Prepared, shutdown: &Shutdown) -> Result<(), StartupError> {
    let Prepared {
        config,
        table,
        not_found,
    } = prepared;

    if let Some(addr) = &config.observability.metrics_address {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| StartupError::MetricsAddress(addr.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(config.bind_address()).await?;
    let server = HttpServer::new(&config, table, not_found);
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}

/// Human-readable listing of the route table.
pub fn describe_routes(table: &RouteTable) -> String {
    let mut out = String::new();
    for route in table.routes() {
        let methods: Vec<&str> = route.allowed_methods.iter().map(|m| m.as_str()).collect();
        let _ = writeln!(
            out,
            "{} ({}) --> {} || x --> {} [{}]",
            route.name,
            route.path,
            route.success_target.to_str().unwrap_or("?"),
            route.failure_target.to_str().unwrap_or("?"),
            route.redirect_status.as_u16()
        );
        let _ = writeln!(out, "  {}", methods.join(", "));
        for condition in &route.conditions {
            let _ = writeln!(out, "    {}", condition);
        }
        out.push('\n');
    }
    out
}
