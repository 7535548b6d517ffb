//! Conditional HTTP redirector.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──▶ config::loader ──▶ config::validation
//!                                            │
//!                                            ▼
//!                              routing::RouteTable::compile
//!                              (conditions compiled once)
//!                                            │
//!   Client Request                           ▼
//!   ─────────────▶ http::server ──▶ lookup(method, path)
//!                                            │
//!                                            ▼
//!                                  routing::evaluate(now)
//!                                            │
//!   Client Response                          ▼
//!   ◀───────────── 30x + Location ◀── http::response::dispatch
//! ```

use std::error::Error;
use std::path::PathBuf;

use axum::http::{header, HeaderMap, HeaderValue, Method};
use clap::{Parser, Subcommand};

use redirect_router::http::{dispatch, RequestView};
use redirect_router::lifecycle::{signals, startup, Shutdown};
use redirect_router::observability::logging::init_logging;
use redirect_router::routing::{evaluate, Clock, FixedClock, Lookup, SystemClock};

#[derive(Parser)]
#[command(name = "redirect-router")]
#[command(version, about = "Redirects requests based on User-Agent and time conditions", long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML, YAML or JSON).
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the redirect server (default)
    Serve,
    /// Validate the configuration and print the route table
    Check,
    /// Evaluate a single request offline
    Eval {
        /// Request path
        #[arg(long)]
        path: String,

        /// Request method
        #[arg(long, default_value = "GET")]
        method: String,

        /// User-Agent header value
        #[arg(long, default_value = "")]
        user_agent: String,

        /// Evaluation time (RFC3339); defaults to now
        #[arg(long)]
        at: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(cli.config).await,
        Commands::Check => check(cli.config),
        Commands::Eval {
            path,
            method,
            user_agent,
            at,
        } => eval(cli.config, &path, &method, &user_agent, at.as_deref()),
    }
}

async fn serve(path: PathBuf) -> Result<(), Box<dyn Error>> {
    let config = startup::load(&path)?;
    init_logging(&config.observability, config.debug);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %path.display(),
        address = %config.bind_address(),
        debug = config.debug,
        "redirect-router starting"
    );

    let prepared = startup::prepare(config)?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);
    startup::serve(prepared, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn check(path: PathBuf) -> Result<(), Box<dyn Error>> {
    let config = startup::load(&path)?;
    init_logging(&config.observability, config.debug);
    let prepared = startup::prepare(config)?;

    println!("Loaded routes:");
    print!("{}", startup::describe_routes(&prepared.table));
    println!("{}: OK ({} routes)", path.display(), prepared.table.len());
    Ok(())
}

fn eval(
    path: PathBuf,
    request_path: &str,
    method: &str,
    user_agent: &str,
    at: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let config = startup::load(&path)?;
    init_logging(&config.observability, config.debug);
    let prepared = startup::prepare(config)?;

    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
    let mut headers = HeaderMap::new();
    if !user_agent.is_empty() {
        headers.insert(header::USER_AGENT, HeaderValue::from_str(user_agent)?);
    }
    let now = match at {
        Some(ts) => FixedClock::parse(ts)?.now(),
        None => SystemClock.now(),
    };

    let view = RequestView::new(&method, request_path, &headers);
    match prepared.table.lookup(&method, request_path) {
        Lookup::Found(route) => {
            let outcome = evaluate(&route, &view, now);
            let redirect = dispatch(&route, outcome);
            println!(
                "route {}: {} -> {} {}",
                route.name,
                outcome.as_str(),
                redirect.status.as_u16(),
                redirect.location.to_str().unwrap_or("?")
            );
        }
        Lookup::MethodNotAllowed(allowed) => {
            let allowed: Vec<&str> = allowed.iter().map(|m| m.as_str()).collect();
            println!("405 Method Not Allowed (allow: {})", allowed.join(", "));
        }
        Lookup::RedirectTrailingSlash(canonical) => {
            println!("redirect to canonical path {}", canonical);
        }
        Lookup::NotFound => println!("no route for {} {}", method, request_path),
    }
    Ok(())
}
