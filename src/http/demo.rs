//! Static landing pages used by the sample configuration.

use axum::{routing::get, Router};

/// Paths served by the demo pages.
pub const DEMO_PATHS: [&str; 2] = ["/panel", "/bye"];

async fn panel() -> &'static str {
    "Hello user, how are you?"
}

async fn bye() -> &'static str {
    "Nothing here! Bye!!!"
}

/// Router with the demo pages mounted.
pub fn demo_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(DEMO_PATHS[0], get(panel))
        .route(DEMO_PATHS[1], get(bye))
}
