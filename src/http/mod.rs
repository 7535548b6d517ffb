//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, RequestView)
//!     → [routing layer looks up and evaluates the route]
//!     → response.rs (redirect, 405, or not-found policy)
//!     → Send to client
//! ```

pub mod demo;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestView, X_REQUEST_ID};
pub use response::{dispatch, NotFoundPolicy, RedirectResponse};
pub use server::HttpServer;
