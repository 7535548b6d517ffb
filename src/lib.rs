//! Conditional HTTP redirector.
//!
//! Each configured route carries an ordered list of conditions such as
//! `User-Agent has Chrome` or `Time lt 2018-10-28T20:00:00+01:00`. A request
//! hitting the route is redirected to its success target when every
//! condition holds, and to its failure target otherwise.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::RedirectConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RouteTable;
