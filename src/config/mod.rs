//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/YAML/JSON)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RedirectConfig (validated, immutable)
//!     → routing::RouteTable::compile (conditions compiled once)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError, ConfigFormat};
pub use schema::{LogFormat, ObservabilityConfig, RedirectConfig, RouteConfig};
pub use validation::ValidationError;
