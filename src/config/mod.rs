//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, path from --config or APP_CONF_FILE)
//!     → loader.rs (path checks, parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → handed by value/reference to each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; SIGHUP reload is not supported
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, CONFIG_FILE_ENV};
pub use schema::{AppConfig, ClientConfig, ObservabilityConfig, ProfilingConfig, RpcConfig};
pub use validation::ValidationError;
