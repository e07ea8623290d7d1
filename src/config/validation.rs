//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check that addresses parse before any subsystem binds or dials
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ClientConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required string field is empty.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    /// A duration field is zero.
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    /// An address field does not parse as `ip:port`.
    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    /// Log level is not one of the known levels.
    #[error("unknown log level: {0}")]
    UnknownLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.app.name.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "app.name" });
    }
    if config.app.fail_fast_timeout_ms == 0 {
        errors.push(ValidationError::ZeroDuration {
            field: "app.fail_fast_timeout_ms",
        });
    }

    if config.profiling.enabled {
        let addr = config.profiling.address();
        if config.profiling.port == 0 || addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field: "profiling",
                value: addr,
            });
        }
    }

    if config.rpc.server_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "rpc.server_address",
            value: config.rpc.server_address.clone(),
        });
    }
    if config.rpc.connect_timeout_ms == 0 {
        errors.push(ValidationError::ZeroDuration {
            field: "rpc.connect_timeout_ms",
        });
    }
    if config.rpc.request_timeout_ms == 0 {
        errors.push(ValidationError::ZeroDuration {
            field: "rpc.request_timeout_ms",
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
