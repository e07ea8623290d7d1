//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the echo client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Application identity and lifecycle settings.
    pub app: AppConfig,

    /// Profiling endpoint settings.
    pub profiling: ProfilingConfig,

    /// RPC client settings.
    pub rpc: RpcConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Application identity and lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name used in log lines and the profiling endpoint.
    pub name: String,

    /// Upper bound on shutdown latency in milliseconds.
    ///
    /// Once a termination signal arrives the process exits within this
    /// window, gracefully or by force.
    pub fail_fast_timeout_ms: u64,
}

impl AppConfig {
    /// The fail-fast timeout as a [`Duration`].
    pub fn fail_fast_timeout(&self) -> Duration {
        Duration::from_millis(self.fail_fast_timeout_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "echo-client".to_string(),
            fail_fast_timeout_ms: 3_000,
        }
    }
}

/// Profiling endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfilingConfig {
    /// Start the profiling listener.
    pub enabled: bool,

    /// Host to bind (e.g., "127.0.0.1").
    pub host: String,

    /// Port to bind.
    pub port: u16,
}

impl ProfilingConfig {
    /// `host:port` as configured.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 10086,
        }
    }
}

/// RPC client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Address of the echo server (e.g., "127.0.0.1:20000").
    pub server_address: String,

    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Per-call timeout (write request, read reply) in milliseconds.
    pub request_timeout_ms: u64,
}

impl RpcConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1:20000".to_string(),
            connect_timeout_ms: 3_000,
            request_timeout_ms: 5_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit ANSI colors in log output.
    pub ansi: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ansi: false,
        }
    }
}
