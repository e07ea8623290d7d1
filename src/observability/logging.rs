//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Provide the logger handle the shutdown supervisor talks to
//! - Configure log level from config, overridable via `RUST_LOG`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `AppLog::close` flushes and is idempotent; both shutdown paths may call it

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `observability.log_level` when set.
pub fn init(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "echo_client={level},tower_http={level}",
            level = config.log_level.to_ascii_lowercase()
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_ansi(config.ansi))
        .try_init()
}

/// Logger collaborator used on the shutdown path.
pub trait AppLog: Send + Sync {
    fn info(&self, message: &str);

    fn error(&self, message: &str);

    /// Log a terminal line marking the process as exiting, then flush.
    fn exit(&self, message: &str);

    /// Flush buffered output. Safe to call more than once and from
    /// concurrent tasks.
    fn close(&self);
}

/// [`AppLog`] backed by the global tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingLog {
    closed: AtomicBool,
}

impl TracingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`AppLog::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn flush() {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }
}

impl AppLog for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }

    fn exit(&self, message: &str) {
        tracing::info!(exiting = true, "{message}");
        Self::flush();
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        Self::flush();
    }
}
