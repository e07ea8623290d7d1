//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!
//! Shutdown supervisor:
//!     → logging.rs AppLog handle (terminal exit line, flush on close)
//!
//! Operators:
//!     → profiling.rs (process-info JSON at /debug/pprof/)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Profiling listener is optional and never blocks startup

pub mod logging;
pub mod profiling;

pub use logging::{AppLog, TracingLog};
