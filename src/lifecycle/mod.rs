//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Logging → Profiling → RPC client → Demo traffic
//!
//! Signals (signals.rs):
//!     SIGHUP → reload (no-op), keep listening
//!     SIGINT/SIGQUIT/SIGTERM/other → shutdown
//!
//! Shutdown (shutdown.rs):
//!     ┌─ forced arm:  sleep(fail_fast_timeout) ─┐
//!     │                                         ├─ first to claim the gate → log, flush, exit
//!     └─ graceful:    close RPC client ─────────┘
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core, then background traffic
//! - Shutdown has timeout: forced exit after deadline
//! - Signal intake, logger and exit call are injected for testability

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{
    Closable, ExitHandler, ProcessExit, ProcessState, ShutdownOutcome, Supervisor,
    FORCED_EXIT_MESSAGE, GRACEFUL_EXIT_MESSAGE, RELOAD_IGNORED_MESSAGE,
};
pub use signals::{ChannelSignals, OsSignals, SignalAction, SignalKind, SignalSource};
