//! Shutdown supervision.
//!
//! # State Transitions
//! ```text
//! Running → ShuttingDown: qualifying signal received
//! ShuttingDown → Exited(Graceful): service closed before the deadline
//! ShuttingDown → Exited(Forced): deadline hit first
//! ```
//!
//! # Design Decisions
//! - Graceful close runs in the signal loop's own control flow; the
//!   forced-exit timer is the only spawned task
//! - Both arms race on one exit gate; only the winner logs and exits
//! - The exit call is injected so the race can run without killing the process

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time;

use crate::lifecycle::signals::{SignalAction, SignalSource};
use crate::observability::logging::AppLog;

/// Terminal log line of the graceful path.
pub const GRACEFUL_EXIT_MESSAGE: &str = "app exit now...";

/// Terminal log line of the forced path.
pub const FORCED_EXIT_MESSAGE: &str = "app exit now by force...";

/// Logged when SIGHUP arrives; reload is not supported.
pub const RELOAD_IGNORED_MESSAGE: &str = "configuration reload is not supported, ignoring";

/// A resource released during graceful shutdown.
#[async_trait]
pub trait Closable: Send + Sync {
    /// Release the resource. May block for an unbounded time.
    async fn close(&self);
}

/// Ends the process with an exit code.
pub trait ExitHandler: Send + Sync {
    fn exit(&self, code: i32);
}

/// [`ExitHandler`] that terminates the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl ExitHandler for ProcessExit {
    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}

/// Which arm of the race ended the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    Graceful,
    Forced,
}

impl ShutdownOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            ShutdownOutcome::Graceful => 0,
            ShutdownOutcome::Forced => 1,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ShutdownOutcome::Graceful => GRACEFUL_EXIT_MESSAGE,
            ShutdownOutcome::Forced => FORCED_EXIT_MESSAGE,
        }
    }
}

/// Process lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    ShuttingDown,
    Exited(ShutdownOutcome),
}

/// State shared by both arms of the race.
struct ExitPath {
    log: Arc<dyn AppLog>,
    exit: Arc<dyn ExitHandler>,
    started: AtomicBool,
    claimed: AtomicBool,
    state_tx: watch::Sender<ProcessState>,
}

impl ExitPath {
    /// Take the exit gate. Returns `true` for the first caller only.
    fn claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Announce the outcome, flush logs and exit. Caller must hold the gate.
    fn finish(&self, outcome: ShutdownOutcome) {
        self.state_tx.send_replace(ProcessState::Exited(outcome));
        self.log.exit(outcome.message());
        self.log.close();
        self.exit.exit(outcome.exit_code());
    }
}

/// Turns signals into a bounded-time shutdown.
pub struct Supervisor {
    service: Arc<dyn Closable>,
    timeout: Duration,
    path: Arc<ExitPath>,
}

impl Supervisor {
    /// Create a supervisor in the `Running` state.
    pub fn new(
        service: Arc<dyn Closable>,
        log: Arc<dyn AppLog>,
        exit: Arc<dyn ExitHandler>,
        timeout: Duration,
    ) -> Self {
        let (state_tx, _) = watch::channel(ProcessState::Running);
        Self {
            service,
            timeout,
            path: Arc::new(ExitPath {
                log,
                exit,
                started: AtomicBool::new(false),
                claimed: AtomicBool::new(false),
                state_tx,
            }),
        }
    }

    /// Subscribe to lifecycle state changes.
    pub fn state(&self) -> watch::Receiver<ProcessState> {
        self.path.state_tx.subscribe()
    }

    /// Consume signals until one requests shutdown, then run the race.
    ///
    /// Returns once the race is decided. Later signals are never read.
    pub async fn run<S: SignalSource>(self, mut signals: S) -> ShutdownOutcome {
        loop {
            let Some(kind) = signals.recv().await else {
                self.path.log.error("signal source closed, shutting down");
                return self.shutdown().await;
            };

            self.path.log.info(&format!("get signal {kind}"));

            match kind.action() {
                SignalAction::Reload => self.reload(),
                SignalAction::Shutdown => return self.shutdown().await,
            }
        }
    }

    fn reload(&self) {
        self.path.log.info(RELOAD_IGNORED_MESSAGE);
    }

    /// Race the graceful close against the forced-exit timer.
    ///
    /// The race runs once. Later calls wait for it to be decided and return
    /// the same outcome.
    pub async fn shutdown(&self) -> ShutdownOutcome {
        if self.path.started.swap(true, Ordering::AcqRel) {
            return self.decided().await;
        }

        self.path.state_tx.send_replace(ProcessState::ShuttingDown);
        tracing::info!(timeout = ?self.timeout, "Shutdown started");

        let path = Arc::clone(&self.path);
        let timeout = self.timeout;
        let timer = tokio::spawn(async move {
            time::sleep(timeout).await;
            if path.claim() {
                path.finish(ShutdownOutcome::Forced);
            }
        });

        self.service.close().await;

        if self.path.claim() {
            timer.abort();
            self.path.finish(ShutdownOutcome::Graceful);
            ShutdownOutcome::Graceful
        } else {
            // The timer owns the gate; let it finish reporting.
            let _ = timer.await;
            tracing::debug!("Graceful close finished after forced exit");
            ShutdownOutcome::Forced
        }
    }

    async fn decided(&self) -> ShutdownOutcome {
        let mut state = self.path.state_tx.subscribe();
        let exited = state
            .wait_for(|s| matches!(s, ProcessState::Exited(_)))
            .await
            .map(|s| *s);
        match exited {
            Ok(ProcessState::Exited(outcome)) => outcome,
            // The sender lives in `self.path`; it cannot be dropped here.
            _ => ShutdownOutcome::Forced,
        }
    }
}
