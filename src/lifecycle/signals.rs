//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGHUP, SIGINT, SIGQUIT, SIGTERM)
//! - Translate signals to internal events
//! - Classify events into reload or shutdown
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - One intake stream instead of one handler per signal
//! - SIGHUP maps to reload, which is an explicit no-op: it is logged and the
//!   process keeps running
//! - SIGKILL cannot be caught on POSIX; `Kill` exists for classification only
//! - Anything not recognized is treated as a shutdown request

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Kind of a received signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Hangup,
    Interrupt,
    Kill,
    Quit,
    Terminate,
    /// Any other signal, by raw number.
    Other(i32),
}

/// What the supervisor does with a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    /// Reload configuration and keep running.
    Reload,
    /// Start the shutdown race.
    Shutdown,
}

impl SignalKind {
    /// Classify this signal.
    pub fn action(self) -> SignalAction {
        match self {
            SignalKind::Hangup => SignalAction::Reload,
            _ => SignalAction::Shutdown,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Hangup => write!(f, "SIGHUP"),
            SignalKind::Interrupt => write!(f, "SIGINT"),
            SignalKind::Kill => write!(f, "SIGKILL"),
            SignalKind::Quit => write!(f, "SIGQUIT"),
            SignalKind::Terminate => write!(f, "SIGTERM"),
            SignalKind::Other(raw) => write!(f, "signal {raw}"),
        }
    }
}

/// A stream of signals delivered to the supervisor.
#[async_trait]
pub trait SignalSource: Send {
    /// Wait for the next signal. `None` means the source is exhausted.
    async fn recv(&mut self) -> Option<SignalKind>;
}

/// Signals delivered by the operating system.
#[cfg(unix)]
pub struct OsSignals {
    hangup: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl OsSignals {
    /// Register interest in SIGHUP, SIGINT, SIGQUIT and SIGTERM.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn register() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind as Kind};

        Ok(Self {
            hangup: signal(Kind::hangup())?,
            interrupt: signal(Kind::interrupt())?,
            quit: signal(Kind::quit())?,
            terminate: signal(Kind::terminate())?,
        })
    }
}

#[cfg(unix)]
#[async_trait]
impl SignalSource for OsSignals {
    async fn recv(&mut self) -> Option<SignalKind> {
        tokio::select! {
            Some(()) = self.hangup.recv() => Some(SignalKind::Hangup),
            Some(()) = self.interrupt.recv() => Some(SignalKind::Interrupt),
            Some(()) = self.quit.recv() => Some(SignalKind::Quit),
            Some(()) = self.terminate.recv() => Some(SignalKind::Terminate),
            else => None,
        }
    }
}

/// Signals delivered by the operating system (Ctrl-C only).
#[cfg(not(unix))]
pub struct OsSignals {
    _private: (),
}

#[cfg(not(unix))]
impl OsSignals {
    pub fn register() -> std::io::Result<Self> {
        Ok(Self { _private: () })
    }
}

#[cfg(not(unix))]
#[async_trait]
impl SignalSource for OsSignals {
    async fn recv(&mut self) -> Option<SignalKind> {
        match tokio::signal::ctrl_c().await {
            Ok(()) => Some(SignalKind::Interrupt),
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                None
            }
        }
    }
}

/// Signals injected through a channel.
///
/// Lets callers drive the supervisor without sending real OS signals.
pub struct ChannelSignals {
    rx: mpsc::Receiver<SignalKind>,
}

impl ChannelSignals {
    /// Create a source and the sender that feeds it.
    pub fn new(buffer: usize) -> (mpsc::Sender<SignalKind>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self { rx })
    }
}

#[async_trait]
impl SignalSource for ChannelSignals {
    async fn recv(&mut self) -> Option<SignalKind> {
        self.rx.recv().await
    }
}
