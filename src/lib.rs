//! Echo RPC client library.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──▶ config ──▶ lifecycle::startup
//!                                 │
//!                 ┌───────────────┼─────────────────┐
//!                 ▼               ▼                 ▼
//!          observability      rpc::client ◀──── rpc::demo
//!        (logging, info)          │
//!                 │               │ Closable
//!                 │ AppLog        ▼
//!                 └────────▶ lifecycle::shutdown::Supervisor ◀── lifecycle::signals
//!                                 │
//!                                 ▼
//!                           process exit (0 graceful / 1 forced)
//! ```

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod rpc;

pub use config::ClientConfig;
pub use lifecycle::{ShutdownOutcome, Supervisor};
pub use rpc::RpcClient;
