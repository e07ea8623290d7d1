//! RPC subsystem.
//!
//! # Data Flow
//! ```text
//! caller (demo.rs)
//!     → client.rs (pick pooled connection, assign request id)
//!     → codec.rs (JSON frame, one per line)
//!     → TCP → echo server → reply frame
//!     → codec.rs (decode, match id, map remote error)
//!     → typed result
//! ```
//!
//! # Design Decisions
//! - JSON is the only codec
//! - The client is the Service Handle closed by the shutdown supervisor

pub mod client;
pub mod codec;
pub mod demo;
pub mod error;

pub use client::RpcClient;
pub use error::{RpcError, RpcResult};
