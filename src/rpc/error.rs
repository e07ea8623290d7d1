//! RPC error definitions.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during an RPC call.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The client has been closed; no further calls are accepted.
    #[error("RPC client is closed")]
    Closed,

    /// TCP connect failed.
    #[error("Connect to {addr} failed: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// TCP connect did not finish in time.
    #[error("Connect to {addr} timed out after {timeout:?}")]
    ConnectTimeout { addr: SocketAddr, timeout: Duration },

    /// The call did not complete in time.
    #[error("Call {target} timed out after {timeout:?}")]
    Timeout { target: String, timeout: Duration },

    /// Read or write on an established connection failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Request or response could not be (de)serialized.
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The peer closed the connection before replying.
    #[error("Connection closed by peer")]
    Disconnected,

    /// The reply does not belong to the request just sent.
    #[error("Response id {got} does not match request id {expected}")]
    IdMismatch { expected: u64, got: u64 },

    /// The server handled the call and returned an error.
    #[error("Remote error: {0}")]
    Remote(String),
}

impl RpcError {
    /// Whether the pooled connection must be discarded after this error.
    pub fn poisons_connection(&self) -> bool {
        matches!(
            self,
            RpcError::Timeout { .. }
                | RpcError::Io(_)
                | RpcError::Disconnected
                | RpcError::IdMismatch { .. }
        )
    }
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
