//! RPC client with per-address connection pooling.
//!
//! # Responsibilities
//! - Dial the server lazily, one pooled connection per address
//! - Serialize calls on a connection (one in-flight request per socket)
//! - Bound connect and call latency with configured timeouts
//! - Release every socket on `close`, the Service Handle of the shutdown path
//!
//! # Design Decisions
//! - A failed exchange drops the pooled connection; the next call redials
//! - `close` is idempotent and makes later calls fail fast with `Closed`
//! - `close` never waits on an in-flight call; pending calls are woken with
//!   `Closed` and release their socket when they return

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex};
use tokio::time;

use crate::config::RpcConfig;
use crate::lifecycle::shutdown::Closable;
use crate::rpc::codec::{decode_response, encode_request, RpcRequest};
use crate::rpc::error::{RpcError, RpcResult};

/// An established connection to one server.
struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    line: String,
}

impl Connection {
    fn new(stream: TcpStream) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader: BufReader::new(reader),
            writer,
            line: String::new(),
        }
    }

    /// Write one frame and read one frame back.
    async fn exchange(&mut self, frame: &[u8]) -> RpcResult<String> {
        self.writer.write_all(frame).await?;
        self.writer.flush().await?;

        self.line.clear();
        if self.reader.read_line(&mut self.line).await? == 0 {
            return Err(RpcError::Disconnected);
        }
        Ok(std::mem::take(&mut self.line))
    }
}

/// JSON-over-TCP RPC client.
pub struct RpcClient {
    config: RpcConfig,
    pool: DashMap<SocketAddr, Arc<Mutex<Connection>>>,
    next_id: AtomicU64,
    closed: AtomicBool,
    closed_tx: watch::Sender<bool>,
}

impl RpcClient {
    /// Create a client. No connection is opened until the first call.
    pub fn new(config: RpcConfig) -> Self {
        Self {
            config,
            pool: DashMap::new(),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
            closed_tx: watch::channel(false).0,
        }
    }

    /// Invoke `service::method(params)` on the server at `addr`.
    pub async fn call<P, R>(
        &self,
        addr: SocketAddr,
        service: &str,
        method: &str,
        params: P,
    ) -> RpcResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        if self.is_closed() {
            return Err(RpcError::Closed);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let frame = encode_request(&RpcRequest {
            id,
            service: service.to_string(),
            method: method.to_string(),
            params: serde_json::to_value(params)?,
        })?;

        let mut closed_rx = self.closed_tx.subscribe();
        let conn = self.connection(addr).await?;
        let timeout = self.config.request_timeout();

        let exchange = async {
            let mut conn = conn.lock().await;
            match time::timeout(timeout, conn.exchange(&frame)).await {
                Ok(Ok(line)) => decode_response(&line).and_then(|res| res.into_result(id)),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(RpcError::Timeout {
                    target: format!("{service}::{method}"),
                    timeout,
                }),
            }
        };

        let outcome = tokio::select! {
            outcome = exchange => outcome,
            _ = closed_rx.wait_for(|closed| *closed) => Err(RpcError::Closed),
        };

        match outcome {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(e) => {
                if e.poisons_connection() || matches!(e, RpcError::Closed) {
                    self.discard(addr, &conn);
                }
                tracing::debug!(address = %addr, service, method, error = %e, "RPC call failed");
                Err(e)
            }
        }
    }

    /// Whether [`RpcClient::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of pooled connections.
    pub fn connection_count(&self) -> usize {
        self.pool.len()
    }

    /// Shut down every pooled connection and refuse further calls.
    ///
    /// Idle sockets are shut down here. A socket busy with a call is
    /// released once that call returns `Closed`.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.closed_tx.send_replace(true);

        let conns: Vec<(SocketAddr, Arc<Mutex<Connection>>)> = self
            .pool
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        self.pool.clear();

        let mut busy = 0;
        for (addr, conn) in &conns {
            let Ok(mut conn) = conn.try_lock() else {
                busy += 1;
                continue;
            };
            if let Err(e) = conn.writer.shutdown().await {
                tracing::warn!(address = %addr, error = %e, "Failed to shut down RPC connection");
            }
        }

        tracing::info!(connections = conns.len(), busy, "RPC client closed");
    }

    async fn connection(&self, addr: SocketAddr) -> RpcResult<Arc<Mutex<Connection>>> {
        if let Some(conn) = self.pool.get(&addr).map(|entry| Arc::clone(entry.value())) {
            return Ok(conn);
        }

        let timeout = self.config.connect_timeout();
        let stream = match time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(RpcError::Connect { addr, source }),
            Err(_) => return Err(RpcError::ConnectTimeout { addr, timeout }),
        };
        let _ = stream.set_nodelay(true);

        // close() may have drained the pool while we were dialing.
        if self.is_closed() {
            return Err(RpcError::Closed);
        }

        tracing::debug!(address = %addr, "RPC connection established");
        let conn = Arc::new(Mutex::new(Connection::new(stream)));
        let pooled = Arc::clone(self.pool.entry(addr).or_insert(conn).value());

        // close() may have drained the pool between the check above and the insert.
        if self.is_closed() {
            self.discard(addr, &pooled);
            return Err(RpcError::Closed);
        }
        Ok(pooled)
    }

    fn discard(&self, addr: SocketAddr, conn: &Arc<Mutex<Connection>>) {
        self.pool.remove_if(&addr, |_, pooled| Arc::ptr_eq(pooled, conn));
    }
}

#[async_trait]
impl Closable for RpcClient {
    async fn close(&self) {
        RpcClient::close(self).await;
    }
}
