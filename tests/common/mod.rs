//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use echo_client::lifecycle::{Closable, ExitHandler};
use echo_client::observability::AppLog;
use echo_client::rpc::codec::{RpcRequest, RpcResponse};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::time::Instant;

/// Marker pushed by [`RecordingLog`] when closed.
pub const CLOSED: &str = "<closed>";

/// Logger that records every line in order.
#[derive(Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    closes: AtomicUsize,
}

impl RecordingLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Lines logged at error level, in order.
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn contains(&self, line: &str) -> bool {
        self.lines().iter().any(|l| l == line)
    }

    fn push(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

impl AppLog for RecordingLog {
    fn info(&self, message: &str) {
        self.push(message);
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
        self.push(message);
    }

    fn exit(&self, message: &str) {
        self.push(message);
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.push(CLOSED);
    }
}

/// Exit handler that records codes instead of exiting.
pub struct RecordingExit {
    started: Instant,
    calls: Mutex<Vec<(i32, Duration)>>,
}

impl RecordingExit {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(code, elapsed since creation)` per exit call.
    pub fn calls(&self) -> Vec<(i32, Duration)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ExitHandler for RecordingExit {
    fn exit(&self, code: i32) {
        let elapsed = self.started.elapsed();
        self.calls.lock().unwrap().push((code, elapsed));
    }
}

/// Service whose close takes a fixed time on the Tokio clock.
pub struct SlowService {
    delay: Duration,
    closed: AtomicUsize,
}

impl SlowService {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            closed: AtomicUsize::new(0),
        }
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Closable for SlowService {
    async fn close(&self) {
        tokio::time::sleep(self.delay).await;
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Service whose close blocks the worker thread.
pub struct BlockingService {
    delay: Duration,
}

impl BlockingService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Closable for BlockingService {
    async fn close(&self) {
        std::thread::sleep(self.delay);
    }
}

fn handle(request: &RpcRequest) -> RpcResponse {
    let mut response = RpcResponse {
        id: request.id,
        result: None,
        error: None,
    };
    match request.method.as_str() {
        "Test" => {
            let field = |name: &str| request.params[name].as_str().unwrap_or_default().to_string();
            response.result = Some(json!(format!("{}-{}-{}", field("A"), field("B"), field("C"))));
        }
        "Add" => {
            response.result = Some(json!(request.params.as_i64().unwrap_or(0) + 1));
        }
        "Err" => {
            response.error = Some("intentional error".to_string());
        }
        "Sleep" => {
            response.result = Some(Value::Null);
        }
        "Echo" => {
            response.result = Some(request.params.clone());
        }
        "BadId" => {
            response.id = request.id + 1;
            response.result = Some(Value::Null);
        }
        other => {
            response.error = Some(format!("unknown method {other}"));
        }
    }
    response
}

/// Start a mock echo server on an ephemeral port.
///
/// `Sleep` calls delay the reply by `params` milliseconds.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let (reader, mut writer) = socket.into_split();
                let mut lines = BufReader::new(reader).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    let request: RpcRequest = match serde_json::from_str(&line) {
                        Ok(r) => r,
                        Err(_) => break,
                    };
                    if request.method == "Sleep" {
                        let ms = request.params.as_u64().unwrap_or(0);
                        tokio::time::sleep(Duration::from_millis(ms)).await;
                    }
                    let mut frame = serde_json::to_vec(&handle(&request)).unwrap();
                    frame.push(b'\n');
                    if writer.write_all(&frame).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    addr
}
