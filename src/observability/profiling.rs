//! Profiling listener.
//!
//! # Responsibilities
//! - Serve a process-info endpoint at the conventional `/debug/pprof/` path
//! - Run independently of the rest of startup (fire-and-forget)
//!
//! # Design Decisions
//! - The endpoint reports name, version, pid and uptime as JSON; it does not
//!   produce CPU or heap profiles
//! - Bind or serve failures are logged, never fatal
//! - No shutdown hook: the listener dies with the process

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

/// Route of the process-info endpoint.
pub const PROCESS_INFO_PATH: &str = "/debug/pprof/";

#[derive(Debug, Clone)]
struct ProfilingState {
    name: Arc<str>,
    started: Instant,
}

/// Body of the process-info endpoint.
#[derive(Debug, Serialize)]
pub struct ProcessInfo {
    pub name: String,
    pub version: &'static str,
    pub pid: u32,
    pub uptime_secs: u64,
}

async fn get_info(State(state): State<ProfilingState>) -> Json<ProcessInfo> {
    Json(ProcessInfo {
        name: state.name.to_string(),
        version: env!("CARGO_PKG_VERSION"),
        pid: std::process::id(),
        uptime_secs: state.started.elapsed().as_secs(),
    })
}

/// Build the profiling router.
pub fn router(app_name: &str) -> Router {
    let state = ProfilingState {
        name: Arc::from(app_name),
        started: Instant::now(),
    };

    Router::new()
        .route(PROCESS_INFO_PATH, get(get_info))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the profiling router on an already-bound listener.
pub async fn serve(listener: TcpListener, app_name: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, router(app_name)).await
}

/// Start the profiling listener in the background.
///
/// Returns immediately; failures are logged by the spawned task.
pub fn spawn(address: String, app_name: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        let addr: SocketAddr = match address.parse() {
            Ok(addr) => addr,
            Err(e) => {
                tracing::error!(address = %address, error = %e, "Invalid profiling address");
                return;
            }
        };

        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(address = %addr, error = %e, "Failed to bind profiling listener");
                return;
            }
        };

        tracing::info!(address = %addr, path = PROCESS_INFO_PATH, "App Profiling startup");

        if let Err(e) = serve(listener, &app_name).await {
            tracing::error!(address = %addr, error = %e, "Profiling listener stopped");
        }
    })
}
