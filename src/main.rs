use std::sync::Arc;

use clap::Parser;

use echo_client::lifecycle::startup::{self, Cli, StartupError, STARTUP_FAILURE_EXIT_CODE};
use echo_client::lifecycle::{OsSignals, ProcessExit, ShutdownOutcome};
use echo_client::observability::{logging, TracingLog};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("echo-client: {e}");
            std::process::exit(STARTUP_FAILURE_EXIT_CODE);
        }
    }
}

async fn run(cli: Cli) -> Result<ShutdownOutcome, StartupError> {
    let config = startup::load(&cli)?;

    logging::init(&config.observability)?;
    tracing::info!(
        app = %config.app.name,
        fail_fast_timeout_ms = config.app.fail_fast_timeout_ms,
        rpc_server = %config.rpc.server_address,
        profiling = config.profiling.enabled,
        "Configuration loaded"
    );

    let signals = OsSignals::register()?;
    let services = startup::start(config)?;

    let supervisor = services.supervisor(Arc::new(TracingLog::new()), Arc::new(ProcessExit));
    Ok(supervisor.run(signals).await)
}
