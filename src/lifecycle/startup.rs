//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the config path (CLI flag or `APP_CONF_FILE`)
//! - Load and validate configuration
//! - Initialize subsystems in dependency order
//! - Start background tasks (profiling, demo traffic)
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, before the supervisor is armed
//! - Profiling is fire-and-forget; its failures are logged only
//! - The supervisor is built last, from the collaborators created here

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing_subscriber::util::TryInitError;

use crate::config::{load_config, ClientConfig, ConfigError, CONFIG_FILE_ENV};
use crate::lifecycle::shutdown::{ExitHandler, Supervisor};
use crate::observability::{logging::AppLog, profiling};
use crate::rpc::{demo, RpcClient};

/// Exit code for failures before the supervisor is armed.
pub const STARTUP_FAILURE_EXIT_CODE: i32 = 2;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "echo-client")]
#[command(about = "Echo RPC client with fail-fast shutdown", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = CONFIG_FILE_ENV)]
    pub config: Option<PathBuf>,
}

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] TryInitError),

    #[error("Invalid RPC server address: {0}")]
    Address(#[from] AddrParseError),

    #[error("Failed to register signal handlers: {0}")]
    Signals(#[from] std::io::Error),
}

/// Load configuration named by the command line.
pub fn load(cli: &Cli) -> Result<ClientConfig, StartupError> {
    let path = cli.config.as_ref().ok_or(ConfigError::MissingPath)?;
    Ok(load_config(path)?)
}

/// Subsystems started before the supervisor takes over.
pub struct Services {
    pub config: ClientConfig,
    pub client: Arc<RpcClient>,
    pub profiling: Option<JoinHandle<()>>,
    pub demo: JoinHandle<()>,
}

/// Start subsystems in order: profiling, RPC client, demo traffic.
///
/// Must be called from within a Tokio runtime.
pub fn start(config: ClientConfig) -> Result<Services, StartupError> {
    let server: SocketAddr = config.rpc.server_address.parse()?;

    let profiling = config
        .profiling
        .enabled
        .then(|| profiling::spawn(config.profiling.address(), config.app.name.clone()));

    let client = Arc::new(RpcClient::new(config.rpc.clone()));

    tracing::info!(
        "{} starts successfully! its version={}",
        config.app.name,
        env!("CARGO_PKG_VERSION")
    );

    let demo = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            // Failures are logged inside; they never affect shutdown.
            let _ = demo::run(&client, server).await;
        })
    };

    Ok(Services {
        config,
        client,
        profiling,
        demo,
    })
}

impl Services {
    /// Build the shutdown supervisor around the started RPC client.
    pub fn supervisor(&self, log: Arc<dyn AppLog>, exit: Arc<dyn ExitHandler>) -> Supervisor {
        Supervisor::new(
            self.client.clone(),
            log,
            exit,
            self.config.app.fail_fast_timeout(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_path() {
        let cli = Cli { config: None };
        let err = load(&cli).unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::MissingPath)));
    }

    #[test]
    fn test_cli_flag() {
        let cli = Cli::try_parse_from(["echo-client", "--config", "conf/client.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("conf/client.toml")));
    }

    #[test]
    fn test_cli_reads_config_env() {
        use clap::CommandFactory;

        let command = Cli::command();
        let arg = command
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .unwrap();
        assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new(CONFIG_FILE_ENV)));
    }

    #[tokio::test]
    async fn test_start_without_profiling() {
        let mut config = ClientConfig::default();
        config.profiling.enabled = false;
        config.rpc.connect_timeout_ms = 100;

        let services = start(config).unwrap();
        assert!(services.profiling.is_none());
        assert!(!services.client.is_closed());
        services.demo.abort();
    }
}
