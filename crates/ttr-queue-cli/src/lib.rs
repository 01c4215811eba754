//! # TTR Queue CLI
//!
//! Command-line interface for ttr-queue workers and producers.
//!
//! This module provides CLI commands for:
//! - Running a worker continuously (`listen`) or until the queue drains (`run`)
//! - Pushing jobs and purging the queue
//! - Validating and printing configuration
//! - Generating shell completions

use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ttr_queue::{
    Consumer, Producer, PushRequest, QueueClient, QueueClientFactory, ShutdownFlag, WorkerError,
    MAX_WAIT_SECONDS,
};

pub mod config;
pub mod exec;

pub use config::{load_configuration, CliConfig, ConfigError, ConfigFormat, LogFormat};
pub use exec::{ExecHandler, LogHandler};

// ============================================================================
// CLI Structure
// ============================================================================

/// ttr-queue - workers for visibility-timeout queues
#[derive(Parser, Debug)]
#[command(name = "ttr-queue")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Process and enqueue jobs on a visibility-timeout queue")]
#[command(
    long_about = "Each job carries its own time-to-run. Workers hide a job for that long while \
                  processing it and delete it on success; failed jobs reappear afterwards."
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "TTR_QUEUE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level or filter directive, overrides the configuration
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process jobs until interrupted
    Listen(WorkerArgs),

    /// Process jobs until the queue is empty
    Run(WorkerArgs),

    /// Enqueue a job
    Push {
        /// Job payload
        payload: String,

        /// Seconds a worker may spend on the job before it is redelivered
        #[arg(long)]
        ttr: Option<u32>,

        /// Seconds before the job becomes visible
        #[arg(short, long, default_value = "0")]
        delay: u32,

        /// Not supported by the backend; always rejected
        #[arg(short, long)]
        priority: Option<u32>,
    },

    /// Remove all jobs from the queue
    Clear,

    /// Show the status of a job (not supported by the backend)
    Status {
        /// Message ID returned by push
        message_id: String,
    },

    /// Validate configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,

        /// Output format for configuration
        #[arg(short = 'f', long, default_value = "yaml")]
        format: ConfigFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options shared by the worker commands
#[derive(Args, Debug, Clone, Default)]
pub struct WorkerArgs {
    /// Long-poll wait per receive in seconds (0-20)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=MAX_WAIT_SECONDS as i64))]
    pub timeout: Option<u32>,

    /// Program (and arguments) run per job; must come last
    #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "PROGRAM")]
    pub exec: Vec<String>,
}

// ============================================================================
// CLI Error Types
// ============================================================================

/// CLI-specific errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Logging setup failed: {message}")]
    Logging { message: String },

    #[error(transparent)]
    Worker(#[from] WorkerError),

    #[error("{failed} job(s) failed")]
    JobsFailed { failed: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Logging { .. } => 1,
            Self::Worker(WorkerError::UnsupportedFeature { .. }) => 3,
            Self::Worker(_) => 2,
            Self::JobsFailed { .. } => 4,
            Self::Io(_) => 5,
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

/// Main CLI entry point
pub async fn run_cli() -> Result<(), CliError> {
    execute(Cli::parse()).await
}

/// Execute a parsed command line
pub async fn execute(cli: Cli) -> Result<(), CliError> {
    // Completions need neither configuration nor logging
    if let Commands::Completions { shell } = cli.command {
        return execute_completions_command(shell, &mut std::io::stdout());
    }

    let config = load_configuration(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        config.logging.format
    };
    initialize_logging(level, format)?;

    match cli.command {
        Commands::Listen(args) => execute_worker_command(&config, args, true).await,
        Commands::Run(args) => execute_worker_command(&config, args, false).await,
        Commands::Push {
            payload,
            ttr,
            delay,
            priority,
        } => execute_push_command(&config, payload, ttr, delay, priority).await,
        Commands::Clear => execute_clear_command(&config).await,
        Commands::Status { message_id } => execute_status_command(&config, &message_id).await,
        Commands::Config { show, format } => execute_config_command(&config, show, format),
        Commands::Completions { .. } => Ok(()),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// Initialize logging; `RUST_LOG` takes precedence over `level`
fn initialize_logging(level: &str, format: LogFormat) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| CliError::Logging {
            message: format!("invalid log level '{}': {}", level, e),
        })?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| CliError::Logging {
        message: e.to_string(),
    })
}

async fn create_client(config: &CliConfig) -> Result<Arc<dyn QueueClient>, CliError> {
    QueueClientFactory::create_client(&config.queue)
        .await
        .map_err(|e| CliError::Worker(e.into()))
}

/// Execute listen/run
async fn execute_worker_command(
    config: &CliConfig,
    args: WorkerArgs,
    repeat: bool,
) -> Result<(), CliError> {
    let timeout = args.timeout.unwrap_or(config.worker.wait_seconds);
    let client = create_client(config).await?;

    let consumer = match ExecHandler::from_command_line(&args.exec) {
        Some(handler) => Consumer::new(client, handler),
        None => Consumer::new(client, LogHandler),
    };

    let shutdown = ShutdownFlag::new();
    let flag = shutdown.clone();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("Finishing the current job, then stopping");
        flag.request_shutdown();
    });

    info!(
        queue = %config.queue.queue_name,
        repeat,
        timeout,
        exec = ?args.exec,
        "Starting worker"
    );

    let summary = consumer
        .with_continuation(shutdown)
        .run(repeat, timeout)
        .await?;

    if !repeat && summary.failed > 0 {
        return Err(CliError::JobsFailed {
            failed: summary.failed,
        });
    }
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C)"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

/// Execute push command
async fn execute_push_command(
    config: &CliConfig,
    payload: String,
    ttr: Option<u32>,
    delay: u32,
    priority: Option<u32>,
) -> Result<(), CliError> {
    let request = PushRequest {
        payload,
        ttr_seconds: ttr.unwrap_or(config.worker.default_ttr_seconds),
        delay_seconds: delay,
        priority,
    };

    // Reject before connecting to the queue
    if request.priority.is_some_and(|p| p != 0) {
        return Err(WorkerError::unsupported("priority").into());
    }

    let producer = Producer::new(create_client(config).await?);
    let message_id = producer.push(request).await?;

    println!("{}", message_id);
    Ok(())
}

/// Execute clear command
async fn execute_clear_command(config: &CliConfig) -> Result<(), CliError> {
    let producer = Producer::new(create_client(config).await?);
    producer.clear().await?;
    Ok(())
}

/// Execute status command
async fn execute_status_command(config: &CliConfig, message_id: &str) -> Result<(), CliError> {
    let producer = Producer::new(create_client(config).await?);

    producer.status(message_id).await?;
    Ok(())
}

/// Execute config command
fn execute_config_command(
    config: &CliConfig,
    show: bool,
    format: ConfigFormat,
) -> Result<(), CliError> {
    if show {
        println!("{}", config::render_configuration(config, format)?);
    } else {
        println!("Configuration is valid");
    }
    Ok(())
}

/// Execute completions command
fn execute_completions_command(
    shell: clap_complete::Shell,
    out: &mut dyn std::io::Write,
) -> Result<(), CliError> {
    clap_complete::generate(shell, &mut Cli::command(), "ttr-queue", out);
    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
