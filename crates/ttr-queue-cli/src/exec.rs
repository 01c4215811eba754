//! Job handlers used by the `listen` and `run` commands.

use anyhow::Context;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};
use ttr_queue::{JobContext, MessageHandler};

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;

pub const MESSAGE_ID_ENV: &str = "TTR_QUEUE_MESSAGE_ID";
pub const ATTEMPT_ENV: &str = "TTR_QUEUE_ATTEMPT";
pub const TTR_ENV: &str = "TTR_QUEUE_TTR";

/// Runs an external program per job.
///
/// The payload is written to the program's stdin and the delivery details are
/// passed as environment variables. Exit status 0 marks the job as done; any
/// other outcome leaves it for redelivery.
#[derive(Debug, Clone)]
pub struct ExecHandler {
    program: String,
    args: Vec<String>,
}

impl ExecHandler {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from `program arg1 arg2 ...`; `None` when the command line is empty
    pub fn from_command_line(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

#[async_trait]
impl MessageHandler for ExecHandler {
    async fn handle(&self, payload: &str, context: &JobContext) -> anyhow::Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(MESSAGE_ID_ENV, context.message_id.as_str())
            .env(ATTEMPT_ENV, context.attempt.to_string())
            .env(TTR_ENV, context.ttr_seconds.to_string())
            .stdin(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to start '{}'", self.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(payload.as_bytes()).await {
                // Programs are free to ignore their input
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                result => result.context("failed to write payload to stdin")?,
            }
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("failed to wait for '{}'", self.program))?;

        debug!(
            program = %self.program,
            message_id = %context.message_id,
            status = %status,
            "Handler command finished"
        );

        if !status.success() {
            anyhow::bail!("'{}' exited with {}", self.program, status);
        }
        Ok(())
    }
}

/// Logs each payload and reports success
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHandler;

#[async_trait]
impl MessageHandler for LogHandler {
    async fn handle(&self, payload: &str, context: &JobContext) -> anyhow::Result<()> {
        info!(
            message_id = %context.message_id,
            attempt = context.attempt,
            ttr_seconds = context.ttr_seconds,
            payload,
            "Received job"
        );
        Ok(())
    }
}
