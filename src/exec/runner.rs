// src/exec/runner.rs

//! Subprocess execution with drained, prefixed output streams.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{PipelineError, Result};
use crate::exec::forward::{spawn_stderr_forwarder, spawn_stdout_forwarder};

/// What to do with the child's stdout.
#[derive(Debug, Clone)]
pub enum StdoutMode {
    /// Relay line-by-line to our stdout with the given prefix.
    Forward { prefix: String },
    /// Redirect raw bytes into a file (used to capture raster2pgsql's SQL).
    CaptureTo(PathBuf),
}

/// A fully-resolved command invocation.
///
/// Always a complete argv, never a shell string: the first element is the
/// executable, the rest are passed through verbatim.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub argv: Vec<String>,
    pub stdout: StdoutMode,
    /// Prefix for stderr lines relayed to our stderr.
    pub stderr_prefix: String,
}

impl CommandSpec {
    pub fn forwarding(argv: Vec<String>, stdout_prefix: &str, stderr_prefix: &str) -> Self {
        Self {
            argv,
            stdout: StdoutMode::Forward {
                prefix: stdout_prefix.to_string(),
            },
            stderr_prefix: stderr_prefix.to_string(),
        }
    }

    pub fn capturing(argv: Vec<String>, capture: PathBuf, stderr_prefix: &str) -> Self {
        Self {
            argv,
            stdout: StdoutMode::CaptureTo(capture),
            stderr_prefix: stderr_prefix.to_string(),
        }
    }

    /// The command line as displayed in logs and error messages.
    pub fn display(&self) -> String {
        self.argv.join(" ")
    }
}

/// Trait abstracting how external commands are executed.
///
/// Production code uses [`OsProcessRunner`]; tests can provide their own
/// implementation that doesn't spawn real processes and instead records the
/// specs it was given.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the command to completion.
    ///
    /// `Ok(())` means exit code 0. A non-zero exit code surfaces as
    /// [`PipelineError::ProcessExit`] carrying the command line and the code;
    /// output content is never inspected for success.
    async fn run(&self, spec: &CommandSpec) -> Result<()>;
}

/// Real process runner used in production.
#[derive(Debug, Clone, Default)]
pub struct OsProcessRunner;

#[async_trait]
impl ProcessRunner for OsProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<()> {
        let (program, args) = spec
            .argv
            .split_first()
            .ok_or_else(|| PipelineError::ConfigError("empty command".to_string()))?;

        // Echo the command line before running it, like a shell trace.
        println!("$ {}", spec.display());
        debug!(command = %spec.display(), "spawning subprocess");

        let mut cmd = Command::new(program);
        cmd.args(args).stderr(Stdio::piped()).kill_on_drop(true);

        match &spec.stdout {
            StdoutMode::Forward { .. } => {
                cmd.stdout(Stdio::piped());
            }
            StdoutMode::CaptureTo(path) => {
                // The capture file exists from this point on, even if the
                // child writes nothing or fails; the caller owns its cleanup.
                let file = std::fs::File::create(path)?;
                cmd.stdout(Stdio::from(file));
            }
        }

        let mut child = cmd.spawn()?;

        let stdout_task = match (&spec.stdout, child.stdout.take()) {
            (StdoutMode::Forward { prefix }, Some(stdout)) => {
                Some(spawn_stdout_forwarder(stdout, prefix.clone()))
            }
            _ => None,
        };
        let stderr_task = child
            .stderr
            .take()
            .map(|stderr| spawn_stderr_forwarder(stderr, spec.stderr_prefix.clone()));

        let status = child.wait().await?;

        // Join the forwarders so every buffered line is flushed before the
        // step is considered finished.
        if let Some(task) = stdout_task {
            let _ = task.await;
        }
        if let Some(task) = stderr_task {
            let _ = task.await;
        }

        let code = status.code().unwrap_or(-1);
        info!(command = %spec.display(), exit_code = code, "subprocess exited");

        if status.success() {
            Ok(())
        } else {
            Err(PipelineError::ProcessExit {
                command: spec.display(),
                code,
            })
        }
    }
}
