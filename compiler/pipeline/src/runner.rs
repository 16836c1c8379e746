//! Shell command execution.
//!
//! [`ShellExecutor`] runs a [`CommandRequest`] through `sh -c` and captures its
//! output. [`ProcessRunner`] wraps any executor with the operator-visible logging
//! and the fail-fast rule: a non-zero exit becomes [`PipelineError::CommandFailed`].

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use tracing::{error, info, warn};
use types::{CommandRequest, CommandResult};
use wait_timeout::ChildExt;

use crate::{PipelineError, Result};

/// Executes a command and reports how it finished.
///
/// Implementations report non-zero exits as a normal [`CommandResult`]; only a
/// failure to run the command at all is an error.
pub trait CommandExecutor {
    /// Run `request` to completion.
    fn execute(&self, request: &CommandRequest) -> Result<CommandResult>;
}

/// Runs commands through `sh -c` in the request's working directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn execute(&self, request: &CommandRequest) -> Result<CommandResult> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&request.command)
            .current_dir(&request.working_dir)
            .envs(&request.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| PipelineError::Spawn { command: request.command.clone(), source })?;

        // Drain both pipes while waiting so a chatty child cannot block on a full pipe
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = match request.timeout {
            Some(limit) => match child.wait_timeout(limit)? {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(PipelineError::CommandTimedOut {
                        command: request.command.clone(),
                        timeout_secs: limit.as_secs(),
                    });
                }
            },
            None => child.wait()?,
        };

        Ok(CommandResult {
            exit_code: status.code().unwrap_or(1),
            stdout: join_reader(stdout)?,
            stderr: join_reader(stderr)?,
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<String>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    })
}

fn join_reader(handle: Option<JoinHandle<std::io::Result<String>>>) -> Result<String> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| PipelineError::Message("output reader thread panicked".to_string()))?
            .map_err(PipelineError::Io),
        None => Ok(String::new()),
    }
}

/// Logs and runs commands, stopping at the first non-zero exit.
#[derive(Debug, Default)]
pub struct ProcessRunner<E = ShellExecutor> {
    executor: E,
}

impl<E: CommandExecutor> ProcessRunner<E> {
    /// Wrap `executor`.
    pub fn new(executor: E) -> Self { Self { executor } }

    /// The wrapped executor.
    pub fn executor(&self) -> &E { &self.executor }

    /// Run `request`, logging the command line and any captured output.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::CommandFailed`] when the command exits non-zero, after
    /// its stdout and stderr have been logged, and propagates executor errors unchanged.
    pub fn run(&self, request: &CommandRequest) -> Result<CommandResult> {
        info!(cwd = %request.working_dir.display(), "{}", request.command);

        let result = self.executor.execute(request)?;

        if !result.stdout.is_empty() {
            info!("STDOUT:\n\n{}", result.stdout.trim_end());
        }
        if !result.stderr.is_empty() {
            warn!("STDERR:\n\n{}\n", result.stderr.trim_end());
        }

        if !result.success() {
            error!(
                "Command '{}' returned non-zero exit status {}.",
                request.command, result.exit_code
            );
            return Err(PipelineError::CommandFailed {
                command: request.command.clone(),
                exit_code: result.exit_code,
            });
        }

        Ok(result)
    }
}
