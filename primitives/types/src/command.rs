//! Commands issued through the process runner.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A shell command and the context it runs in.
///
/// Each request carries its own working directory, so no stage of the
/// pipeline depends on the process-wide current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Command text, interpreted by the shell.
    pub command: String,
    /// Directory the command runs in.
    pub working_dir: PathBuf,
    /// Variables set on top of the inherited environment.
    pub env: BTreeMap<String, String>,
    /// Upper bound on the command's run time.
    pub timeout: Option<Duration>,
}

impl CommandRequest {
    /// Create a request with no environment overrides and no timeout.
    pub fn new(command: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            working_dir: working_dir.into(),
            env: BTreeMap::new(),
            timeout: None,
        }
    }

    /// Add an environment override.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set an optional timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Display for CommandRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.command) }
}

/// Exit code and captured output of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    /// Process exit code.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandResult {
    /// Whether the command exited with code zero.
    pub fn success(&self) -> bool { self.exit_code == 0 }
}
