#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! High-level pipeline that regenerates the SDK's client packages by driving an
//! external OpenAPI generator, then prunes files the generator stopped producing.
//!
//! ## Module Organization
//!
//! - `runner` - Shell command execution, output capture and fail-fast exit handling
//! - `manifest` - Reading the file list a generator leaves in each output directory
//! - `reconcile` - Deleting files that dropped out of the manifest between runs
//! - `job` - One generator invocation, from manifest snapshot to pruning
//! - `orchestration` - Build step followed by every generation job, in order

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the generation pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An external command exited with a non-zero status.
    #[error("Command '{command}' returned non-zero exit status {exit_code}")]
    CommandFailed {
        /// The command text.
        command: String,
        /// Its exit code.
        exit_code: i32,
    },
    /// An external command exceeded its time limit and was killed.
    #[error("Command '{command}' timed out after {timeout_secs}s")]
    CommandTimedOut {
        /// The command text.
        command: String,
        /// The limit that was exceeded.
        timeout_secs: u64,
    },
    /// An external command could not be started.
    #[error("Failed to start '{command}': {source}")]
    Spawn {
        /// The command text.
        command: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Two manifests for different output directories were compared.
    #[error("Manifests describe different directories: {} and {}", .before.display(), .after.display())]
    ManifestMismatch {
        /// Directory of the earlier manifest.
        before: PathBuf,
        /// Directory of the later manifest.
        after: PathBuf,
    },
    /// I/O error while waiting on or reading from a command.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Generic message-based error.
    #[error("{0}")]
    Message(String),
}

impl PipelineError {
    /// Exit code of the failing command, when the error came from one.
    pub fn command_exit_code(&self) -> Option<i32> {
        match self {
            PipelineError::CommandFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}

// Module declarations
pub mod job;
pub mod manifest;
pub mod orchestration;
pub mod reconcile;
pub mod runner;

#[cfg(test)]
mod test_support;

// Re-export public API
pub use job::{GenerationJob, JobOutcome};
pub use manifest::read_manifest;
pub use orchestration::{Pipeline, PipelineReport};
pub use reconcile::{reconcile, ReconcileReport};
pub use runner::{CommandExecutor, ProcessRunner, ShellExecutor};
