//! Pruning files that dropped out of the manifest.
//!
//! Deletions go through the [`ProcessRunner`] like every other command, so a
//! failing delete aborts the pipeline the same way a failing generator does.

use tracing::{info, warn};
use types::{CommandRequest, Manifest};

use crate::runner::{CommandExecutor, ProcessRunner};
use crate::{PipelineError, Result};

/// Entries removed and entries refused by a reconciliation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Stale entries that were deleted.
    pub deleted: Vec<String>,
    /// Stale entries left alone because they resolve outside the output directory.
    pub skipped: Vec<String>,
}

/// Delete every entry of `before` that is absent from `after`.
///
/// Each deletion is a recursive, forced `rm` issued from the manifests' output
/// directory, so entries resolve against the same root the generator wrote them
/// from. Entries that are absolute, climb out with `..`, or pass through a
/// symlink leading outside the directory are never deleted.
///
/// # Errors
///
/// Returns [`PipelineError::ManifestMismatch`] when the manifests belong to different
/// directories, and the runner's error when a deletion fails.
pub fn reconcile<E: CommandExecutor>(
    runner: &ProcessRunner<E>,
    before: &Manifest,
    after: &Manifest,
) -> Result<ReconcileReport> {
    if before.output_dir() != after.output_dir() {
        return Err(PipelineError::ManifestMismatch {
            before: before.output_dir().to_path_buf(),
            after: after.output_dir().to_path_buf(),
        });
    }

    let mut report = ReconcileReport::default();
    for entry in before.missing_from(after) {
        if entry.trim().is_empty() {
            continue;
        }
        let contained = path::contained_relative_path(entry)
            .filter(|relative| path::resolves_within(before.output_dir(), relative));
        let Some(relative) = contained else {
            warn!(
                "Refusing to delete '{}': not inside {}",
                entry,
                before.output_dir().display()
            );
            report.skipped.push(entry.to_string());
            continue;
        };

        info!("Removing stale file {}", entry);
        let command = format!("rm -rf -- {}", path::shell_quote(&relative.to_string_lossy()));
        runner.run(&CommandRequest::new(command, before.output_dir()))?;
        report.deleted.push(entry.to_string());
    }

    Ok(report)
}
