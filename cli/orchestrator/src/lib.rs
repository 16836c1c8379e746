#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Collection of utilities for the linegen command line.

use std::path::PathBuf;

use clap::Parser;
use config::Config;
use pipeline::{Pipeline, PipelineReport};
use thiserror::Error;
use tracing::info;

/// Errors that can occur during a linegen run.
#[derive(Debug, Error)]
pub enum CliError {
    /// The project root could not be located.
    #[error(transparent)]
    Path(#[from] path::PathError),
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// Logging could not be set up.
    #[error(transparent)]
    Logging(#[from] logging::LoggingError),
    /// A pipeline step failed.
    #[error(transparent)]
    Pipeline(#[from] pipeline::PipelineError),
}

/// Result type alias for linegen runs.
pub type Result<T> = std::result::Result<T, CliError>;

/// Command-line interface. With no flags, runs the full pipeline for the
/// project containing the current directory.
#[derive(Parser, Debug, Default)]
#[command(
    name = "linegen",
    about = "Regenerate the LINE bot SDK clients and prune files the generator no longer emits",
    version
)]
pub struct Cli {
    /// Pipeline configuration file [default: <project root>/linegen.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Project root [default: nearest ancestor with linegen.toml, or generator/ and line-openapi/]
    #[arg(long)]
    pub project_root: Option<PathBuf>,
    /// Log level or filter directives, overriding the configuration
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// The project root: the flag if given, otherwise discovered from the current directory.
    pub fn resolve_project_root(&self) -> Result<PathBuf> {
        match &self.project_root {
            Some(root) => Ok(root.clone()),
            None => Ok(path::find_project_root()?),
        }
    }

    /// The configuration: the flag's file if given, otherwise the project's.
    pub fn load_config(&self, project_root: &std::path::Path) -> Result<Config> {
        let config = match &self.config {
            Some(file) => Config::from_file(file)?,
            None => Config::load_for_project(project_root)?,
        };
        Ok(config)
    }
}

/// Resolve the project, install logging, and run the pipeline.
///
/// Installs the global log subscriber, so it can only be called once per process.
pub fn run(cli: &Cli) -> Result<PipelineReport> {
    let project_root = cli.resolve_project_root()?;
    let config = cli.load_config(&project_root)?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    logging::init(level, config.logging.json)?;
    info!("Project root: {}", project_root.display());

    let report = Pipeline::new(config, &project_root).run()?;

    for job in &report.jobs {
        info!(
            "{}: {} files in {}, {} removed, {} refused",
            job.package_name,
            job.generated,
            job.output_dir.display(),
            job.deleted.len(),
            job.skipped.len()
        );
    }
    info!("Generation completed successfully.");
    Ok(report)
}
