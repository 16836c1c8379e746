//! Pipeline orchestration for the main entry point.
//!
//! This module sequences the whole run: build the generator artifact once, then
//! run one generation job per client specification document in declared order,
//! then the webhook job. Every step is a hard gate; the first error is returned
//! and nothing after it runs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::Config;
use tracing::info;
use types::{CommandRequest, JobSpec, SpecDocument};

use crate::job::{GenerationJob, JobOutcome};
use crate::runner::{CommandExecutor, ProcessRunner, ShellExecutor};
use crate::Result;

/// Outcome of a full pipeline run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Whether the generator artifact was built.
    pub built: bool,
    /// Completed jobs, in run order.
    pub jobs: Vec<JobOutcome>,
}

impl PipelineReport {
    /// Total number of stale files removed across all jobs.
    pub fn deleted_count(&self) -> usize { self.jobs.iter().map(|j| j.deleted.len()).sum() }
}

/// The top-level generation sequence for one project tree.
#[derive(Debug)]
pub struct Pipeline<E = ShellExecutor> {
    config: Config,
    project_root: PathBuf,
    runner: ProcessRunner<E>,
}

impl Pipeline<ShellExecutor> {
    /// Create a pipeline that runs real shell commands.
    pub fn new(config: Config, project_root: impl Into<PathBuf>) -> Self {
        Self::with_executor(config, project_root, ShellExecutor)
    }
}

impl<E: CommandExecutor> Pipeline<E> {
    /// Create a pipeline that runs commands through `executor`.
    pub fn with_executor(config: Config, project_root: impl Into<PathBuf>, executor: E) -> Self {
        Self { config, project_root: project_root.into(), runner: ProcessRunner::new(executor) }
    }

    /// The process runner used for every command.
    pub fn runner(&self) -> &ProcessRunner<E> { &self.runner }

    /// The project root all configured paths are resolved against.
    pub fn project_root(&self) -> &Path { &self.project_root }

    fn timeout(&self) -> Option<Duration> {
        self.config.generator.timeout_secs.map(Duration::from_secs)
    }

    /// The generator build command, run inside the generator workspace.
    pub fn build_request(&self) -> CommandRequest {
        CommandRequest::new(
            self.config.build.command.clone(),
            self.project_root.join(&self.config.layout.generator_dir),
        )
        .with_timeout(self.timeout())
    }

    /// Job parameters for a plain client document.
    pub fn client_job(&self, document: &SpecDocument) -> JobSpec {
        let generator = &self.config.generator;
        let layout = &self.config.layout;
        JobSpec {
            generator_name: generator.name.clone(),
            engine: generator.engine.clone(),
            template_dir: None,
            model_package: generator.model_package.clone(),
            api_package: generator.api_package.clone(),
            package_name: document.name().to_string(),
            output_dir: document.output_dir(&layout.output_root),
            input_spec: document.input_path(&layout.spec_dir),
            generate_docs: true,
            generate_tests: true,
            post_process: Some(self.config.post_process_hook()),
            additional_properties: Default::default(),
        }
    }

    /// Job parameters for the webhook document.
    pub fn webhook_job(&self) -> JobSpec {
        let webhook = &self.config.webhook;
        let layout = &self.config.layout;
        JobSpec {
            template_dir: webhook.template_dir.clone(),
            package_name: webhook.package_name.clone(),
            output_dir: layout.output_root.join(&webhook.package_name),
            input_spec: webhook.spec.input_path(&layout.spec_dir),
            generate_docs: webhook.generate_docs,
            generate_tests: webhook.generate_tests,
            additional_properties: webhook.additional_properties.clone(),
            ..self.client_job(&webhook.spec)
        }
    }

    /// Every job in run order: clients as declared, then the webhook.
    pub fn jobs(&self) -> Vec<JobSpec> {
        let mut jobs: Vec<JobSpec> =
            self.config.clients.iter().map(|document| self.client_job(document)).collect();
        jobs.push(self.webhook_job());
        jobs
    }

    /// Run the full pipeline.
    ///
    /// # Returns
    ///
    /// Returns a [`PipelineReport`] when every step succeeds, or the first error;
    /// steps after a failure are never attempted.
    pub fn run(&self) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();

        if self.config.build.enabled {
            info!("Building generator in {}", self.config.layout.generator_dir.display());
            self.runner.run(&self.build_request())?;
            report.built = true;
        } else {
            info!("Generator build disabled; using the existing artifact");
        }

        let tool = self.config.generator_tool();
        for spec in self.jobs() {
            info!("Generating {} from {}", spec.package_name, spec.input_spec.display());
            let job = GenerationJob::new(tool.clone(), spec).with_timeout(self.timeout());
            report.jobs.push(job.run(&self.runner, &self.project_root)?);
        }

        Ok(report)
    }
}
