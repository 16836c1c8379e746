//! A single generator invocation.
//!
//! A job snapshots the output directory's manifest, runs the generator, snapshots
//! the manifest again and prunes whatever the generator no longer produces. Client
//! and webhook jobs share this code path and differ only in their [`JobSpec`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;
use types::{CommandRequest, GeneratorTool, JobSpec};

use crate::manifest::read_manifest;
use crate::reconcile::reconcile;
use crate::runner::{CommandExecutor, ProcessRunner};
use crate::Result;

/// Separator placed between command line arguments, one flag per line.
const ARG_SEPARATOR: &str = " \\\n    ";

/// Result of a completed generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    /// Package that was generated.
    pub package_name: String,
    /// Output directory, relative to the project root.
    pub output_dir: PathBuf,
    /// Number of entries in the new manifest.
    pub generated: usize,
    /// Stale entries that were deleted.
    pub deleted: Vec<String>,
    /// Stale entries refused because they point outside the output directory.
    pub skipped: Vec<String>,
}

/// One generator invocation and the manifest bookkeeping around it.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    tool: GeneratorTool,
    spec: JobSpec,
    timeout: Option<Duration>,
}

impl GenerationJob {
    /// Create a job that launches `tool` with the parameters in `spec`.
    pub fn new(tool: GeneratorTool, spec: JobSpec) -> Self { Self { tool, spec, timeout: None } }

    /// Bound the generator's run time.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The job parameters.
    pub fn spec(&self) -> &JobSpec { &self.spec }

    /// The generator command line, one flag per line.
    pub fn command_line(&self) -> String {
        let spec = &self.spec;
        let quote = path::shell_quote;
        let mut args = vec![
            quote(&self.tool.program),
            format!("-cp {}", quote(&self.tool.classpath.join(":"))),
            quote(&self.tool.main_class),
            "generate".to_string(),
        ];

        let global = spec.global_properties();
        if !global.is_empty() {
            let joined: Vec<String> = global.iter().map(|(k, v)| format!("{k}={v}")).collect();
            args.push(format!("--global-property {}", quote(&joined.join(","))));
        }
        if let Some(template_dir) = &spec.template_dir {
            args.push(format!("--template-dir {}", quote(&template_dir.to_string_lossy())));
        }
        if spec.post_process_enabled() {
            args.push("--enable-post-process-file".to_string());
        }
        if !spec.additional_properties.is_empty() {
            let joined: Vec<String> =
                spec.additional_properties.iter().map(|(k, v)| format!("{k}={v}")).collect();
            args.push(format!("--additional-properties {}", quote(&joined.join(","))));
        }

        args.push(format!("-e {}", quote(&spec.engine)));
        args.push(format!("--model-package {}", quote(&spec.model_package)));
        args.push(format!("--api-package {}", quote(&spec.api_package)));
        args.push(format!("--package-name {}", quote(&spec.package_name)));
        args.push(format!("-g {}", quote(&spec.generator_name)));
        args.push(format!("-o {}", quote(&spec.output_dir.to_string_lossy())));
        args.push(format!("-i {}", quote(&spec.input_spec.to_string_lossy())));

        args.join(ARG_SEPARATOR)
    }

    /// The generator request, run from `project_root`.
    ///
    /// Jobs with post-processing enabled always carry the hook variable.
    pub fn request(&self, project_root: &Path) -> CommandRequest {
        let mut request =
            CommandRequest::new(self.command_line(), project_root).with_timeout(self.timeout);
        if let Some(hook) = &self.spec.post_process {
            request = request.with_env(&hook.env_var, &hook.script);
        }
        request
    }

    /// Run the job against the tree rooted at `project_root`.
    ///
    /// # Errors
    ///
    /// A failed generator run returns before the new manifest is read, leaving the
    /// output directory unpruned. Deletion failures are returned as well.
    pub fn run<E: CommandExecutor>(
        &self,
        runner: &ProcessRunner<E>,
        project_root: &Path,
    ) -> Result<JobOutcome> {
        let output_dir = project_root.join(&self.spec.output_dir);

        let before = read_manifest(&output_dir);
        runner.run(&self.request(project_root))?;
        let after = read_manifest(&output_dir);

        let report = reconcile(runner, &before, &after)?;
        info!(
            "Generated {} ({} files, {} removed)",
            self.spec.package_name,
            after.entries().len(),
            report.deleted.len()
        );

        Ok(JobOutcome {
            package_name: self.spec.package_name.clone(),
            output_dir: self.spec.output_dir.clone(),
            generated: after.entries().len(),
            deleted: report.deleted,
            skipped: report.skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use types::{CommandResult, PostProcessHook};

    use super::*;
    use crate::test_support::{flag_value, write_manifest, RecordingExecutor};
    use crate::PipelineError;

    fn tool() -> GeneratorTool {
        GeneratorTool {
            program: "java".to_string(),
            classpath: vec!["./tools/cli.jar".to_string(), "./generator/target/gen.jar".to_string()],
            main_class: "org.openapitools.codegen.OpenAPIGenerator".to_string(),
        }
    }

    fn client_spec() -> JobSpec {
        JobSpec {
            generator_name: "line-bot-sdk-go-generator".to_string(),
            engine: "pebble".to_string(),
            template_dir: None,
            model_package: "model".to_string(),
            api_package: "api".to_string(),
            package_name: "shop".to_string(),
            output_dir: PathBuf::from("linebot/shop"),
            input_spec: PathBuf::from("line-openapi/shop.yml"),
            generate_docs: true,
            generate_tests: true,
            post_process: Some(PostProcessHook {
                env_var: "GO_POST_PROCESS_FILE".to_string(),
                script: "./postprocess-file.sh".to_string(),
            }),
            additional_properties: BTreeMap::new(),
        }
    }

    fn webhook_spec() -> JobSpec {
        JobSpec {
            template_dir: Some(PathBuf::from("./generator/src/main/resources")),
            package_name: "webhook".to_string(),
            output_dir: PathBuf::from("linebot/webhook"),
            input_spec: PathBuf::from("line-openapi/webhook.yml"),
            generate_docs: false,
            generate_tests: false,
            additional_properties: BTreeMap::from([("parse.go".to_string(), "true".to_string())]),
            ..client_spec()
        }
    }

    #[test]
    fn test_client_command_line() {
        let command = GenerationJob::new(tool(), client_spec()).command_line();

        assert!(command.starts_with("java \\\n    -cp ./tools/cli.jar:./generator/target/gen.jar"));
        assert!(command.contains("org.openapitools.codegen.OpenAPIGenerator \\\n    generate"));
        assert_eq!(flag_value(&command, "-g"), Some("line-bot-sdk-go-generator"));
        assert_eq!(flag_value(&command, "-e"), Some("pebble"));
        assert_eq!(flag_value(&command, "--model-package"), Some("model"));
        assert_eq!(flag_value(&command, "--api-package"), Some("api"));
        assert_eq!(flag_value(&command, "--package-name"), Some("shop"));
        assert_eq!(flag_value(&command, "-o"), Some("linebot/shop"));
        assert_eq!(flag_value(&command, "-i"), Some("line-openapi/shop.yml"));
        assert!(command.contains("--enable-post-process-file"));
        assert!(!command.contains("--global-property"));
        assert!(!command.contains("--template-dir"));
        assert!(!command.contains("--additional-properties"));
    }

    #[test]
    fn test_webhook_command_line() {
        let command = GenerationJob::new(tool(), webhook_spec()).command_line();

        assert_eq!(
            flag_value(&command, "--global-property"),
            Some("apiTest=false,modelDocs=false,apiDocs=false")
        );
        assert_eq!(
            flag_value(&command, "--template-dir"),
            Some("./generator/src/main/resources")
        );
        assert_eq!(flag_value(&command, "--additional-properties"), Some("parse.go=true"));
        assert_eq!(flag_value(&command, "--package-name"), Some("webhook"));
        assert_eq!(flag_value(&command, "-o"), Some("linebot/webhook"));
        assert!(command.contains("--enable-post-process-file"));
    }

    #[test]
    fn test_request_carries_hook_only_when_post_processing() {
        let root = Path::new("/repo");
        let request = GenerationJob::new(tool(), client_spec())
            .with_timeout(Some(Duration::from_secs(60)))
            .request(root);
        assert_eq!(request.working_dir, PathBuf::from("/repo"));
        assert_eq!(
            request.env.get("GO_POST_PROCESS_FILE").map(String::as_str),
            Some("./postprocess-file.sh")
        );
        assert_eq!(request.timeout, Some(Duration::from_secs(60)));

        let spec = JobSpec { post_process: None, ..client_spec() };
        let job = GenerationJob::new(tool(), spec);
        assert!(job.request(root).env.is_empty());
        assert!(!job.command_line().contains("--enable-post-process-file"));
    }

    #[test]
    fn test_run_prunes_dropped_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let output_dir = temp.path().join("linebot/shop");
        write_manifest(&output_dir, &["api/foo.go", "model/bar.go", "docs/Foo.md"]);

        let generated_dir = output_dir.clone();
        let runner = ProcessRunner::new(RecordingExecutor::with_effect(move |request| {
            if request.command.contains("generate") {
                write_manifest(&generated_dir, &["api/foo.go", "model/bar.go"]);
            }
            CommandResult::default()
        }));

        let outcome =
            GenerationJob::new(tool(), client_spec()).run(&runner, temp.path()).expect("job runs");

        assert_eq!(outcome.package_name, "shop");
        assert_eq!(outcome.generated, 2);
        assert_eq!(outcome.deleted, vec!["docs/Foo.md"]);
        let requests = runner.executor().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].working_dir, temp.path());
        assert_eq!(requests[1].command, "rm -rf -- docs/Foo.md");
        assert_eq!(requests[1].working_dir, output_dir);
    }

    #[test]
    fn test_second_identical_run_deletes_nothing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let output_dir = temp.path().join("linebot/shop");

        let runner = ProcessRunner::new(RecordingExecutor::with_effect(move |_| {
            write_manifest(&output_dir, &["api/foo.go", "model/bar.go"]);
            CommandResult::default()
        }));
        let job = GenerationJob::new(tool(), client_spec());

        let first = job.run(&runner, temp.path()).expect("first run");
        let second = job.run(&runner, temp.path()).expect("second run");

        assert!(first.deleted.is_empty());
        assert!(second.deleted.is_empty());
        assert_eq!(runner.executor().requests().len(), 2);
    }

    #[test]
    fn test_failed_generation_skips_reconcile() {
        let temp = tempfile::tempdir().expect("tempdir");
        let output_dir = temp.path().join("linebot/shop");
        write_manifest(&output_dir, &["api/foo.go", "docs/Foo.md"]);

        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let dir = output_dir.clone();
        let runner = ProcessRunner::new(RecordingExecutor::with_effect(move |_| {
            seen.set(seen.get() + 1);
            // A partial manifest must not be acted on
            write_manifest(&dir, &["api/foo.go"]);
            CommandResult { exit_code: 1, stdout: String::new(), stderr: "bad spec".to_string() }
        }));

        let err = GenerationJob::new(tool(), client_spec())
            .run(&runner, temp.path())
            .expect_err("generation fails");

        assert!(matches!(err, PipelineError::CommandFailed { exit_code: 1, .. }));
        assert_eq!(calls.get(), 1);
        assert!(runner.executor().commands().iter().all(|c| !c.starts_with("rm ")));
    }
}
