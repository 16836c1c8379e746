//! Generator job descriptions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The external generator executable and how to launch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorTool {
    /// Program to run (e.g. `java`).
    pub program: String,
    /// Classpath entries, joined with `:` on the command line.
    pub classpath: Vec<String>,
    /// Entry point class of the generator.
    pub main_class: String,
}

/// Script the generator runs for every file it writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProcessHook {
    /// Environment variable the generator reads the script location from.
    pub env_var: String,
    /// Location of the hook script, relative to the generator's working directory.
    pub script: String,
}

/// The full parameter set for one generator invocation.
///
/// Plain client jobs and the webhook job share this type; they differ only in
/// field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Generator implementation name (`-g`).
    pub generator_name: String,
    /// Template engine (`-e`).
    pub engine: String,
    /// Custom template directory, if any.
    pub template_dir: Option<PathBuf>,
    /// Package for generated models.
    pub model_package: String,
    /// Package for generated APIs.
    pub api_package: String,
    /// Name of the generated package.
    pub package_name: String,
    /// Output directory, relative to the project root.
    pub output_dir: PathBuf,
    /// Input specification document, relative to the project root.
    pub input_spec: PathBuf,
    /// Whether API and model documentation is generated.
    pub generate_docs: bool,
    /// Whether API tests are generated.
    pub generate_tests: bool,
    /// Post-process hook, when post-processing is enabled.
    pub post_process: Option<PostProcessHook>,
    /// Free-form `key=value` properties passed to the generator templates.
    pub additional_properties: BTreeMap<String, String>,
}

impl JobSpec {
    /// Generator global properties implied by the feature flags, in command line order.
    pub fn global_properties(&self) -> Vec<(&'static str, &'static str)> {
        let mut props = Vec::new();
        if !self.generate_tests {
            props.push(("apiTest", "false"));
        }
        if !self.generate_docs {
            props.push(("modelDocs", "false"));
            props.push(("apiDocs", "false"));
        }
        props
    }

    /// Whether the generator should invoke the post-process hook.
    pub fn post_process_enabled(&self) -> bool { self.post_process.is_some() }
}
