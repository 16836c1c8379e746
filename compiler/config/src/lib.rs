#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! linegen Configuration
//!
//! This crate provides configuration management for the generation pipeline.
//! It describes:
//! - Where the generator workspace, specification documents and output tree live
//! - How the generator artifact is built and launched
//! - Which specification documents are generated, and the webhook job options
//! - Logging configuration
//!
//! Configuration is stored in TOML format. Every section has defaults matching the
//! LINE bot SDK layout, so a project without a `linegen.toml` runs unconfigured.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use types::{GeneratorTool, PostProcessHook, SpecDocument};

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Client specification documents, generated in this order
    pub clients: Vec<SpecDocument>,
    /// Project directory layout
    pub layout: LayoutConfig,
    /// Generator build step
    pub build: BuildConfig,
    /// Generator launch settings shared by every job
    pub generator: GeneratorConfig,
    /// Per-file post-processing hook
    pub post_process: PostProcessConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// The webhook job
    pub webhook: WebhookConfig,
}

/// Directory layout, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Build workspace of the generator artifact
    pub generator_dir: PathBuf,
    /// Directory holding the specification documents
    pub spec_dir: PathBuf,
    /// Root of the generated client tree
    pub output_root: PathBuf,
}

/// Build step configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Whether the generator artifact is built before generating
    pub enabled: bool,
    /// Build command, run inside `layout.generator_dir`
    pub command: String,
}

/// Generator launch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Program used to launch the generator
    pub program: String,
    /// Classpath entries, relative to the project root
    pub classpath: Vec<String>,
    /// Generator entry point
    pub main_class: String,
    /// Generator implementation name
    pub name: String,
    /// Template engine
    pub engine: String,
    /// Package for generated models
    pub model_package: String,
    /// Package for generated APIs
    pub api_package: String,
    /// Upper bound on a single command's run time, in seconds
    pub timeout_secs: Option<u64>,
}

/// Post-process hook configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessConfig {
    /// Variable the generator reads the hook location from
    pub env_var: String,
    /// Hook script, relative to the project root
    pub script: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directives (debug, info, warn, error)
    pub level: String,
    /// Emit JSON lines instead of plain text
    pub json: bool,
}

/// Webhook job configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Webhook specification document
    pub spec: SpecDocument,
    /// Package and output directory name
    pub package_name: String,
    /// Template directory overriding the generator's bundled templates
    pub template_dir: Option<PathBuf>,
    /// Whether documentation is generated
    pub generate_docs: bool,
    /// Whether API tests are generated
    pub generate_tests: bool,
    /// Extra template properties, e.g. the parser mode
    pub additional_properties: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load `<project_root>/linegen.toml`, or the defaults when it does not exist
    pub fn load_for_project(project_root: &Path) -> Result<Self, ConfigError> {
        let path = project_root.join(path::CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/linegen/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("linegen");
        Ok(config_dir.join("config.toml"))
    }

    /// The generator launch description
    pub fn generator_tool(&self) -> GeneratorTool {
        GeneratorTool {
            program: self.generator.program.clone(),
            classpath: self.generator.classpath.clone(),
            main_class: self.generator.main_class.clone(),
        }
    }

    /// The post-process hook handed to every job
    pub fn post_process_hook(&self) -> PostProcessHook {
        PostProcessHook {
            env_var: self.post_process.env_var.clone(),
            script: self.post_process.script.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clients: default_clients(),
            layout: LayoutConfig::default(),
            build: BuildConfig::default(),
            generator: GeneratorConfig::default(),
            post_process: PostProcessConfig::default(),
            logging: LoggingConfig::default(),
            webhook: WebhookConfig::default(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            generator_dir: PathBuf::from("generator"),
            spec_dir: PathBuf::from("line-openapi"),
            output_root: PathBuf::from("linebot"),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { enabled: true, command: "mvn package -DskipTests=true".to_string() }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "java".to_string(),
            classpath: vec![
                "./tools/openapi-generator-cli.jar".to_string(),
                "./generator/target/line-bot-sdk-go-generator-openapi-generator-1.0.0.jar"
                    .to_string(),
            ],
            main_class: "org.openapitools.codegen.OpenAPIGenerator".to_string(),
            name: "line-bot-sdk-go-generator".to_string(),
            engine: "pebble".to_string(),
            model_package: "model".to_string(),
            api_package: "api".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            env_var: "GO_POST_PROCESS_FILE".to_string(),
            script: "./postprocess-file.sh".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string(), json: false } }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            spec: known_document("webhook.yml"),
            package_name: "webhook".to_string(),
            template_dir: Some(PathBuf::from("./generator/src/main/resources")),
            generate_docs: false,
            generate_tests: false,
            additional_properties: BTreeMap::from([("parse.go".to_string(), "true".to_string())]),
        }
    }
}

/// Client documents of the LINE bot SDK, in generation order
pub const DEFAULT_CLIENTS: &[&str] = &[
    "shop.yml",
    "channel-access-token.yml",
    "insight.yml",
    "liff.yml",
    "manage-audience.yml",
    "module-attach.yml",
    "module.yml",
    "messaging-api.yml",
];

/// Default client documents as parsed values
pub fn default_clients() -> Vec<SpecDocument> {
    DEFAULT_CLIENTS.iter().map(|name| known_document(name)).collect()
}

fn known_document(file_name: &str) -> SpecDocument {
    SpecDocument::parse(file_name).expect("validated: built-in document names end in .yml")
}
