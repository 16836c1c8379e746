#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Core data model for the generation pipeline.
//!
//! This crate defines the values that flow between the pipeline stages:
//! the specification documents that parameterize a run, the per-document
//! generator job description, the shell commands the pipeline issues and
//! their captured results, and the manifests the generator leaves behind.

use thiserror::Error;

/// Shell commands issued by the pipeline and their captured results.
pub mod command;
/// Declarative description of one generator invocation.
pub mod job_spec;
/// File lists declared by the generator for an output directory.
pub mod manifest;
/// Specification documents and the names derived from them.
pub mod spec_document;

pub use command::{CommandRequest, CommandResult};
pub use job_spec::{GeneratorTool, JobSpec, PostProcessHook};
pub use manifest::Manifest;
pub use spec_document::SpecDocument;

/// Errors raised while constructing data model values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    /// The document name does not end in a recognized extension.
    #[error("Unrecognized specification document '{0}': expected a .yml or .yaml file")]
    UnrecognizedExtension(String),
    /// The document name has nothing in front of its extension.
    #[error("Specification document '{0}' has an empty name")]
    EmptyName(String),
}

/// Result type alias for data model operations.
pub type Result<T> = std::result::Result<T, TypesError>;
