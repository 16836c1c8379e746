//! Generator manifests.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// The files a generator declared it produced for one output directory.
///
/// Entries are relative to `output_dir` and kept in the order they were read;
/// duplicates are preserved here and collapse when manifests are compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    output_dir: PathBuf,
    entries: Vec<String>,
}

impl Manifest {
    /// Create a manifest for `output_dir` with the given entries.
    pub fn new(output_dir: impl Into<PathBuf>, entries: Vec<String>) -> Self {
        Self { output_dir: output_dir.into(), entries }
    }

    /// A manifest with no entries, as for a directory never generated into.
    pub fn empty(output_dir: impl Into<PathBuf>) -> Self { Self::new(output_dir, Vec::new()) }

    /// The output directory the entries are relative to.
    pub fn output_dir(&self) -> &Path { &self.output_dir }

    /// The entries in file order.
    pub fn entries(&self) -> &[String] { &self.entries }

    /// Whether the manifest has no entries.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Entries of `self` that are absent from `newer`, sorted and deduplicated.
    pub fn missing_from<'a>(&'a self, newer: &Manifest) -> Vec<&'a str> {
        let current: BTreeSet<&str> = newer.entries.iter().map(String::as_str).collect();
        let previous: BTreeSet<&'a str> = self.entries.iter().map(String::as_str).collect();
        previous.into_iter().filter(|entry| !current.contains(entry)).collect()
    }
}
