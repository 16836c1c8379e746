//! Reading generator manifests.
//!
//! The generator records every file it wrote or kept in
//! `<output_dir>/.openapi-generator/FILES`, one path per line, relative to the
//! output directory. A missing or unreadable manifest degrades to an empty one so
//! a fresh output directory, or a transient read error, never blocks the pipeline.

use std::fs;
use std::path::Path;

use tracing::{debug, error};
use types::Manifest;

/// Read the manifest the generator left in `output_dir`.
///
/// Never fails: a missing file is logged at debug level, an unreadable one at
/// error level, and both yield an empty manifest.
pub fn read_manifest(output_dir: &Path) -> Manifest {
    let file_path = path::manifest_path(output_dir);

    match file_path.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            debug!("Manifest {} does not exist; treating as empty", file_path.display());
            return Manifest::empty(output_dir);
        }
        Err(e) => {
            error!("Error reading manifest {}: {}", file_path.display(), e);
            return Manifest::empty(output_dir);
        }
    }

    match fs::read_to_string(&file_path) {
        Ok(content) => Manifest::new(output_dir, parse_manifest(&content)),
        Err(e) => {
            error!("Error reading manifest {}: {}", file_path.display(), e);
            Manifest::empty(output_dir)
        }
    }
}

/// Split manifest text into entries after trimming the whole blob.
pub fn parse_manifest(content: &str) -> Vec<String> {
    let content = content.trim();
    if content.is_empty() {
        return Vec::new();
    }
    content.split('\n').map(|line| line.trim_end_matches('\r').to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{capture_logs, write_manifest};

    #[test]
    fn test_missing_manifest_is_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (manifest, logs) = capture_logs(|| read_manifest(&temp.path().join("linebot/shop")));

        assert!(manifest.is_empty());
        assert_eq!(manifest.output_dir(), temp.path().join("linebot/shop"));
        assert!(logs.contains("DEBUG"));
        assert!(logs.contains("does not exist"));
        assert!(!logs.contains("ERROR"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unstatable_manifest_is_logged_as_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        // A plain file where the manifest directory belongs makes the lookup fail
        // with something other than "not found"
        fs::write(temp.path().join(path::MANIFEST_DIR), "not a directory").expect("write file");

        let (manifest, logs) = capture_logs(|| read_manifest(temp.path()));

        assert!(manifest.is_empty());
        assert!(logs.contains("ERROR"), "expected an error log, got: {logs}");
        assert!(!logs.contains("does not exist"));
    }

    #[test]
    fn test_reads_entries_in_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_manifest(temp.path(), &["api/foo.go", "model/bar.go", "api/foo.go"]);

        let manifest = read_manifest(temp.path());
        assert_eq!(manifest.entries(), ["api/foo.go", "model/bar.go", "api/foo.go"]);
    }

    #[test]
    fn test_unreadable_manifest_is_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        // A directory where the file should be exists but cannot be read as text
        fs::create_dir_all(path::manifest_path(temp.path())).expect("create dir");

        let (manifest, logs) = capture_logs(|| read_manifest(temp.path()));
        assert!(manifest.is_empty());
        assert!(logs.contains("ERROR"));
    }

    #[test]
    fn test_parse_manifest_trims_blob_only() {
        assert!(parse_manifest("").is_empty());
        assert!(parse_manifest(" \n\n ").is_empty());
        assert_eq!(parse_manifest("\n.gitignore\r\nREADME.md\n\n"), vec![".gitignore", "README.md"]);
        assert_eq!(parse_manifest("a.go\n\nb.go"), vec!["a.go", "", "b.go"]);
    }
}
