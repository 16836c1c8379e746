//! Specification documents consumed by the generator.
//!
//! A document is identified by its file name (e.g. `channel-access-token.yml`).
//! The package name and output directory for the generated client are derived
//! from that file name.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Result, TypesError};

/// File extensions accepted for specification documents.
const RECOGNIZED_EXTENSIONS: &[&str] = &[".yml", ".yaml"];

/// Separator characters that are not valid inside a package name.
const DISALLOWED_SEPARATORS: &[char] = &['-'];

/// Replacement used for every disallowed separator.
const PACKAGE_SEPARATOR: char = '_';

/// An input specification document and its normalized package name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpecDocument {
    file_name: String,
    name: String,
}

impl SpecDocument {
    /// Parse a document file name such as `manage-audience.yml`.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::UnrecognizedExtension`] when the name does not end in
    /// `.yml` or `.yaml`, and [`TypesError::EmptyName`] when nothing precedes the extension.
    pub fn parse(file_name: &str) -> Result<Self> {
        let stem = RECOGNIZED_EXTENSIONS
            .iter()
            .find_map(|ext| file_name.strip_suffix(ext))
            .ok_or_else(|| TypesError::UnrecognizedExtension(file_name.to_string()))?;

        if stem.is_empty() {
            return Err(TypesError::EmptyName(file_name.to_string()));
        }

        Ok(Self { file_name: file_name.to_string(), name: normalize_package_name(stem) })
    }

    /// The document file name as given.
    pub fn file_name(&self) -> &str { &self.file_name }

    /// The normalized name, used both as package name and output directory name.
    pub fn name(&self) -> &str { &self.name }

    /// Location of the generated client for this document, under `output_root`.
    pub fn output_dir(&self, output_root: &Path) -> PathBuf { output_root.join(&self.name) }

    /// Location of the document itself, under `spec_dir`.
    pub fn input_path(&self, spec_dir: &Path) -> PathBuf { spec_dir.join(&self.file_name) }
}

/// Replace every disallowed separator in `stem` with the package separator.
pub fn normalize_package_name(stem: &str) -> String {
    stem.chars()
        .map(|c| if DISALLOWED_SEPARATORS.contains(&c) { PACKAGE_SEPARATOR } else { c })
        .collect()
}

impl FromStr for SpecDocument {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl TryFrom<String> for SpecDocument {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self> { Self::parse(&value) }
}

impl From<SpecDocument> for String {
    fn from(doc: SpecDocument) -> Self { doc.file_name }
}

impl fmt::Display for SpecDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.file_name) }
}
