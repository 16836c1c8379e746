// SPDX-License-Identifier: CC0-1.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Path utility functions for finding the project root and resolving pipeline paths.
//!
//! This module provides utilities for locating the SDK project root, the manifest a
//! generator leaves in each output directory, and for checking that manifest entries
//! stay inside the directory they describe.

pub mod path_utils;

// Re-export for convenience
pub use path_utils::*;
