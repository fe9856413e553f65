//! Version pin files
//!
//! This module provides functionality to:
//! - Locate the pin file of a product (`<root>/<product>/<pin_file>`)
//! - Read the pinned version from a `FROM image:X.Y.Z` line
//! - Archive the pin file and rewrite the pinned version

mod writer;

pub use writer::PinWriter;

use crate::domain::TaggedVersion;
use crate::error::PinError;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Default pin file name inside each product directory
pub const DEFAULT_PIN_FILE: &str = "Dockerfile";

/// `FROM <image>:X.Y.Z`
static PIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"FROM\s+\S+:([0-9]+\.[0-9]+\.[0-9]+)").unwrap());

/// Path of a product's pin file
pub fn pin_path(root: &Path, product: &str, pin_file: &str) -> PathBuf {
    root.join(product).join(pin_file)
}

/// Extract the pinned version from pin file content
pub fn parse_pin(content: &str) -> Option<TaggedVersion> {
    let caps = PIN_RE.captures(content)?;
    TaggedVersion::parse(&caps[1])
}

/// Read the pinned version from a pin file
///
/// Returns `Ok(None)` when the file exists but has no recognizable pin.
pub fn read_pin(path: &Path) -> Result<Option<TaggedVersion>, PinError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PinError::not_found(path),
        _ => PinError::read_error(path, e),
    })?;
    Ok(parse_pin(&content))
}
