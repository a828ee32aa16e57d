//! SHA-256 checksum utilities
//!
//! Generated files are reported with a canonical checksum (`sha256:<hex>`) so
//! hosts can tell whether two runs produced the same output.

use sha2::{Digest, Sha256};

use crate::{Error, NormalizedPath, Result};

const PREFIX: &str = "sha256:";

/// Checksum of `content` as `sha256:<hex>`.
pub fn compute_content_checksum(content: &str) -> String {
    digest(content.as_bytes())
}

/// Checksum of the bytes currently on disk at `path`.
pub fn compute_file_checksum(path: &NormalizedPath) -> Result<String> {
    let native = path.to_native();
    let content = std::fs::read(&native).map_err(|e| Error::io(&native, e))?;
    Ok(digest(&content))
}

fn digest(bytes: &[u8]) -> String {
    format!("{PREFIX}{:x}", Sha256::digest(bytes))
}
