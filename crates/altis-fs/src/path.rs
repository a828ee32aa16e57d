//! Normalized path handling for cross-platform compatibility
//!
//! Generated load statements must read the same whether the manifest was
//! produced on Windows or on Linux, so every path that ends up in generated
//! output goes through [`NormalizedPath`] first.

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Provides consistent path handling across platforms by normalizing
/// all paths to forward slashes internally and converting to
/// platform-native format only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a relative segment, using exactly one separator.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let segment_normalized = segment_normalized.trim_start_matches('/');
        if self.inner.is_empty() {
            return Self {
                inner: segment_normalized.to_string(),
            };
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) if trimmed.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Whether the path is rooted (`/...`, `//server/...` or `C:/...`).
    pub fn is_absolute(&self) -> bool {
        !split_prefix(&self.inner).0.is_empty()
    }

    /// Lexically normalize the path.
    ///
    /// Removes empty and `.` components and resolves `..` against preceding
    /// components. `..` never climbs above a root; leading `..` components of
    /// a relative path are kept. The filesystem is not consulted.
    pub fn clean(&self) -> Self {
        let (prefix, rest) = split_prefix(&self.inner);
        let mut components: Vec<&str> = Vec::new();

        for component in rest.split('/') {
            match component {
                "" | "." => {}
                ".." => match components.last() {
                    Some(&last) if last != ".." => {
                        components.pop();
                    }
                    _ if !prefix.is_empty() => {}
                    _ => components.push(".."),
                },
                other => components.push(other),
            }
        }

        let body = components.join("/");
        let inner = match (prefix.is_empty(), body.is_empty()) {
            (true, true) => ".".to_string(),
            (false, true) => prefix.to_string(),
            (_, false) => format!("{prefix}{body}"),
        };
        Self { inner }
    }

    /// Express this path relative to `base`.
    ///
    /// Both paths are cleaned first. Paths outside `base` are reached through
    /// `..` components. Returns `None` when the two paths cannot be related
    /// lexically: one absolute and the other relative, or different roots
    /// (such as two Windows drives).
    pub fn relative_to(&self, base: &NormalizedPath) -> Option<Self> {
        let target = self.clean();
        let base = base.clean();

        let (target_prefix, target_rest) = split_prefix(&target.inner);
        let (base_prefix, base_rest) = split_prefix(&base.inner);
        if !target_prefix.eq_ignore_ascii_case(base_prefix) {
            return None;
        }

        let target_parts = components(target_rest);
        let base_parts = components(base_rest);
        if base_parts.first() == Some(&"..") {
            return None;
        }

        let common = target_parts
            .iter()
            .zip(base_parts.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = vec![".."; base_parts.len() - common];
        parts.extend(&target_parts[common..]);

        let inner = if parts.is_empty() {
            ".".to_string()
        } else {
            parts.join("/")
        };
        Some(Self { inner })
    }
}

/// Resolve `path` to an absolute path.
///
/// Relative paths are joined onto `base`, then `.` and `..` are folded
/// lexically. Symlinks are never followed, so the result names the path as
/// declared rather than wherever a link happens to point on this machine.
pub fn resolve_absolute(path: &NormalizedPath, base: &NormalizedPath) -> NormalizedPath {
    if path.is_absolute() {
        path.clean()
    } else {
        base.join(path.as_str()).clean()
    }
}

/// Split a normalized path into its root prefix and the remainder.
fn split_prefix(path: &str) -> (&str, &str) {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        if bytes.len() == 2 {
            return (path, "");
        }
        if bytes[2] == b'/' {
            return path.split_at(3);
        }
    }
    if path.starts_with("//") && !path.starts_with("///") {
        return path.split_at(2);
    }
    if path.starts_with('/') {
        return path.split_at(1);
    }
    ("", path)
}

fn components(rest: &str) -> Vec<&str> {
    rest.split('/').filter(|c| !c.is_empty() && *c != ".").collect()
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
