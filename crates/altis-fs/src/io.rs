//! Atomic I/O operations with file locking

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use backoff::ExponentialBackoff;
use fs2::FileExt;
use tracing::debug;

use crate::{Error, NormalizedPath, Result};

/// Tuning knobs for [`write_atomic`].
#[derive(Debug, Clone, Copy)]
pub struct RobustnessConfig {
    /// Flush file contents to disk before the rename.
    pub enable_fsync: bool,
    /// How long a failing rename is retried before giving up.
    ///
    /// Renames onto a file that another process holds open fail transiently
    /// on Windows.
    pub rename_retry: Duration,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            enable_fsync: true,
            rename_retry: Duration::from_millis(500),
        }
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock to prevent concurrent access.
pub fn write_atomic(path: &NormalizedPath, content: &[u8], config: RobustnessConfig) -> Result<()> {
    let native_path = path.to_native();

    // Ensure parent directory exists
    if let Some(parent) = native_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file lives next to the target so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp = TempFile::create(temp_path)?;
    temp.fill(content, &native_path, config.enable_fsync)?;

    let policy = ExponentialBackoff {
        initial_interval: Duration::from_millis(10),
        max_elapsed_time: Some(config.rename_retry),
        ..ExponentialBackoff::default()
    };
    backoff::retry_notify(
        policy,
        || fs::rename(&temp.path, &native_path).map_err(backoff::Error::transient),
        |err: std::io::Error, wait: Duration| {
            debug!(path = %native_path.display(), error = %err, ?wait, "Rename failed, retrying");
        },
    )
    .map_err(|err| {
        let source = match err {
            backoff::Error::Permanent(e) | backoff::Error::Transient { err: e, .. } => e,
        };
        Error::io(&native_path, source)
    })?;

    temp.persisted();
    Ok(())
}

/// The staging file of [`write_atomic`], removed on drop unless it was
/// renamed into place.
struct TempFile {
    path: PathBuf,
    file: Option<File>,
    keep: bool,
}

impl TempFile {
    fn create(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;
        Ok(Self {
            path,
            file: Some(file),
            keep: false,
        })
    }

    /// Write `content` under an exclusive lock, then close the handle so
    /// the file can be renamed.
    fn fill(&mut self, content: &[u8], target: &Path, fsync: bool) -> Result<()> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };

        file.lock_exclusive().map_err(|_| Error::LockFailed {
            path: target.to_path_buf(),
        })?;
        file.write_all(content).map_err(|e| Error::io(&self.path, e))?;
        if fsync {
            file.sync_all().map_err(|e| Error::io(&self.path, e))?;
        }
        file.unlock().map_err(|_| Error::LockFailed {
            path: target.to_path_buf(),
        })
    }

    fn persisted(mut self) {
        self.keep = true;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        // Windows refuses to delete open files
        self.file.take();
        if !self.keep {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes(), RobustnessConfig::default())
}

/// Copy `source` over `dest`, replacing any existing file atomically.
pub fn copy_file(source: &NormalizedPath, dest: &NormalizedPath) -> Result<()> {
    let native_source = source.to_native();
    let content = fs::read(&native_source).map_err(|e| Error::io(&native_source, e))?;
    write_atomic(dest, &content, RobustnessConfig::default())
}

/// Create `path` (and any missing parents) unless it is already a directory.
///
/// Returns `true` when the directory was created by this call.
pub fn ensure_dir(path: &NormalizedPath) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    let native_path = path.to_native();
    fs::create_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))?;
    Ok(true)
}
