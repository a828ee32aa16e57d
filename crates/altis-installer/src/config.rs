//! Installer configuration
//!
//! Every field has a default matching a stock Altis project, so hosts only
//! build or load an [`InstallerConfig`] when they need to deviate from it.

use std::path::PathBuf;

use altis_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Package whose directory holds the scaffolding templates.
pub const DEFAULT_TEMPLATE_PACKAGE: &str = "altis/cms";

/// Name of the generated loader inside the vendor directory.
pub const DEFAULT_MANIFEST_FILE: &str = "modules.php";

/// Per-package entrypoint, relative to the package's base directory.
pub const DEFAULT_ENTRYPOINT_FILE: &str = "load.php";

/// Expression the host evaluates to "the directory containing this file".
pub const DEFAULT_OWN_DIR_EXPRESSION: &str = "__DIR__";

/// Configuration for the lifecycle plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct InstallerConfig {
    /// Explicit template directory. Relative paths are taken from the
    /// project root. Defaults to the template package inside vendor.
    pub template_dir: Option<PathBuf>,
    /// Package providing the templates when `template_dir` is unset.
    pub template_package: String,
    /// Manifest generation settings.
    pub manifest: ManifestOptions,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            template_dir: None,
            template_package: DEFAULT_TEMPLATE_PACKAGE.to_string(),
            manifest: ManifestOptions::default(),
        }
    }
}

impl InstallerConfig {
    /// Load a config file; the format follows the file extension.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    /// Use `dir` as the template source.
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    /// Directory the scaffold templates are copied from.
    pub fn template_dir(&self, vendor_dir: &NormalizedPath) -> NormalizedPath {
        match &self.template_dir {
            Some(dir) => {
                let dir = NormalizedPath::new(dir);
                if dir.is_absolute() {
                    dir
                } else {
                    project_root(vendor_dir).join(dir.as_str()).clean()
                }
            }
            None => vendor_dir.join(&self.template_package),
        }
    }
}

/// Settings that shape the generated manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ManifestOptions {
    /// Manifest file name, written inside the vendor directory.
    pub file_name: String,
    /// Entrypoint looked up in each module package.
    pub entrypoint_file: String,
    /// Replacement for the own-directory placeholder.
    pub own_dir_expression: String,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_MANIFEST_FILE.to_string(),
            entrypoint_file: DEFAULT_ENTRYPOINT_FILE.to_string(),
            own_dir_expression: DEFAULT_OWN_DIR_EXPRESSION.to_string(),
        }
    }
}

/// The project root: the vendor directory's parent.
pub fn project_root(vendor_dir: &NormalizedPath) -> NormalizedPath {
    vendor_dir.join("..").clean()
}
