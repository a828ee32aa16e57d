//! Package-manager context handed to lifecycle actions
//!
//! The package manager owns the installed package list and the root project
//! metadata. Actions only borrow them for one event, through
//! [`PackageManagerContext`].

use altis_fs::{ConfigStore, NormalizedPath, resolve_absolute};
use serde::Deserialize;

use crate::error::Result;
use crate::package::{InstalledPackage, PackageExtra, RootExtra, RootProjectConfig};

/// What the host exposes to the plugin for one lifecycle event.
pub trait PackageManagerContext {
    /// The vendor (installation) directory, as configured.
    fn vendor_dir(&self) -> &NormalizedPath;

    /// Installed packages in the package manager's canonical order.
    fn packages(&self) -> &[InstalledPackage];

    /// The root project's metadata.
    fn root_config(&self) -> &RootProjectConfig;

    /// The vendor directory as an absolute path.
    ///
    /// Relative vendor dirs are taken from the process working directory.
    fn resolve_vendor_dir(&self) -> Result<NormalizedPath> {
        let cwd = std::env::current_dir()?;
        Ok(resolve_absolute(self.vendor_dir(), &NormalizedPath::new(cwd)))
    }
}

/// A context built from data the host already has in memory, or read from a
/// Composer project on disk.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    vendor_dir: NormalizedPath,
    packages: Vec<InstalledPackage>,
    root_config: RootProjectConfig,
}

impl ProjectContext {
    pub fn new(
        vendor_dir: impl Into<NormalizedPath>,
        packages: Vec<InstalledPackage>,
        root_config: RootProjectConfig,
    ) -> Self {
        Self {
            vendor_dir: vendor_dir.into(),
            packages,
            root_config,
        }
    }

    /// Read a Composer project rooted at `project_root`.
    ///
    /// Uses the root `composer.json` (honouring `config.vendor-dir`) and the
    /// installed repository at `<vendor>/composer/installed.json`, keeping its
    /// package order. Either file may be missing, which reads as an empty
    /// root config or an empty package list.
    pub fn from_composer(project_root: impl Into<NormalizedPath>) -> Result<Self> {
        let project_root: NormalizedPath = project_root.into();
        let store = ConfigStore::new();

        let composer: ComposerJson = store
            .load_if_exists(&project_root.join("composer.json"))?
            .unwrap_or_default();

        let vendor_dir = match composer.config.vendor_dir.as_deref() {
            Some(dir) if NormalizedPath::new(dir).is_absolute() => NormalizedPath::new(dir),
            Some(dir) => project_root.join(dir).clean(),
            None => project_root.join("vendor").clean(),
        };

        let installed: InstalledJson = store
            .load_if_exists(&vendor_dir.join("composer/installed.json"))?
            .unwrap_or_default();

        let packages = installed
            .into_packages()
            .into_iter()
            .map(|entry| entry.into_package(&vendor_dir))
            .collect::<Vec<_>>();

        tracing::debug!(
            vendor_dir = %vendor_dir,
            packages = packages.len(),
            "Loaded Composer project"
        );

        Ok(Self {
            vendor_dir,
            packages,
            root_config: RootProjectConfig {
                extra: composer.extra,
            },
        })
    }
}

impl PackageManagerContext for ProjectContext {
    fn vendor_dir(&self) -> &NormalizedPath {
        &self.vendor_dir
    }

    fn packages(&self) -> &[InstalledPackage] {
        &self.packages
    }

    fn root_config(&self) -> &RootProjectConfig {
        &self.root_config
    }
}

#[derive(Debug, Default, Deserialize)]
struct ComposerJson {
    #[serde(default)]
    extra: RootExtra,
    #[serde(default)]
    config: ComposerConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ComposerConfig {
    #[serde(rename = "vendor-dir")]
    vendor_dir: Option<String>,
}

/// `installed.json`: Composer 2 wraps the list, Composer 1 does not.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstalledJson {
    Wrapped { packages: Vec<InstalledEntry> },
    Bare(Vec<InstalledEntry>),
}

impl Default for InstalledJson {
    fn default() -> Self {
        Self::Bare(Vec::new())
    }
}

impl InstalledJson {
    fn into_packages(self) -> Vec<InstalledEntry> {
        match self {
            Self::Wrapped { packages } | Self::Bare(packages) => packages,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InstalledEntry {
    name: String,
    #[serde(default)]
    extra: PackageExtra,
    /// Relative to `<vendor>/composer`.
    #[serde(rename = "install-path")]
    install_path: Option<String>,
}

impl InstalledEntry {
    fn into_package(self, vendor_dir: &NormalizedPath) -> InstalledPackage {
        let package = InstalledPackage::new(self.name).with_extra(self.extra);

        let Some(install_path) = self.install_path else {
            return package;
        };
        let declared = NormalizedPath::new(&install_path);
        let base_dir = if declared.is_absolute() {
            declared.clean()
        } else {
            vendor_dir.join("composer").join(declared.as_str()).clean()
        };

        // Only a path that differs from the default counts as an override
        if base_dir == package.default_base_dir(vendor_dir).clean() {
            package
        } else {
            package.with_install_path(base_dir)
        }
    }
}
