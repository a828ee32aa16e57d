//! Module loader generation
//!
//! The manifest is a PHP file in the vendor directory that requires, once,
//! the `load.php` of every installed Altis module followed by the custom
//! entrypoints declared in the root project. The host requires the manifest
//! early during bootstrap, so load order here is boot order.
//!
//! Generation is a function of the package list, the root config, the vendor
//! directory and which candidate files exist. The file is rewritten in full on
//! every run.
//!
//! Paths are emitted relative to the manifest's own directory through a
//! placeholder token. A final pass swaps the token for the host's
//! own-directory expression (`__DIR__`), which the host evaluates when it
//! loads the file. Nothing is resolved to an absolute path at generation
//! time, so the vendor directory can move between build and deploy.

use altis_fs::{NormalizedPath, checksum, io, resolve_absolute};
use tracing::{debug, info, warn};

use crate::config::{ManifestOptions, project_root};
use crate::error::Result;
use crate::package::{InstalledPackage, RootProjectConfig};

/// Stands in for the host's own-directory expression until the final pass.
pub const OWN_DIR_TOKEN: &str = "{{OWN_DIR}}";

const HEADER: &str = "<?php
/**
 * Altis module loader.
 *
 * DO NOT EDIT THIS FILE.
 *
 * Generated by the Altis installer whenever the autoloader is dumped. Manual
 * changes are overwritten; declare custom entrypoints under
 * `extra.altis.modules` in the root composer.json instead.
 */";

/// Where a manifest entry came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    /// An installed package carrying the module marker.
    Package(String),
    /// A module declared in the root project config.
    CustomModule(String),
}

/// One require statement in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub source: EntrySource,
    /// The entrypoint as found on disk.
    pub file: NormalizedPath,
    /// `file` relative to the vendor directory. `None` when the two share no
    /// root (another drive), in which case the absolute path is emitted.
    pub relative_path: Option<NormalizedPath>,
}

impl ManifestEntry {
    fn new(source: EntrySource, file: NormalizedPath, vendor_dir: &NormalizedPath) -> Self {
        let relative_path = file.relative_to(vendor_dir);
        Self {
            source,
            file,
            relative_path,
        }
    }

    /// The comment and require statement, still holding [`OWN_DIR_TOKEN`].
    pub fn statement(&self) -> String {
        let comment = match &self.source {
            EntrySource::Package(name) => format!("// Load {}.", comment_text(name)),
            EntrySource::CustomModule(module) => {
                format!("// Load custom module {}.", comment_text(module))
            }
        };
        let target = match &self.relative_path {
            Some(relative) => format!("{OWN_DIR_TOKEN} . '/{}'", php_quote(relative.as_str())),
            None => format!("'{}'", php_quote(self.file.as_str())),
        };
        format!("{comment}\nrequire_once {target};")
    }
}

/// A generated manifest, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub text: String,
    pub entries: Vec<ManifestEntry>,
}

/// Outcome of writing the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestReport {
    pub path: NormalizedPath,
    pub entries: Vec<ManifestEntry>,
    /// `sha256:` checksum of the file as written.
    pub checksum: String,
}

/// Build the manifest for `packages` (in the order given) and the root
/// project's custom modules.
///
/// A relative `vendor_dir` is taken from the working directory. Paths are
/// resolved lexically and symlinks are never followed, so load statements
/// keep the layout as declared. Missing entrypoints, unmarked packages
/// and absent module declarations are skipped, never errors.
pub fn generate_manifest(
    packages: &[InstalledPackage],
    vendor_dir: &NormalizedPath,
    root: &RootProjectConfig,
    options: &ManifestOptions,
) -> Result<Manifest> {
    let cwd = NormalizedPath::new(std::env::current_dir()?);
    let vendor_dir = &resolve_absolute(vendor_dir, &cwd);

    let mut entries = package_entries(packages, vendor_dir, options);
    entries.extend(custom_entries(root, vendor_dir));

    let mut sections = vec![HEADER.to_string()];
    sections.extend(entries.iter().map(ManifestEntry::statement));
    let assembled = sections.join("\n\n");

    let text = format!(
        "{}\n",
        substitute_own_dir(&assembled, &options.own_dir_expression).trim_end()
    );

    Ok(Manifest { text, entries })
}

/// Write `manifest` into the vendor directory, replacing any previous copy.
pub fn write_manifest(
    manifest: &Manifest,
    vendor_dir: &NormalizedPath,
    options: &ManifestOptions,
) -> Result<ManifestReport> {
    let path = vendor_dir.join(&options.file_name);
    io::write_text(&path, &manifest.text)?;

    info!(path = %path, entries = manifest.entries.len(), "Wrote module manifest");

    Ok(ManifestReport {
        checksum: checksum::compute_file_checksum(&path)?,
        path,
        entries: manifest.entries.clone(),
    })
}

/// Replace every [`OWN_DIR_TOKEN`] in `text` with `expression`.
pub fn substitute_own_dir(text: &str, expression: &str) -> String {
    text.replace(OWN_DIR_TOKEN, expression)
}

fn package_entries(
    packages: &[InstalledPackage],
    vendor_dir: &NormalizedPath,
    options: &ManifestOptions,
) -> Vec<ManifestEntry> {
    let root = project_root(vendor_dir);
    let mut entries = Vec::new();

    for package in packages {
        if !package.is_module() {
            debug!(package = %package.name, "Skipping package without module marker");
            continue;
        }

        let base_dir = match &package.install_path {
            Some(path) => {
                let base_dir = resolve_absolute(path, &root);
                if !base_dir.is_dir() {
                    // Installed-but-incomplete packages must not block the rest
                    warn!(
                        package = %package.name,
                        path = %base_dir,
                        "Declared install path does not exist; skipping module"
                    );
                    continue;
                }
                base_dir
            }
            None => package.default_base_dir(vendor_dir),
        };

        let entrypoint = base_dir.join(&options.entrypoint_file);
        if !entrypoint.is_file() {
            debug!(package = %package.name, path = %entrypoint, "No entrypoint found");
            continue;
        }

        entries.push(ManifestEntry::new(
            EntrySource::Package(package.name.clone()),
            entrypoint,
            vendor_dir,
        ));
    }

    entries
}

fn custom_entries(root: &RootProjectConfig, vendor_dir: &NormalizedPath) -> Vec<ManifestEntry> {
    let root_dir = project_root(vendor_dir);
    let mut entries = Vec::new();

    for (module, config) in root.modules() {
        let declared = config.entrypoints();
        if declared.is_empty() {
            debug!(module = %module, "Custom module declares no entrypoint");
            continue;
        }

        for path in declared {
            let file = resolve_absolute(&NormalizedPath::new(path), &root_dir);
            if !file.is_file() {
                debug!(module = %module, path = %file, "Custom entrypoint not found");
                continue;
            }
            entries.push(ManifestEntry::new(
                EntrySource::CustomModule(module.to_string()),
                file,
                vendor_dir,
            ));
        }
    }

    entries
}

/// Make `value` safe inside a `//` comment, which ends at a line break or
/// at `?>`.
fn comment_text(value: &str) -> String {
    value
        .replace(['\r', '\n'], " ")
        .replace("?>", "? >")
}

/// Escape a value for a single-quoted PHP string literal.
fn php_quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
