//! Package records handed over by the package manager.
//!
//! Both [`InstalledPackage`] and [`RootProjectConfig`] are read-only views of
//! what the host supplies for a single lifecycle event.

use altis_fs::NormalizedPath;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// A package's `extra` metadata block.
///
/// Only the `altis` key is interpreted. Its presence, with any non-null
/// value, opts the package into the module system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageExtra {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altis: Option<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A dependency installed by the package manager.
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledPackage {
    /// Vendor-qualified name, e.g. `altis/core`.
    pub name: String,
    pub extra: PackageExtra,
    /// Base directory declared by a custom installer, replacing
    /// `<vendor>/<name>`. Relative paths are taken from the project root.
    pub install_path: Option<NormalizedPath>,
}

impl InstalledPackage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: PackageExtra::default(),
            install_path: None,
        }
    }

    /// Mark the package as an Altis module.
    pub fn as_module(mut self) -> Self {
        self.extra.altis = Some(Value::Bool(true));
        self
    }

    pub fn with_extra(mut self, extra: PackageExtra) -> Self {
        self.extra = extra;
        self
    }

    pub fn with_install_path(mut self, path: impl Into<NormalizedPath>) -> Self {
        self.install_path = Some(path.into());
        self
    }

    /// Whether the package declares the component marker.
    pub fn is_module(&self) -> bool {
        self.extra.altis.is_some()
    }

    /// `<vendor>/<name>`, where the package manager puts packages by default.
    pub fn default_base_dir(&self, vendor_dir: &NormalizedPath) -> NormalizedPath {
        vendor_dir.join(&self.name)
    }
}

/// One `entrypoint` declaration: a single path or a list of paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entrypoints {
    One(String),
    Many(Vec<String>),
}

impl Entrypoints {
    /// Declared paths in order, with empty strings dropped.
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Self::One(path) => vec![path.as_str()],
            Self::Many(paths) => paths.iter().map(String::as_str).collect(),
        }
        .into_iter()
        .filter(|path| !path.trim().is_empty())
        .collect()
    }
}

/// Settings for one custom module in the root project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    #[serde(default)]
    pub entrypoint: Option<Entrypoints>,
}

impl ModuleConfig {
    pub fn entrypoints(&self) -> Vec<&str> {
        self.entrypoint.as_ref().map(Entrypoints::paths).unwrap_or_default()
    }
}

/// The root project's `extra.altis` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AltisConfig {
    /// Module name to raw module config, in declaration order.
    #[serde(default)]
    pub modules: Map<String, Value>,
}

/// The root project's `extra` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootExtra {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub altis: Option<AltisConfig>,
}

/// The root project's own metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootProjectConfig {
    #[serde(default)]
    pub extra: RootExtra,
}

impl RootProjectConfig {
    /// Parse the relevant parts of a root `composer.json` document.
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Declared custom modules in declaration order.
    ///
    /// Entries whose config cannot be read as a [`ModuleConfig`] come back
    /// with no entrypoints rather than failing the whole run.
    pub fn modules(&self) -> Vec<(&str, ModuleConfig)> {
        let Some(altis) = &self.extra.altis else {
            return Vec::new();
        };

        altis
            .modules
            .iter()
            .map(|(name, raw)| {
                let config = serde_json::from_value(raw.clone()).unwrap_or_else(|err| {
                    tracing::debug!(module = %name, error = %err, "Ignoring unreadable module config");
                    ModuleConfig::default()
                });
                (name.as_str(), config)
            })
            .collect()
    }
}

/// Deserialize a value, treating a shape mismatch as absent.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
