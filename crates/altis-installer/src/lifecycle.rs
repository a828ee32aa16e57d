//! Lifecycle bindings for package manager events
//!
//! Maps the Composer script events this plugin subscribes to onto the two
//! actions it performs, and marshals the host context into each action.
//! Nothing is kept between events; every call recomputes from the context.

use std::fmt;

use altis_fs::NormalizedPath;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{InstallerConfig, project_root};
use crate::context::PackageManagerContext;
use crate::error::{Error, Result};
use crate::manifest::{self, ManifestReport};
use crate::scaffold::{self, ScaffoldReport, ScaffoldTarget};

/// Package manager events the plugin can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleEvent {
    /// After `composer install`
    PostInstallCmd,
    /// After `composer update`
    PostUpdateCmd,
    /// After the autoloader has been regenerated
    PostAutoloadDump,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PostInstallCmd => write!(f, "post-install-cmd"),
            Self::PostUpdateCmd => write!(f, "post-update-cmd"),
            Self::PostAutoloadDump => write!(f, "post-autoload-dump"),
        }
    }
}

impl LifecycleEvent {
    /// Parse a lifecycle event from its host name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "post-install-cmd" => Some(Self::PostInstallCmd),
            "post-update-cmd" => Some(Self::PostUpdateCmd),
            "post-autoload-dump" => Some(Self::PostAutoloadDump),
            _ => None,
        }
    }

    /// List all valid event names
    pub fn all_names() -> &'static [&'static str] {
        &["post-install-cmd", "post-update-cmd", "post-autoload-dump"]
    }
}

/// Work the plugin can do in response to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleAction {
    /// Scaffold the project root
    InstallFiles,
    /// Regenerate the module manifest
    GenerateManifest,
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstallFiles => write!(f, "install-files"),
            Self::GenerateManifest => write!(f, "generate-manifest"),
        }
    }
}

const SUBSCRIPTIONS: &[(LifecycleEvent, &[LifecycleAction])] = &[
    (LifecycleEvent::PostUpdateCmd, &[LifecycleAction::InstallFiles]),
    (LifecycleEvent::PostInstallCmd, &[LifecycleAction::InstallFiles]),
    (LifecycleEvent::PostAutoloadDump, &[LifecycleAction::GenerateManifest]),
];

/// The event to action registrations, as handed to the host's plugin loader.
pub fn subscribed_events() -> &'static [(LifecycleEvent, &'static [LifecycleAction])] {
    SUBSCRIPTIONS
}

/// Actions registered for `event`, in run order.
pub fn actions_for(event: LifecycleEvent) -> &'static [LifecycleAction] {
    SUBSCRIPTIONS
        .iter()
        .find(|(subscribed, _)| *subscribed == event)
        .map(|(_, actions)| *actions)
        .unwrap_or(&[])
}

/// Result of one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Scaffolded(ScaffoldReport),
    ManifestWritten(ManifestReport),
}

/// The installer plugin: configuration plus event dispatch.
#[derive(Debug, Clone, Default)]
pub struct Plugin {
    config: InstallerConfig,
}

impl Plugin {
    pub fn new(config: InstallerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    /// Run every action bound to `event` against `ctx`.
    ///
    /// Actions run in registration order and the first failure aborts the
    /// event, naming the action that failed.
    pub fn handle(
        &self,
        event: LifecycleEvent,
        ctx: &dyn PackageManagerContext,
    ) -> Result<Vec<ActionOutcome>> {
        let mut outcomes = Vec::new();

        for &action in actions_for(event) {
            info!(%event, %action, "Running lifecycle action");
            let outcome = self
                .run_action(action, ctx)
                .map_err(|source| Error::ActionFailed {
                    event: event.to_string(),
                    action: action.to_string(),
                    source: Box::new(source),
                })?;
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Like [`Plugin::handle`], taking the event name the host fired.
    pub fn handle_named(
        &self,
        event: &str,
        ctx: &dyn PackageManagerContext,
    ) -> Result<Vec<ActionOutcome>> {
        let parsed = LifecycleEvent::parse(event).ok_or_else(|| Error::UnknownEvent {
            name: event.to_string(),
        })?;
        self.handle(parsed, ctx)
    }

    /// Run a single action, regardless of event bindings.
    pub fn run_action(
        &self,
        action: LifecycleAction,
        ctx: &dyn PackageManagerContext,
    ) -> Result<ActionOutcome> {
        let vendor_dir = ctx.resolve_vendor_dir()?;

        match action {
            LifecycleAction::InstallFiles => {
                let target = self.scaffold_target(&vendor_dir);
                Ok(ActionOutcome::Scaffolded(scaffold::install_files(&target)?))
            }
            LifecycleAction::GenerateManifest => {
                let options = &self.config.manifest;
                let generated =
                    manifest::generate_manifest(ctx.packages(), &vendor_dir, ctx.root_config(), options)?;
                let report = manifest::write_manifest(&generated, &vendor_dir, options)?;
                Ok(ActionOutcome::ManifestWritten(report))
            }
        }
    }

    fn scaffold_target(&self, vendor_dir: &NormalizedPath) -> ScaffoldTarget {
        ScaffoldTarget::new(self.config.template_dir(vendor_dir), project_root(vendor_dir))
    }
}
