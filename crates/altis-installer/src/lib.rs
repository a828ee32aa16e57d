//! Composer lifecycle integration for Altis projects
//!
//! Two jobs run when the package manager fires its install, update and
//! autoload events:
//!
//! - **Scaffolding** ([`scaffold`]): make sure the project root has its
//!   bootstrap files, ignore file and content directories, without touching
//!   anything the project owns.
//! - **Manifest generation** ([`manifest`]): write `vendor/modules.php`, which
//!   requires the `load.php` of every installed Altis module in the package
//!   manager's order, followed by the root project's custom entrypoints.
//!
//! [`lifecycle`] binds both to events and feeds them the host's
//! [`PackageManagerContext`].
//!
//! # Architecture
//!
//! ```text
//!           package manager
//!                  |
//!              lifecycle
//!             /         \
//!        scaffold     manifest
//!             \         /
//!               altis-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use altis_installer::{LifecycleEvent, Plugin, ProjectContext, Result};
//!
//! fn on_autoload_dump() -> Result<()> {
//!     let ctx = ProjectContext::from_composer("/srv/project")?;
//!     Plugin::default().handle(LifecycleEvent::PostAutoloadDump, &ctx)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod manifest;
pub mod package;
pub mod scaffold;

pub use config::{InstallerConfig, ManifestOptions};
pub use context::{PackageManagerContext, ProjectContext};
pub use error::{Error, Result};
pub use lifecycle::{
    ActionOutcome, LifecycleAction, LifecycleEvent, Plugin, actions_for, subscribed_events,
};
pub use manifest::{
    EntrySource, Manifest, ManifestEntry, ManifestReport, generate_manifest, write_manifest,
};
pub use package::{
    AltisConfig, Entrypoints, InstalledPackage, ModuleConfig, PackageExtra, RootExtra,
    RootProjectConfig,
};
pub use scaffold::{ScaffoldAction, ScaffoldReport, ScaffoldTarget, install_files};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_unknown_event_displays_name() {
        let error = Error::UnknownEvent {
            name: "pre-package-install".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown lifecycle event: pre-package-install");
    }

    #[test]
    fn error_action_failed_keeps_source() {
        use std::error::Error as _;

        let source = Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let error = Error::ActionFailed {
            event: "post-install-cmd".to_string(),
            action: "install-files".to_string(),
            source: Box::new(source),
        };

        let display = error.to_string();
        assert!(display.contains("install-files"));
        assert!(display.contains("post-install-cmd"));
        assert!(error.source().is_some());
    }
}
