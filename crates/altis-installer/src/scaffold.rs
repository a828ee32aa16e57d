//! Project scaffolding
//!
//! Lays down the files and directories an Altis project needs at its root.
//! The two bootstrap files are generated and recopied on every run; the
//! build script, the ignore file and the content directories belong to the
//! project once they exist and are never touched again.
//!
//! Each step checks the destination on its own, so a run that failed half
//! way can simply be repeated.

use altis_fs::{NormalizedPath, ScaffoldPath, io};
use tracing::{debug, info};

use crate::error::Result;

/// Lines of the `.gitignore` created for new projects.
pub const GITIGNORE_ENTRIES: [&str; 7] = [
    "# Altis",
    "/wordpress",
    "/index.php",
    "/wp-config.php",
    "/chassis",
    "/vendor",
    "/content/uploads",
];

/// Source of the templates and the project root they are installed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldTarget {
    pub source: NormalizedPath,
    pub destination: NormalizedPath,
}

impl ScaffoldTarget {
    pub fn new(source: impl Into<NormalizedPath>, destination: impl Into<NormalizedPath>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// What a scaffold step did to its entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldAction {
    /// A template was copied over the destination.
    Written,
    /// The entry was missing and has been created.
    Created,
    /// The entry already existed and was left alone.
    Skipped,
}

/// Per-entry outcome of [`install_files`], in step order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub entries: Vec<(ScaffoldPath, ScaffoldAction)>,
}

impl ScaffoldReport {
    pub fn action(&self, path: ScaffoldPath) -> Option<ScaffoldAction> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == path)
            .map(|(_, action)| *action)
    }

    /// Entries that were written or created by this run.
    pub fn changed(&self) -> impl Iterator<Item = ScaffoldPath> + '_ {
        self.entries
            .iter()
            .filter(|(_, action)| *action != ScaffoldAction::Skipped)
            .map(|(entry, _)| *entry)
    }

    fn record(&mut self, path: ScaffoldPath, action: ScaffoldAction) {
        debug!(entry = %path, ?action, "Scaffold step done");
        self.entries.push((path, action));
    }
}

/// Bring the destination project root up to the required layout.
///
/// Any I/O failure stops the run and is returned as is; steps completed
/// before it stay in place.
pub fn install_files(target: &ScaffoldTarget) -> Result<ScaffoldReport> {
    let mut report = ScaffoldReport::default();

    for template in ScaffoldPath::TEMPLATES {
        let dest = target.destination.join(template.as_str());
        if template.is_user_owned() && dest.exists() {
            report.record(template, ScaffoldAction::Skipped);
            continue;
        }
        io::copy_file(&target.source.join(template.as_str()), &dest)?;
        report.record(template, ScaffoldAction::Written);
    }

    let gitignore = target.destination.join(ScaffoldPath::GitIgnore.as_str());
    if gitignore.exists() {
        report.record(ScaffoldPath::GitIgnore, ScaffoldAction::Skipped);
    } else {
        io::write_text(&gitignore, &GITIGNORE_ENTRIES.join("\n"))?;
        report.record(ScaffoldPath::GitIgnore, ScaffoldAction::Created);
    }

    for dir in ScaffoldPath::CONTENT_DIRS {
        let created = io::ensure_dir(&target.destination.join(dir.as_str()))?;
        let action = if created {
            ScaffoldAction::Created
        } else {
            ScaffoldAction::Skipped
        };
        report.record(dir, action);
    }

    info!(
        destination = %target.destination,
        changed = report.changed().count(),
        "Installed project files"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn target_with_templates(temp: &TempDir) -> ScaffoldTarget {
        let source = temp.path().join("vendor/altis/cms");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("index.php"), "<?php // index").unwrap();
        fs::write(source.join("wp-config.php"), "<?php // config").unwrap();
        fs::write(source.join(".build-script"), "#!/bin/bash").unwrap();
        ScaffoldTarget::new(source, temp.path())
    }

    #[test]
    fn test_first_run_creates_everything() {
        let temp = TempDir::new().unwrap();
        let report = install_files(&target_with_templates(&temp)).unwrap();

        assert_eq!(report.action(ScaffoldPath::Index), Some(ScaffoldAction::Written));
        assert_eq!(report.action(ScaffoldPath::BuildScript), Some(ScaffoldAction::Written));
        assert_eq!(report.action(ScaffoldPath::GitIgnore), Some(ScaffoldAction::Created));
        assert_eq!(report.action(ScaffoldPath::ThemesDir), Some(ScaffoldAction::Created));
        assert_eq!(report.changed().count(), 7);
    }

    #[test]
    fn test_second_run_only_rewrites_bootstrap_files() {
        let temp = TempDir::new().unwrap();
        let target = target_with_templates(&temp);
        install_files(&target).unwrap();

        let report = install_files(&target).unwrap();
        let changed: Vec<ScaffoldPath> = report.changed().collect();
        assert_eq!(changed, vec![ScaffoldPath::Index, ScaffoldPath::Config]);
    }

    #[test]
    fn test_gitignore_has_no_trailing_newline() {
        let temp = TempDir::new().unwrap();
        install_files(&target_with_templates(&temp)).unwrap();

        let content = fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert!(content.starts_with("# Altis\n"));
        assert!(content.ends_with("/content/uploads"));
    }
}
