//! Golden-file tests using test-fixtures/
//!
//! The `composer-site` fixture is a small Composer project with a mix of
//! modules, plain libraries, a relocated plugin, a missing package and custom
//! entrypoints. Generating its manifest must reproduce
//! `test-fixtures/expected/modules.php` byte for byte.

use altis_installer::{
    ActionOutcome, EntrySource, LifecycleEvent, PackageManagerContext, Plugin, ProjectContext,
};
use altis_test_utils::TestProject;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

/// Normalize line endings to LF for cross-platform comparison.
fn normalize_line_endings(s: &str) -> String {
    s.replace("\r\n", "\n")
}

/// Path to the test-fixtures directory (relative to the workspace root).
fn fixtures_dir() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // tests/integration -> ../../test-fixtures
    manifest_dir.join("../../test-fixtures")
}

fn load_expected_manifest() -> String {
    let path = fixtures_dir().join("expected/modules.php");
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read expected output at {}: {}", path.display(), e));
    normalize_line_endings(&content)
}

fn composer_site() -> TestProject {
    TestProject::from_fixture(&fixtures_dir().join("projects/composer-site"))
}

// ==========================================================================
// Fixture Validity Tests
// ==========================================================================

#[test]
fn fixture_has_composer_metadata() {
    let project = composer_site();
    project.assert_file_exists("composer.json");
    project.assert_file_exists("vendor/composer/installed.json");
    project.assert_file_exists("vendor/altis/cms/.build-script");
}

#[test]
fn fixture_reads_packages_in_installed_order() {
    let project = composer_site();
    let ctx = ProjectContext::from_composer(project.root()).unwrap();

    let names: Vec<&str> = ctx.packages().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["altis/core", "altis/cms", "acme/seo-plugin", "acme/library", "altis/ghost"]
    );
}

// ==========================================================================
// Golden Output Tests
// ==========================================================================

#[test]
fn manifest_matches_golden_file() {
    let project = composer_site();
    let ctx = ProjectContext::from_composer(project.root()).unwrap();

    Plugin::default()
        .handle(LifecycleEvent::PostAutoloadDump, &ctx)
        .unwrap();

    assert_eq!(
        normalize_line_endings(&project.read("vendor/modules.php")),
        load_expected_manifest()
    );
}

#[test]
fn manifest_entries_name_their_source() {
    let project = composer_site();
    let ctx = ProjectContext::from_composer(project.root()).unwrap();

    let outcomes = Plugin::default()
        .handle(LifecycleEvent::PostAutoloadDump, &ctx)
        .unwrap();
    let ActionOutcome::ManifestWritten(report) = &outcomes[0] else {
        panic!("expected a manifest outcome");
    };

    let sources: Vec<&EntrySource> = report.entries.iter().map(|e| &e.source).collect();
    assert_eq!(
        sources,
        vec![
            &EntrySource::Package("altis/core".into()),
            &EntrySource::Package("altis/cms".into()),
            &EntrySource::Package("acme/seo-plugin".into()),
            &EntrySource::CustomModule("search".into()),
            &EntrySource::CustomModule("legacy".into()),
        ]
    );
}

#[test]
fn manifest_is_stable_across_runs() {
    let project = composer_site();
    let plugin = Plugin::default();

    let ctx = ProjectContext::from_composer(project.root()).unwrap();
    plugin.handle(LifecycleEvent::PostAutoloadDump, &ctx).unwrap();
    let first = project.read("vendor/modules.php");

    let ctx = ProjectContext::from_composer(project.root()).unwrap();
    plugin.handle(LifecycleEvent::PostAutoloadDump, &ctx).unwrap();
    let second = project.read("vendor/modules.php");

    assert_eq!(first, second);
}
