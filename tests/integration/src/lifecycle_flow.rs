//! A full Composer run: install, then autoload dump, then a later update.

use altis_fs::NormalizedPath;
use altis_installer::{
    LifecycleEvent, PackageManagerContext, Plugin, ProjectContext, actions_for,
};
use altis_test_utils::TestProject;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn composer_site() -> TestProject {
    let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/projects/composer-site");
    TestProject::from_fixture(&fixture)
}

/// Fire every event the way `composer install` does.
fn composer_install(project: &TestProject, plugin: &Plugin) {
    for event in [LifecycleEvent::PostAutoloadDump, LifecycleEvent::PostInstallCmd] {
        let ctx = ProjectContext::from_composer(project.root()).unwrap();
        plugin.handle(event, &ctx).unwrap();
    }
}

#[test]
fn test_install_produces_bootable_project() {
    let project = composer_site();
    composer_install(&project, &Plugin::default());

    project.assert_file_exists("index.php");
    project.assert_file_exists("wp-config.php");
    project.assert_file_exists("content/themes");
    project.assert_file_contains(".gitignore", "/content/uploads");
    project.assert_file_contains("vendor/modules.php", "require_once __DIR__ . '/altis/core/load.php';");

    // The relocated plugin lived in content/plugins before scaffolding
    project.assert_file_exists("content/plugins/acme-seo/load.php");
}

#[test]
fn test_update_keeps_project_edits() {
    let project = composer_site();
    let plugin = Plugin::default();
    composer_install(&project, &plugin);

    project.write_file(".gitignore", "# Altis\n/vendor\n/node_modules\n");
    project.write_file(".build-script", "#!/bin/bash\nnpm ci && npm run build\n");
    project.write_file("index.php", "<?php // patched");

    let ctx = ProjectContext::from_composer(project.root()).unwrap();
    plugin.handle(LifecycleEvent::PostUpdateCmd, &ctx).unwrap();

    assert_eq!(project.read(".gitignore"), "# Altis\n/vendor\n/node_modules\n");
    assert_eq!(project.read(".build-script"), "#!/bin/bash\nnpm ci && npm run build\n");
    assert_eq!(project.read("index.php"), project.read("vendor/altis/cms/index.php"));
}

#[test]
fn test_manifest_tracks_removed_package() {
    let project = composer_site();
    let plugin = Plugin::default();
    composer_install(&project, &plugin);
    project.assert_file_contains("vendor/modules.php", "altis/cms/load.php");

    // Simulate `composer remove altis/cms`
    std::fs::remove_dir_all(project.root().join("vendor/altis/cms")).unwrap();

    let ctx = ProjectContext::from_composer(project.root()).unwrap();
    plugin.handle(LifecycleEvent::PostAutoloadDump, &ctx).unwrap();

    let manifest = project.read("vendor/modules.php");
    assert!(!manifest.contains("altis/cms"));
    assert!(manifest.contains("altis/core/load.php"));
}

#[test]
fn test_vendor_dir_is_resolved_from_context() {
    let project = composer_site();
    let ctx = ProjectContext::from_composer(project.root()).unwrap();

    assert_eq!(
        ctx.resolve_vendor_dir().unwrap(),
        NormalizedPath::new(project.root()).join("vendor")
    );
    assert!(!actions_for(LifecycleEvent::PostAutoloadDump).is_empty());
}
