//! [`TestProject`] builder for Composer project scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Contents written for each scaffold template by [`TestProject::write_templates`].
pub const TEMPLATE_INDEX: &str = "<?php\n// index template\n";
pub const TEMPLATE_CONFIG: &str = "<?php\n// wp-config template\n";
pub const TEMPLATE_BUILD_SCRIPT: &str = "#!/bin/bash\n# build script template\n";

/// A temporary project root with a `vendor` directory and helpers for test
/// setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use altis_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.add_package("altis/core", true);
/// project.write_templates();
/// project.assert_file_exists("vendor/altis/core/load.php");
/// ```
pub struct TestProject {
    /// Held so the directory lives as long as the project.
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty project directory.
    ///
    /// The root is canonicalized so paths compare equal to what the
    /// installer resolves.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = dunce::canonicalize(temp_dir.path()).unwrap();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Create a project from a directory under `test-fixtures/`, copied so
    /// the fixture itself is never modified.
    pub fn from_fixture(fixture: &Path) -> Self {
        let project = Self::new();
        copy_dir(fixture, project.root());
        project
    }

    /// Return the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the vendor directory (which may not exist yet).
    pub fn vendor_dir(&self) -> PathBuf {
        self.root.join("vendor")
    }

    /// Write `content` to `path` (relative to the root), creating parents.
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Create a directory (relative to the root).
    pub fn mkdir(&self, path: &str) -> PathBuf {
        let full_path = self.root.join(path);
        fs::create_dir_all(&full_path).unwrap();
        full_path
    }

    /// Read a file (relative to the root).
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, path: &str) -> String {
        let full_path = self.root.join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Install a package directory under vendor, optionally with a `load.php`.
    pub fn add_package(&self, name: &str, with_load_file: bool) -> PathBuf {
        let dir = self.mkdir(&format!("vendor/{name}"));
        if with_load_file {
            fs::write(dir.join("load.php"), format!("<?php\n// {name}\n")).unwrap();
        }
        dir
    }

    /// Write the scaffold templates into `vendor/altis/cms`.
    pub fn write_templates(&self) -> PathBuf {
        self.write_file("vendor/altis/cms/index.php", TEMPLATE_INDEX);
        self.write_file("vendor/altis/cms/wp-config.php", TEMPLATE_CONFIG);
        self.write_file("vendor/altis/cms/.build-script", TEMPLATE_BUILD_SCRIPT);
        self.root.join("vendor/altis/cms")
    }

    /// Write the root `composer.json`.
    pub fn write_composer_json(&self, value: &Value) {
        self.write_file("composer.json", &serde_json::to_string_pretty(value).unwrap());
    }

    /// Write `vendor/composer/installed.json` in the Composer 2 format.
    pub fn write_installed_json(&self, packages: &[Value]) {
        let doc = json!({ "packages": packages, "dev": true });
        self.write_file(
            "vendor/composer/installed.json",
            &serde_json::to_string_pretty(&doc).unwrap(),
        );
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root.join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root.join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from)
        .unwrap_or_else(|e| panic!("Could not read fixture {}: {}", from.display(), e))
    {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}
