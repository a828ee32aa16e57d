use altis_fs::{NormalizedPath, RobustnessConfig, io};
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("modules.php"));

    io::write_atomic(&path, b"<?php\n", RobustnessConfig::default()).unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "<?php\n");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("modules.php");
    fs::write(&file_path, "stale").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"fresh", RobustnessConfig::default()).unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "fresh");
}

#[test]
fn test_write_atomic_without_fsync() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("a/b/file.txt"));
    let config = RobustnessConfig {
        enable_fsync: false,
        ..RobustnessConfig::default()
    };

    io::write_atomic(&path, b"deep", config).unwrap();
    assert_eq!(io::read_text(&path).unwrap(), "deep");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("target.txt"));

    io::write_text(&path, "content").unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {:?}", leftovers);
}

#[test]
fn test_read_text_nonexistent_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.txt"));
    let err = io::read_text(&path).unwrap_err();
    assert!(err.to_string().contains("missing.txt"));
}

#[test]
fn test_copy_file_replaces_destination() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("src/index.php").write_str("<?php // new").unwrap();
    temp.child("dest/index.php").write_str("<?php // old").unwrap();

    io::copy_file(
        &NormalizedPath::new(temp.child("src/index.php").path()),
        &NormalizedPath::new(temp.child("dest/index.php").path()),
    )
    .unwrap();

    temp.child("dest/index.php")
        .assert(predicate::str::diff("<?php // new"));
}

#[test]
fn test_copy_file_missing_source_reports_source_path() {
    let temp = assert_fs::TempDir::new().unwrap();

    let err = io::copy_file(
        &NormalizedPath::new(temp.child("src/wp-config.php").path()),
        &NormalizedPath::new(temp.child("wp-config.php").path()),
    )
    .unwrap_err();

    assert!(err.to_string().contains("src"));
    temp.child("wp-config.php").assert(predicate::path::missing());
}

#[test]
fn test_ensure_dir_reports_creation_once() {
    let temp = assert_fs::TempDir::new().unwrap();
    let dir = NormalizedPath::new(temp.child("content/plugins").path());

    assert!(io::ensure_dir(&dir).unwrap());
    assert!(!io::ensure_dir(&dir).unwrap());
    temp.child("content/plugins").assert(predicate::path::is_dir());
}

#[test]
fn test_ensure_dir_fails_when_a_file_is_in_the_way() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("content").write_str("not a directory").unwrap();

    let result = io::ensure_dir(&NormalizedPath::new(temp.child("content").path()));
    assert!(result.is_err());
}

#[test]
fn test_failed_write_leaves_no_temp_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    // A directory where the file should go makes the final rename fail
    temp.child("modules.php/keep").write_str("x").unwrap();
    let config = RobustnessConfig {
        rename_retry: std::time::Duration::from_millis(20),
        ..RobustnessConfig::default()
    };

    let result = io::write_atomic(
        &NormalizedPath::new(temp.child("modules.php").path()),
        b"<?php\n",
        config,
    );

    assert!(result.is_err());
    let leftovers: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
}

#[test]
fn test_successful_write_leaves_no_temp_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    io::write_text(&NormalizedPath::new(temp.child("modules.php").path()), "<?php\n").unwrap();

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["modules.php".to_string()]);
}
