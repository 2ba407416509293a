use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

/// The binary with user config pointed at a file that does not exist
fn filer(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("filer").unwrap();
    cmd.env("FILER_CONFIG", config_dir.path().join("absent.json"));
    cmd.env_remove("FILER_LOG");
    cmd
}

#[test]
fn test_help_lists_flags() {
    let config_dir = tempdir().unwrap();

    filer(&config_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--source"))
        .stdout(predicate::str::contains("--target"))
        .stdout(predicate::str::contains("--pattern"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_nonexistent_source_fails() {
    let config_dir = tempdir().unwrap();

    filer(&config_dir)
        .args(["--source", "/nonexistent/path/12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Directory does not exist"));
}

#[test]
fn test_invalid_pattern_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();

    filer(&dir)
        .arg("--source")
        .arg(dir.path())
        .args(["--pattern", "(["])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pattern"));
}

#[test]
fn test_empty_directory_fails() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("empty");
    fs::create_dir(&source).unwrap();

    filer(&dir)
        .arg("--source")
        .arg(&source)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files to process"));
}

#[test]
fn test_pattern_matching_nothing_fails() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("src");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("notes.txt"), "n").unwrap();
    fs::create_dir(source.join("photos.jpg")).unwrap();

    filer(&dir)
        .arg("--source")
        .arg(&source)
        .args(["--pattern", r"\.jpg$"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files to process"));
}

#[test]
fn test_uncreatable_target_fails_before_touching_files() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("src");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("a.txt"), "a").unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    filer(&dir)
        .arg("--source")
        .arg(&source)
        .arg("--target")
        .arg(blocker.join("kept"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create target directory"));

    assert!(source.join("a.txt").exists());
}

#[test]
fn test_broken_user_config_is_only_a_warning() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("empty");
    fs::create_dir(&source).unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{ broken").unwrap();

    Command::cargo_bin("filer")
        .unwrap()
        .env("FILER_CONFIG", &config)
        .arg("--source")
        .arg(&source)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Warning: Failed to load user config"))
        .stderr(predicate::str::contains("No files to process"));
}

#[test]
fn test_user_config_pattern_is_applied() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("src");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("a.txt"), "a").unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{ "pattern": "\\.png$" }"#).unwrap();

    Command::cargo_bin("filer")
        .unwrap()
        .env("FILER_CONFIG", &config)
        .arg("--source")
        .arg(&source)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files to process"));
}

#[test]
fn test_startup_error_is_logged_to_file() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("empty");
    fs::create_dir(&source).unwrap();
    let log_file = dir.path().join("logs").join("filer.log");

    filer(&dir)
        .arg("--source")
        .arg(&source)
        .arg("--log-file")
        .arg(&log_file)
        .assert()
        .failure();

    let log = fs::read_to_string(&log_file).unwrap();
    assert!(log.contains("startup failed"));
    assert!(log.contains("No files to process"));
}
