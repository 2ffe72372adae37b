//! Integration Tests

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The shell running in `dir`, logging into `dir` instead of the home directory.
fn imcsh(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("imcsh");
    cmd.current_dir(dir)
        .arg(format!("--log={}", dir.join("imcsh.log").display()));
    cmd
}

#[test]
fn test_version() {
    let temp_dir = TempDir::new().unwrap();
    imcsh(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("imcsh version "));
}

#[test]
fn test_globalusage_then_quit() {
    let temp_dir = TempDir::new().unwrap();
    imcsh(temp_dir.path())
        .write_stdin("globalusage\nquit\n")
        .assert()
        .success()
        .stdout("IMCSH Version 1.1 created by Alexandra and Gabriela\nExiting IMCSH...\n");
}

#[test]
fn test_quit_without_jobs_does_not_ask() {
    let temp_dir = TempDir::new().unwrap();
    imcsh(temp_dir.path())
        .write_stdin("quit\necho never\n")
        .assert()
        .success()
        .stdout("Exiting IMCSH...\n");
}

#[test]
fn test_redirect_to_file() {
    let temp_dir = TempDir::new().unwrap();
    imcsh(temp_dir.path())
        .write_stdin("echo hello redirect > out.txt\nquit\n")
        .assert()
        .success()
        .stdout("Exiting IMCSH...\n");

    let contents = fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
    assert_eq!(contents, "hello redirect\n");
}

#[test]
fn test_exec_keyword_is_dropped() {
    let temp_dir = TempDir::new().unwrap();
    imcsh(temp_dir.path())
        .write_stdin("exec echo via exec\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("via exec\n"));
}

#[test]
fn test_missing_redirect_target() {
    let temp_dir = TempDir::new().unwrap();
    imcsh(temp_dir.path())
        .write_stdin("echo hi >\nquit\n")
        .assert()
        .success()
        .stdout("Error: Missing output file after '>'.\nExiting IMCSH...\n");
}

#[test]
fn test_command_not_found() {
    let temp_dir = TempDir::new().unwrap();
    imcsh(temp_dir.path())
        .write_stdin("imcsh-no-such-program --flag\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Command not found: imcsh-no-such-program\n",
        ));
}

#[test]
fn test_background_job_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    imcsh(temp_dir.path())
        .write_stdin("sleep 30 &\nbglist\nquit\nn\nbglist\nquit\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Process running in background (PID: "))
        .stdout(predicate::str::contains("Background Processes:\n"))
        .stdout(predicate::str::contains(" - Command: sleep\n").count(4))
        .stdout(predicate::str::contains(
            "are you sure you want to quit? [Y/n]",
        ))
        .stdout(predicate::str::contains("Quit canceled. Returning to shell.\n"))
        .stdout(predicate::str::ends_with("Exiting IMCSH...\n"));
}

#[test]
fn test_end_of_input_exits() {
    let temp_dir = TempDir::new().unwrap();
    imcsh(temp_dir.path())
        .write_stdin("bglist\n")
        .assert()
        .success()
        .stdout("No background processes are currently running.\n");
}

#[test]
fn test_command_string() {
    let temp_dir = TempDir::new().unwrap();
    imcsh(temp_dir.path())
        .args(&["-c", "echo from command string"])
        .assert()
        .success()
        .stdout("from command string\n");
}

#[test]
fn test_log_file_is_written() {
    let temp_dir = TempDir::new().unwrap();
    imcsh(temp_dir.path())
        .write_stdin("quit\n")
        .assert()
        .success();

    let log = fs::read_to_string(temp_dir.path().join("imcsh.log")).unwrap();
    assert!(log.contains("imcsh started up"));
    assert!(log.contains("imcsh has shut down"));
}
