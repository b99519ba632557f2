//! Integration tests for the PinVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! The PIN is supplied through `PINVAULT_PIN` so nothing prompts, and
//! each test writes a `.pinvault.toml` with the cheapest Argon2 settings.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const FAST_CONFIG: &str = "\
argon2_memory_kib = 8192
argon2_iterations = 1
argon2_parallelism = 1
";

/// Helper: get a Command pointing at the pinvault binary.
fn pinvault() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("pinvault").expect("binary should exist")
}

/// Helper: a project dir with a fast config.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child(".pinvault.toml").write_str(FAST_CONFIG).unwrap();
    tmp
}

/// Helper: run a subcommand inside `dir` with the given PIN.
fn run(dir: &TempDir, pin: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    pinvault()
        .args(args)
        .current_dir(dir.path())
        .env(pinvault::cli::PIN_ENV_VAR, pin)
        .assert()
}

#[test]
fn help_flag_shows_usage() {
    pinvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PIN-protected local password vault"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("verify"));
}

#[test]
fn version_flag_shows_version() {
    pinvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pinvault"));
}

#[test]
fn no_args_shows_help() {
    pinvault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn status_reports_uninitialized_vault() {
    let tmp = project();
    run(&tmp, "1234", &["status"])
        .success()
        .stdout(predicate::str::contains("not initialized"));
}

#[test]
fn get_before_init_fails() {
    let tmp = project();
    run(&tmp, "1234", &["get", "anything"])
        .failure()
        .stderr(predicate::str::contains("not found").or(predicate::str::contains("not initialized")));
}

#[test]
fn init_rejects_short_pin() {
    let tmp = project();
    run(&tmp, "12", &["init"])
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn init_twice_fails() {
    let tmp = project();
    run(&tmp, "1234", &["init"]).success();
    run(&tmp, "1234", &["init"])
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn full_entry_lifecycle() {
    let tmp = project();

    run(&tmp, "1234", &["init"])
        .success()
        .stdout(predicate::str::contains("Vault initialized"));
    tmp.child(".pinvault").assert(predicate::path::is_dir());

    run(
        &tmp,
        "1234",
        &[
            "add",
            "gmail",
            "alice@example.com",
            "hunter2",
            "--id",
            "gmail",
            "--website",
            "https://mail.google.com",
        ],
    )
    .success()
    .stdout(predicate::str::contains("Stored 'gmail' as gmail"));

    run(&tmp, "1234", &["status"])
        .success()
        .stdout(predicate::str::contains("1 entry"));

    run(&tmp, "1234", &["list"])
        .success()
        .stdout(predicate::str::contains("alice@example.com"))
        .stdout(predicate::str::contains("https://mail.google.com"))
        .stdout(predicate::str::contains("hunter2").not());

    run(&tmp, "1234", &["get", "gmail", "--password-only"])
        .success()
        .stdout("hunter2\n");

    run(&tmp, "9999", &["get", "gmail"])
        .failure()
        .stderr(predicate::str::contains("Authentication failed"));

    run(&tmp, "1234", &["delete", "gmail", "--force"])
        .success()
        .stdout(predicate::str::contains("Deleted entry 'gmail'"));

    run(&tmp, "1234", &["list"])
        .success()
        .stdout(predicate::str::contains("No entries"));
}

#[test]
fn add_reads_password_from_stdin() {
    let tmp = project();
    run(&tmp, "1234", &["init"]).success();

    pinvault()
        .args(["add", "bank", "bob", "--id", "bank"])
        .current_dir(tmp.path())
        .env(pinvault::cli::PIN_ENV_VAR, "1234")
        .write_stdin("piped-secret\n")
        .assert()
        .success();

    run(&tmp, "1234", &["get", "bank", "--password-only"])
        .success()
        .stdout("piped-secret\n");
}

#[test]
fn verify_reports_wrong_pin() {
    let tmp = project();
    run(&tmp, "1234", &["init"]).success();

    run(&tmp, "1234", &["verify"])
        .success()
        .stdout(predicate::str::contains("PIN is correct"));

    run(&tmp, "0000", &["verify"])
        .failure()
        .stderr(predicate::str::contains("attempt(s) remaining"));
}

#[test]
fn store_dir_flag_overrides_config() {
    let tmp = project();
    run(&tmp, "1234", &["--store-dir", "custom", "init"]).success();
    tmp.child("custom").child("pin_hash").assert(predicate::path::exists());
    tmp.child(".pinvault").assert(predicate::path::missing());
}

#[test]
fn completions_bash_generates_script() {
    pinvault()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pinvault"));
}

#[test]
fn completions_unknown_shell_fails() {
    pinvault()
        .args(["completions", "csh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown shell"));
}
