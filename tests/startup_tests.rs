//! Tests for main.rs startup validation (JWT_SECRET, token lifetimes).

use std::process::{Command, Output, Stdio};

fn run(envs: &[(&str, &str)], args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tokenpair"));
    command.env_remove("JWT_SECRET");
    for (key, value) in envs {
        command.env(key, value);
    }
    command
        .args(args)
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .output()
        .expect("Failed to run binary")
}

fn combined(output: &Output) -> String {
    // tracing logs to stdout by default
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn test_missing_jwt_secret_exits_with_error() {
    let output = run(&[], &[]);

    assert!(
        !output.status.success(),
        "Should exit with error when JWT_SECRET is missing"
    );
    let text = combined(&output);
    assert!(
        text.contains("JWT_SECRET") && text.contains("required"),
        "Should mention JWT_SECRET is required, got: {}",
        text
    );
}

#[test]
fn test_short_jwt_secret_exits_with_error() {
    let output = run(&[("JWT_SECRET", "too-short")], &[]);

    assert!(!output.status.success());
    let text = combined(&output);
    assert!(text.contains("shorter than"), "got: {}", text);
}

#[test]
fn test_missing_secret_file_exits_with_error() {
    let output = run(&[], &["--jwt-secret-file", "/nonexistent/tokenpair-secret"]);

    assert!(!output.status.success());
    let text = combined(&output);
    assert!(text.contains("Failed to read JWT secret file"), "got: {}", text);
}

#[test]
fn test_inverted_lifetimes_exit_with_error() {
    let output = run(
        &[("JWT_SECRET", "test-secret-that-is-long-enough!!")],
        &["--access-ttl", "3600", "--refresh-ttl", "60"],
    );

    assert!(!output.status.success());
    let text = combined(&output);
    assert!(text.contains("shorter than the refresh"), "got: {}", text);
}

#[test]
fn test_invalid_cookie_name_is_rejected_by_parser() {
    let output = run(
        &[("JWT_SECRET", "test-secret-that-is-long-enough!!")],
        &["--access-cookie", "bad;name"],
    );

    assert!(!output.status.success());
    let text = combined(&output);
    assert!(text.contains("invalid characters"), "got: {}", text);
}
