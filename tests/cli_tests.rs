//! Integration tests for the stormwatch CLI

use std::process::Command;

/// Test that the CLI shows help with the explicit help flag
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("stormwatch"));
    assert!(stdout.contains("severe weather"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("test"));
    assert!(stdout.contains("register"));
}

/// Test that a scheduled check without an API key aborts with a
/// configuration error before processing any user
#[test]
fn test_check_requires_api_key() {
    let output = Command::new("cargo")
        .args(["run", "--", "check"])
        .env_remove("STORMWATCH__WEATHER__API_KEY")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Configuration error"),
        "Expected configuration error, got: {stderr}"
    );
}

/// Test that the test-notification path rejects empty input before any
/// network call
#[test]
fn test_notification_empty_city_rejected() {
    let output = Command::new("cargo")
        .args([
            "run", "--", "test", "--city", "", "--phone", "+2348012345678", "--email",
            "user@example.com",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Please fill in all fields"),
        "Expected validation message, got: {stderr}"
    );
}

/// Test that registration rejects a malformed phone number with a specific
/// message
#[test]
fn test_register_bad_phone_rejected() {
    let output = Command::new("cargo")
        .args([
            "run", "--", "register", "--city", "Abuja", "--phone", "not-a-phone", "--email",
            "user@example.com",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid phone number format"),
        "Expected phone validation message, got: {stderr}"
    );
}

/// Test that registration rejects a malformed email with a specific message
#[test]
fn test_register_bad_email_rejected() {
    let output = Command::new("cargo")
        .args([
            "run", "--", "register", "--city", "Abuja", "--phone", "+2348012345678", "--email",
            "not-an-email",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid email format"),
        "Expected email validation message, got: {stderr}"
    );
}
