//! CLI integration tests for the confluence-mcp-server binary.
//!
//! None of these reach a real Confluence: they cover help output, the tool
//! listing and configuration failures.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command for the binary, isolated from the caller's environment and files.
fn confluence_mcp(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("confluence-mcp-server").unwrap();
    cmd.current_dir(dir.path())
        .env("CONFLUENCE_MCP_CONFIG_DIR", dir.path())
        .env_remove("CONFLUENCE_URL")
        .env_remove("CONFLUENCE_PERSONAL_ACCESS_TOKEN")
        .env_remove("CONFLUENCE_TIMEOUT_SECS")
        .env_remove("CONFLUENCE_MCP_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    confluence_mcp(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("call"))
        .stdout(predicate::str::contains("tools"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    confluence_mcp(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("confluence-mcp-server"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Tools
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_tools_needs_no_configuration() {
    let dir = TempDir::new().unwrap();
    confluence_mcp(&dir)
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("create_page"))
        .stdout(predicate::str::contains("get_page_attachments"));
}

#[test]
fn test_tools_json_includes_schemas() {
    let dir = TempDir::new().unwrap();
    let output = confluence_mcp(&dir)
        .args(["tools", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tools = value["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 15);
    assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_serve_without_url_fails() {
    let dir = TempDir::new().unwrap();
    confluence_mcp(&dir)
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFLUENCE_URL environment variable not set"));
}

#[test]
fn test_default_command_is_serve() {
    let dir = TempDir::new().unwrap();
    confluence_mcp(&dir)
        .env("CONFLUENCE_URL", "https://wiki.example.com")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "CONFLUENCE_PERSONAL_ACCESS_TOKEN environment variable not set",
        ));
}

#[test]
fn test_env_file_supplies_settings() {
    let dir = TempDir::new().unwrap();
    let env_file = dir.path().join("custom.env");
    std::fs::write(
        &env_file,
        "CONFLUENCE_URL=http://127.0.0.1:9\nCONFLUENCE_PERSONAL_ACCESS_TOKEN=t\nCONFLUENCE_TIMEOUT_SECS=2\n",
    )
    .unwrap();

    confluence_mcp(&dir)
        .arg("--env-file")
        .arg(&env_file)
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to initialize Confluence client"));
}

#[test]
fn test_missing_explicit_config_file_fails() {
    let dir = TempDir::new().unwrap();
    confluence_mcp(&dir)
        .args(["--config", "does-not-exist.toml", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config file"));
}

#[test]
fn test_config_file_with_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("confluence-mcp.toml"),
        "[confluence]\nurl = \"https://wiki\"\npassword = \"x\"\n",
    )
    .unwrap();

    confluence_mcp(&dir).arg("check").assert().failure();
}

#[test]
fn test_call_rejects_non_object_args() {
    let dir = TempDir::new().unwrap();
    confluence_mcp(&dir)
        .args(["call", "get_spaces", "--args", "[1, 2]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--args must be a JSON object"));
}
