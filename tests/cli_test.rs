//! Integration tests for the contentsync binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Repositories on a port nothing listens on.
const OFFLINE_CONFIG: &str = r#"
http:
  timeout: 2s
translations:
  owner: org
  repository: translations
  api_url: http://127.0.0.1:9
  raw_url: http://127.0.0.1:9
documentation:
  owner: org
  repository: docs
  api_url: http://127.0.0.1:9
  raw_url: http://127.0.0.1:9
"#;

fn contentsync(temp: &TempDir) -> Command {
    let config = temp.path().join("config.yml");
    fs::write(&config, OFFLINE_CONFIG).unwrap();

    let mut cmd = Command::new(cargo_bin("contentsync"));
    cmd.env_remove("CONTENTSYNC_LANGUAGE")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(&config)
        .arg("--cache-dir")
        .arg(temp.path().join("cache"));
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("contentsync"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("precache"))
        .stdout(predicate::str::contains("rate-limit"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("contentsync"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn get_offline_serves_embedded_readme() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    contentsync(&temp)
        .args(["get", "readme", "--show-tier"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Launcher"))
        .stdout(predicate::str::contains("from embedded tier"));
    Ok(())
}

#[test]
fn get_unknown_language_uses_default_language() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    contentsync(&temp)
        .args(["get", "locale", "--lang", "xx-XX"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Play\""));
    Ok(())
}

#[test]
fn get_rejects_unknown_kind() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    contentsync(&temp)
        .args(["get", "changelog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
    Ok(())
}

#[test]
fn missing_config_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let mut cmd = Command::new(cargo_bin("contentsync"));
    cmd.arg("--config")
        .arg(temp.path().join("nope.yml"))
        .args(["cache", "list"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn cache_list_json_on_empty_cache() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    contentsync(&temp)
        .args(["cache", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
    Ok(())
}

#[test]
fn rate_limit_clear_removes_persisted_cooldown() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let cache = temp.path().join("cache");
    fs::create_dir_all(&cache)?;
    fs::write(
        cache.join("appstate.json"),
        r#"{"rateLimitResetTime": "2999-01-01T00:00:00Z"}"#,
    )?;

    contentsync(&temp)
        .args(["rate-limit", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2999-01-01"));

    contentsync(&temp)
        .args(["rate-limit", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rate limit cleared"));

    contentsync(&temp)
        .args(["rate-limit", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not rate limited"));
    Ok(())
}
