#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const ADMIN_EMAIL: &str = "admin@crm.com";

/// Fresh CRM home with an rc file pointing at a private database
pub fn setup_test_env() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    fs::write(
        temp_dir.path().join("rc"),
        format!("data.location={}\nauth.user={}\n", db_path.display(), ADMIN_EMAIL),
    )
    .unwrap();
    temp_dir
}

pub fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("test.db")
}

pub fn crm_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("crm").unwrap();
    cmd.env("CRM_HOME", temp_dir.path());
    cmd.env_remove("CRM_USER");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Environment with the default administrator already created
pub fn setup_with_admin() -> TempDir {
    let temp_dir = setup_test_env();
    crm_cmd(&temp_dir)
        .args(["init", "--name", "Administrator", "--email", ADMIN_EMAIL, "--mobile", "(11) 99999-9999"])
        .assert()
        .success();
    temp_dir
}

/// Run a command with --json and parse stdout
pub fn json_output(temp_dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = crm_cmd(temp_dir).arg("--json").args(args).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    serde_json::from_str(&stdout).unwrap()
}
