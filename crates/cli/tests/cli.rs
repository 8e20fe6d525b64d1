use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn repo_context() -> Command {
    let mut cmd = Command::cargo_bin("repo-context").expect("binary");
    for key in [
        "REPO_CONTEXT_MAX_TOKENS",
        "REPO_CONTEXT_MAX_FILES",
        "REPO_CONTEXT_MAX_FILE_SIZE",
        "REPO_CONTEXT_DEPTH",
        "REPO_CONTEXT_CACHE_TTL",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

fn setup_repo() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("auth")).unwrap();
    fs::create_dir_all(root.join("node_modules/dep")).unwrap();
    fs::write(
        root.join("main.py"),
        "from auth.login import validate\n\nvalidate('bob')\n",
    )
    .unwrap();
    fs::write(
        root.join("auth/login.py"),
        "def validate(user):\n    return bool(user)\n",
    )
    .unwrap();
    fs::write(root.join("README.md"), "# Demo service\n").unwrap();
    fs::write(root.join("node_modules/dep/index.js"), "module.exports = {}\n").unwrap();
    temp
}

fn json_stdout(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is pure JSON")
}

#[test]
fn pack_prints_llm_ready_text() {
    let temp = setup_repo();

    repo_context()
        .arg("pack")
        .arg(temp.path())
        .args(["--prompt", "fix login validation"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Repository Analysis (3 relevant files"))
        .stdout(predicate::str::contains("--- auth/login.py (python) ---"))
        .stdout(predicate::str::contains("Configuration Files:\nREADME.md:\n# Demo service"))
        .stdout(predicate::str::contains("node_modules").not());
}

#[test]
fn pack_json_is_a_context_result() {
    let temp = setup_repo();

    let output = repo_context()
        .arg("pack")
        .arg(temp.path())
        .args(["--prompt", "login", "--json"])
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body = json_stdout(&output);
    let files = body["files"].as_array().expect("files array");
    assert_eq!(body["total_files"].as_u64(), Some(files.len() as u64));
    let token_sum: u64 = files
        .iter()
        .map(|f| f["tokens_estimate"].as_u64().unwrap_or(0))
        .sum();
    assert_eq!(body["total_tokens"].as_u64(), Some(token_sum));
    assert_eq!(body["truncated"], Value::Bool(false));
}

#[test]
fn max_files_flag_limits_selection() {
    let temp = setup_repo();

    let output = repo_context()
        .arg("pack")
        .arg(temp.path())
        .args(["--json", "--max-files", "1"])
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body = json_stdout(&output);
    assert_eq!(body["files"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["truncated"], Value::Bool(true));
}

#[test]
fn environment_knobs_apply_without_flags() {
    let temp = setup_repo();

    let output = repo_context()
        .env("REPO_CONTEXT_MAX_FILES", "2")
        .arg("pack")
        .arg(temp.path())
        .arg("--json")
        .output()
        .expect("command run");
    assert!(output.status.success());

    assert_eq!(json_stdout(&output)["total_files"].as_u64(), Some(2));
}

#[test]
fn zero_max_files_is_rejected() {
    let temp = setup_repo();

    repo_context()
        .arg("pack")
        .arg(temp.path())
        .args(["--max-files", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be at least 1"));
}

#[test]
fn rank_json_orders_candidates() {
    let temp = setup_repo();

    let output = repo_context()
        .arg("rank")
        .arg(temp.path())
        .args(["--prompt", "login", "--json", "--limit", "2"])
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body = json_stdout(&output);
    let candidates = body["candidates"].as_array().expect("candidates");
    let order: Vec<&str> = candidates
        .iter()
        .filter_map(|c| c["relative_path"].as_str())
        .collect();
    // README.md: markdown + config file + shallow + recent = 20; main.py: 18
    assert_eq!(order, vec!["README.md", "main.py"]);
    assert!(candidates.iter().all(|c| c["selected"] == Value::Bool(true)));
    assert!(body["keywords"]
        .as_array()
        .is_some_and(|k| k.iter().any(|v| v == "login")));
}

#[test]
fn rank_table_lists_fan_in() {
    let temp = setup_repo();

    repo_context()
        .arg("rank")
        .arg(temp.path())
        .args(["--prompt", "login"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Keywords: login"))
        .stdout(predicate::str::is_match(r"\*\s+\d+\.\d\s+1\s+\d+\s+auth/login\.py").unwrap());
}

#[test]
fn rank_limit_trims_rows_not_totals() {
    let temp = setup_repo();

    repo_context()
        .arg("rank")
        .arg(temp.path())
        .args(["--prompt", "login", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected 3 files"))
        .stdout(predicate::str::contains("Showing top 1 of 3 candidates"))
        .stdout(predicate::str::contains("auth/login.py").not());
}

#[test]
fn rank_missing_repository_fails() {
    let temp = tempdir().unwrap();

    repo_context()
        .arg("rank")
        .arg(temp.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to rank files"));
}

#[test]
fn pack_missing_repository_degrades() {
    let temp = tempdir().unwrap();

    repo_context()
        .arg("pack")
        .arg(temp.path().join("missing"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not analyze repository structure"));
}
