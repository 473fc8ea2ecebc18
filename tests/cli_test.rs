//! CLI contract tests
//!
//! Runs the binary on fixture files and checks output and exit codes.

use std::path::Path;
use std::process::{Command, Output};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_commit-review")
}

const ISSUES: &str = r#"[
  {"severity": "CRITICAL", "message": "Remove this unwrap", "rule_key": "rust:S1", "component_key": "proj:src/lib.rs", "line": 2},
  {"severity": "MINOR", "message": "Rename this", "rule_key": "rust:S2", "component_key": "proj:src/lib.rs", "line": 30},
  {"severity": "MAJOR", "message": "Legacy smell", "rule_key": "rust:S3", "component_key": "proj:src/lib.rs", "line": 1, "is_new": false}
]"#;

const MINOR_ONLY: &str = r#"[
  {"severity": "MINOR", "message": "Rename this", "rule_key": "rust:S2", "component_key": "proj:src/lib.rs", "line": 2}
]"#;

const DIFF: &str = r#"{
  "blob_url": "https://git.example.com/p/blob/abc",
  "files": {"src/lib.rs": [{"start": 1, "end": 5}]}
}"#;

fn setup(issues: &str, with_config: bool) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path().join("repo");
    std::fs::create_dir_all(repo.join("src")).unwrap();
    std::fs::write(repo.join("src/lib.rs"), "pub fn f() {\n    x.unwrap();\n}\n").unwrap();
    std::fs::write(dir.path().join("issues.json"), issues).unwrap();
    std::fs::write(dir.path().join("diff.json"), DIFF).unwrap();
    if with_config {
        std::fs::write(
            dir.path().join("commit-review.toml"),
            "instance_base_url = \"http://sonar:9000\"\n",
        )
        .unwrap();
    }
    dir
}

fn publish(dir: &Path, extra: &[&str]) -> Output {
    Command::new(bin())
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("COMMIT_REVIEW_INSTANCE_URL")
        .env_remove("COMMIT_REVIEW_PUBLIC_URL")
        .env_remove("COMMIT_REVIEW_MAX_GLOBAL_ISSUES")
        .env_remove("COMMIT_REVIEW_STATUS_NAME")
        .args([
            "publish",
            "--issues",
            "issues.json",
            "--diff",
            "diff.json",
            "--source-root",
            "repo",
            "--project-key",
            "proj",
        ])
        .args(extra)
        .output()
        .unwrap()
}

#[test]
fn test_json_output() {
    let dir = setup(ISSUES, true);
    let out = publish(dir.path(), &["--format", "json"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["status"], "failed");
    assert_eq!(json["total_new"], 2);
    assert_eq!(json["total_inline_reported"], 1);
    assert_eq!(json["statuses"][0]["name"], "sonarqube");

    let comments = json["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["file"], "src/lib.rs");
    assert_eq!(comments[0]["line"], 2);

    let summary = json["global_comments"][0].as_str().unwrap();
    assert!(summary.contains("[Rename this](https://git.example.com/p/blob/abc/src/lib.rs#L30)"));
    assert!(!summary.contains("Legacy smell"));
}

#[test]
fn test_status_name_flag() {
    let dir = setup(MINOR_ONLY, true);
    let out = publish(dir.path(), &["--format", "json", "--status-name", "code-review"]);
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["statuses"][0]["name"], "code-review");
}

#[test]
fn test_text_output() {
    let dir = setup(ISSUES, true);
    let out = publish(dir.path(), &[]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("src/lib.rs:2"));
    assert!(stdout.contains("Analysis reported 2 issues, with 1 critical, 1 minor"));
}

#[test]
fn test_fail_on_failed_exit_code() {
    let dir = setup(ISSUES, true);
    let out = publish(dir.path(), &["--fail-on-failed"]);
    assert_eq!(out.status.code(), Some(1));

    let dir = setup(MINOR_ONLY, true);
    let out = publish(dir.path(), &["--fail-on-failed"]);
    assert!(out.status.success());
}

#[test]
fn test_missing_base_url_fails() {
    let dir = setup(ISSUES, false);
    let out = publish(dir.path(), &[]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("public_base_url or instance_base_url"));
}

#[test]
fn test_base_url_from_env() {
    let dir = setup(MINOR_ONLY, false);
    let out = Command::new(bin())
        .current_dir(dir.path())
        .env("COMMIT_REVIEW_PUBLIC_URL", "https://sonar.example.com")
        .args([
            "publish", "--issues", "issues.json", "--diff", "diff.json",
            "--source-root", "repo", "--project-key", "proj", "--format", "json",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let body = json["comments"][0]["body"].as_str().unwrap();
    assert!(body.contains("https://sonar.example.com/coding_rules#rule_key=rust%3AS2"));
}

#[test]
fn test_init_writes_config() {
    let dir = tempfile::tempdir().unwrap();
    let out = Command::new(bin())
        .args(["init", dir.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success());

    let content = std::fs::read_to_string(dir.path().join("commit-review.toml")).unwrap();
    assert!(content.contains("max_global_issues = 10"));
}
