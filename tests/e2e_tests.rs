//! End-to-end tests for the requp CLI
//!
//! These tests verify:
//! - Requirements files are updated against a mock package index
//! - Dry-run mode leaves files unchanged
//! - JSON output schema
//! - Exit codes are correct for various scenarios

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command for the compiled binary, isolated from the caller's pip settings
fn requp() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_requp"));
    cmd.env_remove("PIP_INDEX_URL")
        .env_remove("PIP_EXTRA_INDEX_URL")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Mock index serving flask and django through the JSON Simple API
async fn start_index() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/flask/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"api-version": "1.1"},
            "name": "flask",
            "versions": ["0.9", "0.10", "0.10.1", "1.0rc1"],
            "files": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/simple/django/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"api-version": "1.0"},
            "name": "django",
            "files": [
                {"filename": "Django-1.8.tar.gz"},
                {"filename": "Django-1.11.29-py2.py3-none-any.whl"}
            ]
        })))
        .mount(&server)
        .await;
    server
}

fn index_url(server: &MockServer) -> String {
    format!("{}/simple", server.uri())
}

fn create_requirements(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("requirements.txt");
    fs::write(&path, content).unwrap();
    path
}

fn run_against(server: &MockServer, requirements: &Path, extra: &[&str]) -> Command {
    let mut cmd = requp();
    cmd.arg("-r")
        .arg(requirements)
        .arg("--index-url")
        .arg(index_url(server))
        .args(extra);
    cmd
}

mod update_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_updates_pinned_requirements() {
        let server = start_index().await;
        let temp_dir = tempfile::tempdir().unwrap();
        let requirements = create_requirements(&temp_dir, "flask==0.9\nDjango==1.8  # lts\n");

        run_against(&server, &requirements, &[])
            .assert()
            .success()
            .stdout(predicate::str::contains("Updated flask: 0.9 -> 0.10.1"))
            .stdout(predicate::str::contains("Updated Django: 1.8 -> 1.11.29"))
            .stdout(predicate::str::ends_with("All requirements up-to-date.\n"));

        assert_eq!(
            fs::read_to_string(&requirements).unwrap(),
            "flask==0.10.1\nDjango==1.11.29  # lts\n"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_pre_release_opt_in() {
        let server = start_index().await;
        let temp_dir = tempfile::tempdir().unwrap();
        let requirements = create_requirements(&temp_dir, "flask==0.9\n");

        run_against(&server, &requirements, &["--pre", "flask"])
            .assert()
            .success();

        assert_eq!(
            fs::read_to_string(&requirements).unwrap(),
            "flask==1.0rc1\n"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_force_pins_unpinned() {
        let server = start_index().await;
        let temp_dir = tempfile::tempdir().unwrap();
        let requirements = create_requirements(&temp_dir, "flask\n");

        run_against(&server, &requirements, &["--force"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Updated flask: Unknown -> 0.10.1"));

        assert_eq!(
            fs::read_to_string(&requirements).unwrap(),
            "flask==0.10.1\n"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_output_file() {
        let server = start_index().await;
        let temp_dir = tempfile::tempdir().unwrap();
        let requirements = create_requirements(&temp_dir, "flask==0.9\n");
        let output = temp_dir.path().join("pinned.txt");

        run_against(&server, &requirements, &["-o", output.to_str().unwrap()])
            .assert()
            .success();

        assert_eq!(fs::read_to_string(&requirements).unwrap(), "flask==0.9\n");
        assert_eq!(fs::read_to_string(&output).unwrap(), "flask==0.10.1\n");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unknown_package_warns() {
        let server = start_index().await;
        let temp_dir = tempfile::tempdir().unwrap();
        let requirements = create_requirements(&temp_dir, "no-such-pkg==1.0\nflask==0.9\n");

        run_against(&server, &requirements, &[])
            .assert()
            .success()
            .stderr(predicate::str::contains(
                "Skipping no-such-pkg (",
            ))
            .stderr(predicate::str::contains("line 1)"))
            .stdout(predicate::str::contains("Updated flask: 0.9 -> 0.10.1"));
    }
}

mod dry_run_tests {
    use super::*;

    /// Test that dry-run mode does not modify any files
    #[tokio::test(flavor = "multi_thread")]
    async fn test_dry_run_leaves_files_unchanged() {
        let server = start_index().await;
        let temp_dir = tempfile::tempdir().unwrap();
        let requirements = create_requirements(&temp_dir, "# web\nflask==0.9\n");

        run_against(&server, &requirements, &["--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("==> "))
            .stdout(predicate::str::contains("# web\nflask==0.10.1\n"))
            .stdout(predicate::str::contains("All requirements up-to-date.").not());

        assert_eq!(
            fs::read_to_string(&requirements).unwrap(),
            "# web\nflask==0.9\n",
            "requirements.txt should not be modified in dry-run mode"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_dry_run_changed_prints_only_changes() {
        let server = start_index().await;
        let temp_dir = tempfile::tempdir().unwrap();
        let requirements = create_requirements(&temp_dir, "# web\nflask==0.9\n");

        run_against(&server, &requirements, &["--dry-run-changed"])
            .assert()
            .success()
            .stdout(predicate::str::contains("flask==0.10.1"))
            .stdout(predicate::str::contains("# web").not());

        assert_eq!(
            fs::read_to_string(&requirements).unwrap(),
            "# web\nflask==0.9\n"
        );
    }
}

mod json_output_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_json_output_schema() {
        let server = start_index().await;
        let temp_dir = tempfile::tempdir().unwrap();
        let requirements = create_requirements(&temp_dir, "flask==0.9\n");

        let output = run_against(&server, &requirements, &["--json"])
            .output()
            .expect("Failed to execute command");
        assert!(output.status.success());

        let json: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");
        assert_eq!(json["dry_run"], false);
        assert_eq!(json["updated"], 1);
        assert_eq!(json["packages"]["flask"][0]["latest"], "0.10.1");
        assert_eq!(json["files"][0]["written"], true);
        assert!(json["warnings"].as_array().unwrap().is_empty());
    }
}

mod exit_code_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_nonzero_exit_code_when_updated() {
        let server = start_index().await;
        let temp_dir = tempfile::tempdir().unwrap();
        let requirements = create_requirements(&temp_dir, "flask==0.9\n");

        run_against(&server, &requirements, &["-z"]).assert().code(11);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_nonzero_exit_code_when_up_to_date() {
        let server = start_index().await;
        let temp_dir = tempfile::tempdir().unwrap();
        let requirements = create_requirements(&temp_dir, "flask==0.10.1\n");

        run_against(&server, &requirements, &["--nonzero-exit-code"])
            .assert()
            .code(10);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_index_server_error_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let temp_dir = tempfile::tempdir().unwrap();
        let requirements = create_requirements(&temp_dir, "flask==0.9\n");

        run_against(&server, &requirements, &[])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error:"));

        assert_eq!(fs::read_to_string(&requirements).unwrap(), "flask==0.9\n");
    }

    #[test]
    fn test_missing_requirements_file() {
        let temp_dir = tempfile::tempdir().unwrap();

        requp()
            .arg("-r")
            .arg(temp_dir.path().join("requirements.txt"))
            .assert()
            .code(2)
            .stderr(predicate::str::contains("requirements file not found"));
    }

    #[test]
    fn test_default_requirements_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();

        requp()
            .current_dir(temp_dir.path())
            .assert()
            .code(2)
            .stderr(predicate::str::contains("requirements.txt"));
    }

    #[test]
    fn test_invalid_index_url() {
        let temp_dir = tempfile::tempdir().unwrap();
        let requirements = create_requirements(&temp_dir, "flask==0.9\n");

        requp()
            .arg("-r")
            .arg(&requirements)
            .args(["--index-url", "not a url"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("invalid index URL"));
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        requp()
            .args(["--quiet", "--verbose"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("conflicting options"));
    }

    /// Test exit code with help flag
    #[test]
    fn test_exit_code_help() {
        requp()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("requirements"));
    }

    /// Test exit code with version flag
    #[test]
    fn test_exit_code_version() {
        requp()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}
