//! CLI integration tests using the REAL lapd binary
//!
//! None of these reach AWS: they either fail before the upload or stop
//! after packaging with --package-only.

mod common;

use common::TestProject;
use predicates::prelude::*;

#[test]
fn test_help_output() {
    TestProject::new()
        .lapd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--function"))
        .stdout(predicate::str::contains("--purge"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_version_output() {
    TestProject::new()
        .lapd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lapd"));
}

#[test]
fn test_missing_function_flag_fails_before_any_work() {
    let project = TestProject::new();
    project.write_file("src/a.txt", "alpha");

    project
        .lapd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--function"));

    assert!(!project.file_exists("lapd.yml"));
    assert!(!project.file_exists("deploy.zip"));
}

#[test]
fn test_package_only_with_default_config() {
    let project = TestProject::new();
    project.write_file("src/a.txt", "alpha");
    project.write_file("src/__pycache__/b.pyc", "bytecode");

    project
        .lapd()
        .args(["-function", "default", "-package-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Packaged"));

    assert!(project.file_exists("lapd.yml"));
    assert_eq!(project.archive_entries("deploy.zip"), vec!["src/a.txt"]);
    assert_eq!(project.archive_entry("deploy.zip", "src/a.txt"), "alpha");
}

#[test]
fn test_default_config_contents() {
    let project = TestProject::new();

    project
        .lapd()
        .args(["--function", "default", "--package-only"])
        .assert()
        .success();

    let config = project.read_file("lapd.yml");
    assert!(config.contains("name: default"));
    assert!(config.contains("s3_bucket: lapd"));
    assert!(config.contains("package: deploy.zip"));
    assert!(config.contains("local_package_name: deploy.zip"));
    assert!(config.contains("relative_path: src"));
    assert!(config.contains(".venv/lib/python3.11/site-packages/"));
}

#[test]
fn test_custom_config_and_output_directory() {
    let project = TestProject::new();
    project.write_file(
        "deploy/lapd.yml",
        r#"functions:
  - name: api
    filter:
      - base_path: "."
        relative_path: handlers
        include: ["*.py"]
        exclude: ["test_*"]
      - base_path: "vendor/"
        relative_path: "."
        include: ["*"]
        exclude: []
s3_bucket: artifacts
package: api.zip
local_package_name: dist/api.zip
"#,
    );
    project.write_file("handlers/app.py", "print('app')");
    project.write_file("handlers/test_app.py", "assert True");
    project.write_file("handlers/README.md", "docs");
    project.write_file("vendor/requests/__init__.py", "");

    project
        .lapd()
        .args(["--config", "deploy/lapd.yml", "--function", "api", "--package-only"])
        .assert()
        .success();

    assert_eq!(
        project.archive_entries("dist/api.zip"),
        vec!["handlers/app.py", "requests/__init__.py"]
    );
}

#[test]
fn test_archive_under_packaged_tree_is_not_packed_into_itself() {
    let project = TestProject::new();
    project.write_file(
        "lapd.yml",
        r#"functions:
  - name: handler
    filter:
      - base_path: "."
        relative_path: "."
        include: ["*"]
        exclude: ["lapd.yml", "*.[^pz]*"]
s3_bucket: artifacts
package: handler.zip
local_package_name: dist/deploy.zip
"#,
    );
    project.write_file("app.py", "print('app')");
    project.write_file("notes(draft).md", "scratch");
    project.write_file("lib/util(v2).py", "");

    for _ in 0..2 {
        project
            .lapd()
            .args(["--function", "handler", "--package-only"])
            .assert()
            .success();
    }

    assert_eq!(
        project.archive_entries("dist/deploy.zip"),
        vec!["app.py", "lib/util(v2).py"]
    );
}

#[test]
fn test_config_path_from_env() {
    let project = TestProject::new();
    project.write_file(
        "custom.yml",
        "functions:\n  - name: worker\n    filter: []\ns3_bucket: b\npackage: k\nlocal_package_name: worker.zip\n",
    );

    project
        .lapd()
        .env("LAPD_CONFIG", "custom.yml")
        .args(["--function", "worker", "--package-only"])
        .assert()
        .success();

    assert!(project.file_exists("worker.zip"));
    assert!(!project.file_exists("lapd.yml"));
}

#[test]
fn test_unknown_function_fails() {
    let project = TestProject::new();

    project
        .lapd()
        .args(["--function", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'nope' is not defined"));

    // The default configuration is still created, but nothing is packaged
    assert!(project.file_exists("lapd.yml"));
    assert!(!project.file_exists("deploy.zip"));
}

#[test]
fn test_malformed_config_fails() {
    let project = TestProject::new();
    project.write_file("lapd.yml", "functions: [unclosed");

    project
        .lapd()
        .args(["--function", "default"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse configuration file"));

    assert_eq!(project.read_file("lapd.yml"), "functions: [unclosed");
}

#[test]
fn test_duplicate_function_names_fail() {
    let project = TestProject::new();
    project.write_file(
        "lapd.yml",
        "functions:\n  - name: api\n  - name: api\ns3_bucket: b\npackage: k\nlocal_package_name: out.zip\n",
    );

    project
        .lapd()
        .args(["--function", "api"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("defined more than once"));
}

#[test]
fn test_archive_collision_fails() {
    let project = TestProject::new();
    project.write_file(
        "lapd.yml",
        r#"functions:
  - name: api
    filter:
      - base_path: "."
        relative_path: src
        include: ["*"]
      - base_path: "."
        relative_path: src
        include: ["*.txt"]
s3_bucket: b
package: k
local_package_name: out.zip
"#,
    );
    project.write_file("src/a.txt", "alpha");

    project
        .lapd()
        .args(["--function", "api", "--package-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("src/a.txt"));
}
