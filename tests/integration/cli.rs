use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;

use crate::common::TestProject;

const GO_MOD_V1: &str = "module example.com/app

go 1.21

require (
\texample.com/lib v0.0.0-20230101000000-aaaaaaaaaaaa
\texample.com/stable v1.0.0
)
";

const GO_MOD_V2: &str = "module example.com/app

go 1.21

require (
\texample.com/lib v0.0.0-20230201000000-bbbbbbbbbbbb
\texample.com/stable v1.0.0
\texample.com/newdep v1.2.0
)
";

const RELEASE_V2: &str = r#"
commit = "v1.1.0"
previous = "v1.0.0"
project_name = "App"
github_repo = "example/app"
preface = """
A small release."""
"#;

/// Project with a v1.0.0 tag and a v1.1.0 tag that bumps one dependency and
/// adds another.
fn two_release_project() -> Result<TestProject> {
    let project = TestProject::new()?;
    project.commit_file("go.mod", GO_MOD_V1, "Initial module")?;
    project.git.tag("v1.0.0")?;
    project.commit_file("go.mod", GO_MOD_V2, "Add newdep and bump lib")?;
    project.git.tag("v1.1.0")?;
    Ok(project)
}

#[test]
fn test_help_lists_flags() {
    let mut cmd = Command::cargo_bin("release-tool").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry"))
        .stdout(predicate::str::contains("--linkify"))
        .stdout(predicate::str::contains("RELEASE_FILE"));
}

#[test]
fn test_missing_release_file_fails() {
    let project = TestProject::new().unwrap();
    let output = project.run_release(&["--dry", "does-not-exist.toml"]).unwrap();

    assert!(!output.success);
    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("Release file not found"), "stderr: {}", output.stderr);
}

#[test]
fn test_dry_run_prints_notes() {
    let project = two_release_project().unwrap();
    let release = project.write_release("v1.1.0.toml", RELEASE_V2).unwrap();

    let output = project.run_release(&["--dry", release.to_str().unwrap()]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("Welcome to the v1.1.0 release of App!")
        .assert_stdout_contains("A small release.")
        .assert_stdout_contains("* Test User")
        .assert_stdout_contains("1 commit</summary>")
        .assert_stdout_contains("Add newdep and bump lib")
        .assert_stdout_contains("* **example.com/lib**  aaaaaaaaaaaa -> bbbbbbbbbbbb")
        .assert_stdout_contains("* **example.com/newdep**  v1.2.0")
        .assert_stdout_contains("https://github.com/example/app/releases/tag/v1.0.0");

    assert!(!output.stdout.contains("example.com/stable"));
    assert!(!output.stdout.contains("Initial module"));
}

#[test]
fn test_without_dry_only_validates() {
    let project = two_release_project().unwrap();
    let release = project.write_release("v1.1.0.toml", RELEASE_V2).unwrap();

    let output = project.run_release(&[release.to_str().unwrap()]).unwrap();
    output.assert_success();
    assert!(output.stdout.is_empty(), "stdout: {}", output.stdout);
    assert!(output.stderr.contains("release complete!"), "stderr: {}", output.stderr);
}

#[test]
fn test_tag_flag_overrides_file_name() {
    let project = two_release_project().unwrap();
    let release = project.write_release("next.toml", RELEASE_V2).unwrap();

    let output =
        project.run_release(&["-n", "--tag", "v1.1.0-rc.1", release.to_str().unwrap()]).unwrap();
    output.assert_success().assert_stdout_contains("Welcome to the v1.1.0-rc.1 release of App!");
}

#[test]
fn test_custom_template() {
    let project = two_release_project().unwrap();
    let release = project.write_release("v1.1.0.toml", RELEASE_V2).unwrap();
    std::fs::write(
        project.project_path().join("NOTES.tera"),
        "{{ project_name }} {{ version }}: {{ dependencies | length }} dependency changes\n",
    )
    .unwrap();

    let output = project
        .run_release(&["-n", "--template", "NOTES.tera", release.to_str().unwrap()])
        .unwrap();
    output.assert_success().assert_stdout_contains("App 1.1.0: 2 dependency changes");
}

#[test]
fn test_missing_custom_template_fails() {
    let project = two_release_project().unwrap();
    let release = project.write_release("v1.1.0.toml", RELEASE_V2).unwrap();

    let output = project
        .run_release(&["-n", "--template", "missing.tera", release.to_str().unwrap()])
        .unwrap();
    assert!(!output.success);
    assert!(output.stderr.contains("missing.tera"), "stderr: {}", output.stderr);
}

#[test]
fn test_invalid_template_reports_error() {
    let project = two_release_project().unwrap();
    let release = project.write_release("v1.1.0.toml", RELEASE_V2).unwrap();
    std::fs::write(project.project_path().join("TEMPLATE"), "{% for x in %}\n").unwrap();

    let output = project.run_release(&["-n", release.to_str().unwrap()]).unwrap();
    assert!(!output.success);
    assert!(output.stderr.contains("Template error"), "stderr: {}", output.stderr);
}

#[test]
fn test_missing_cache_dir_fails() {
    let project = two_release_project().unwrap();
    let release = project.write_release("v1.1.0.toml", RELEASE_V2).unwrap();
    let missing = project.cache_path().join("nope");

    let output = project
        .run_release(&["-n", "--cache", missing.to_str().unwrap(), release.to_str().unwrap()])
        .unwrap();
    assert!(!output.success);
    assert!(output.stderr.contains("unable to use cache dir"), "stderr: {}", output.stderr);
}

#[test]
fn test_highlights_and_pre_release() {
    let project = two_release_project().unwrap();
    let release = project
        .write_release(
            "v1.1.0-beta.0.toml",
            r#"
commit = "v1.1.0"
previous = "v1.0.0"
project_name = "App"
github_repo = "example/app"
pre_release = true

[notes.speed]
title = "Faster builds"
description = "Builds are now cached."

[breaking.api]
commit = "abc1234"
description = "Removed the legacy API"
"#,
        )
        .unwrap();

    let output = project.run_release(&["-n", release.to_str().unwrap()]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("Welcome to the v1.1.0-beta.0 release of App!")
        .assert_stdout_contains("*This is a pre-release of App*")
        .assert_stdout_contains("* **Faster builds** Builds are now cached.")
        .assert_stdout_contains("* Removed the legacy API (abc1234)");
}

#[test]
fn test_linkify_commits() {
    let project = two_release_project().unwrap();
    let release = project.write_release("v1.1.0.toml", RELEASE_V2).unwrap();
    let full = project.git.rev_parse("v1.1.0").unwrap();

    let output = project.run_release(&["-n", "-l", release.to_str().unwrap()]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains(&format!("](https://github.com/example/app/commit/{full})"));

    let output = project.run_release(&["-n", "-l", "-g", release.to_str().unwrap()]).unwrap();
    output.assert_success().assert_stdout_contains(&format!("example/app@{full}"));
}

#[test]
fn test_changes_since_previous_tag_in_series() {
    let project = TestProject::new().unwrap();
    project.commit_file("go.mod", GO_MOD_V1, "Initial module").unwrap();
    project.git.tag("v1.0.0").unwrap();
    project.commit_file("go.mod", GO_MOD_V2, "Bump deps").unwrap();
    project.git.tag("v1.1.0-rc.1").unwrap();
    project.commit_file("README.md", "# App\n", "Add readme").unwrap();

    let release = project
        .write_release(
            "v1.1.0.toml",
            r#"
commit = "HEAD"
previous = "v1.0.0"
project_name = "App"
github_repo = "example/app"
"#,
        )
        .unwrap();

    let output = project.run_release(&["-n", release.to_str().unwrap()]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("2 commits</summary>")
        .assert_stdout_contains("1 commit since v1.1.0-rc.1</summary>");
}
