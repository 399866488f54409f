use anyhow::Result;

use crate::common::{TestDepRepo, TestProject};

struct Fixture {
    project: TestProject,
    lib: TestDepRepo,
}

fn vendor_conf(sha: &str, url: &str) -> String {
    format!("# pinned dependencies\nexample.com/lib {sha} {url}\n")
}

fn release_file(commit: &str, previous: &str) -> String {
    format!(
        r#"
commit = "{commit}"
previous = "{previous}"
project_name = "App"
github_repo = "example/app"
match_deps = "^example.com/(lib)$"
"#
    )
}

/// Project at v1.1.0 pinning a local `lib` repository one commit ahead of v1.0.0.
fn fixture() -> Result<Fixture> {
    let project = TestProject::new()?;
    let lib = project.create_dep_repo("lib")?;
    let url = lib.path.display().to_string();

    let first = lib.commit_as("lib.go", "package lib\n", "lib: initial", "Lib Author", "lib@example.com")?;
    project.commit_file("vendor.conf", &vendor_conf(&first, &url), "Pin lib")?;
    project.git.tag("v1.0.0")?;

    let second =
        lib.commit_as("lib.go", "package lib // fixed\n", "lib: fix parser", "Lib Author", "lib@example.com")?;
    project.commit_file("vendor.conf", &vendor_conf(&second, &url), "Bump lib")?;
    project.git.commit_as("Tidy up", "Old Name", "old@example.com")?;
    project.git.tag("v1.1.0")?;

    std::fs::write(project.project_path().join(".mailmap"), "New Name <old@example.com>\n")?;

    Ok(Fixture {
        project,
        lib,
    })
}

#[test]
fn test_matched_dependency_changelog_and_contributors() {
    let Fixture {
        project,
        lib,
    } = fixture().unwrap();
    let release = project.write_release("v1.1.0.toml", &release_file("v1.1.0", "v1.0.0")).unwrap();

    let output = project.run_release(&["-n", release.to_str().unwrap()]).unwrap();
    let second = lib.git.rev_parse_head().unwrap();
    output
        .assert_success()
        .assert_stdout_contains("2 commits</summary>")
        .assert_stdout_contains("1 commit in lib</summary>")
        .assert_stdout_contains("lib: fix parser")
        .assert_stdout_contains("* Lib Author\n* New Name\n* Test User")
        .assert_stdout_contains("* **example.com/lib**  ")
        .assert_stdout_contains(&second[..12]);

    assert!(!output.stdout.contains("Old Name"), "stdout: {}", output.stdout);
    assert!(!output.stdout.contains("lib: initial"), "stdout: {}", output.stdout);
}

#[test]
fn test_clone_cache_is_reused_and_fetched() {
    let Fixture {
        project,
        lib,
    } = fixture().unwrap();
    let cache = project.cache_path().to_str().unwrap().to_string();
    let release = project.write_release("v1.1.0.toml", &release_file("v1.1.0", "v1.0.0")).unwrap();

    let output = project.run_release(&["-n", "--cache", &cache, release.to_str().unwrap()]).unwrap();
    output.assert_success().assert_stdout_contains("lib: fix parser");
    assert!(project.cache_path().join("git").join("lib").join(".git").is_dir());
    assert!(project.cache_path().join("object").is_dir());

    // A new upstream commit the cached clone has never seen
    let url = lib.path.display().to_string();
    let third =
        lib.commit_as("lib.go", "package lib // v3\n", "lib: second fix", "Lib Author", "lib@example.com").unwrap();
    project.commit_file("vendor.conf", &vendor_conf(&third, &url), "Bump lib again").unwrap();
    project.git.tag("v1.2.0").unwrap();

    let release = project.write_release("v1.2.0.toml", &release_file("v1.2.0", "v1.1.0")).unwrap();
    let output = project.run_release(&["-n", "--cache", &cache, release.to_str().unwrap()]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("1 commit in lib</summary>")
        .assert_stdout_contains("lib: second fix");
    assert!(!output.stdout.contains("lib: fix parser"), "stdout: {}", output.stdout);
}

#[test]
fn test_unmatched_dependencies_are_not_cloned() {
    let Fixture {
        project,
        ..
    } = fixture().unwrap();
    let cache = project.cache_path().to_str().unwrap().to_string();
    let release = project
        .write_release(
            "v1.1.0.toml",
            r#"
commit = "v1.1.0"
previous = "v1.0.0"
project_name = "App"
github_repo = "example/app"
match_deps = "^github.com/"
"#,
        )
        .unwrap();

    let output = project.run_release(&["-n", "--cache", &cache, release.to_str().unwrap()]).unwrap();
    output.assert_success().assert_stdout_contains("* **example.com/lib**");
    assert!(!output.stdout.contains(" in lib</summary>"));
    assert!(!project.cache_path().join("git").join("lib").exists());
}

#[test]
fn test_invalid_match_deps_pattern() {
    let Fixture {
        project,
        ..
    } = fixture().unwrap();
    let release = project
        .write_release(
            "v1.1.0.toml",
            r#"
commit = "v1.1.0"
previous = "v1.0.0"
project_name = "App"
match_deps = "^example.com/(lib"
"#,
        )
        .unwrap();

    let output = project.run_release(&["-n", release.to_str().unwrap()]).unwrap();
    assert!(!output.success);
    assert!(output.stderr.contains("match_deps"), "stderr: {}", output.stderr);
}
