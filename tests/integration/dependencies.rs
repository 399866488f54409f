use std::collections::BTreeMap;

use release_tool::cache::{DirCache, NoopCache};
use release_tool::config::ProjectRename;
use release_tool::deps::diff::{rename_dependencies, updated_dependencies};
use release_tool::deps::remote::{GitRemote, Resolver};
use release_tool::deps::{ManifestFormat, parse_dependencies, parse_manifest};
use release_tool::git::GitRepo;

use crate::common::TestProject;

const MODULES_V1: &str = "# github.com/ghodss/yaml v0.0.0-20180820084758-aaaaaaaaaaaa
## explicit
github.com/ghodss/yaml
# github.com/pkg/errors v0.9.1
## explicit
github.com/pkg/errors
# example.com/internal v1.0.0
";

const MODULES_V2: &str = "# sigs.k8s.io/yaml v1.3.0-0.20220101000000-bbbbbbbbbbbb
## explicit
sigs.k8s.io/yaml
# github.com/pkg/errors v0.9.1
## explicit
github.com/pkg/errors
# example.com/internal v2.0.0
# golang.org/x/text v0.3.0-0.20200101000000-cccccccccccc
";

#[tokio::test]
async fn test_modules_txt_diff_with_rename_and_ignore() {
    let project = TestProject::new().unwrap();
    project.commit_file("vendor/modules.txt", MODULES_V1, "vendor v1").unwrap();
    project.git.tag("v1.0.0").unwrap();
    project.commit_file("vendor/modules.txt", MODULES_V2, "vendor v2").unwrap();
    project.git.tag("v2.0.0").unwrap();

    let repo = GitRepo::new(project.project_path());
    let mut previous = parse_dependencies(&repo, "v1.0.0", &BTreeMap::new()).await.unwrap();
    let mut current = parse_dependencies(&repo, "v2.0.0", &BTreeMap::new()).await.unwrap();

    let renames = BTreeMap::from([(
        "yaml".to_string(),
        ProjectRename {
            old: "github.com/ghodss/yaml".to_string(),
            new: "sigs.k8s.io/yaml".to_string(),
        },
    )]);
    rename_dependencies(&mut previous, &renames);

    let remote = GitRemote::new().unwrap();
    let cache = NoopCache;
    let resolver = Resolver::new(&remote, &cache);
    let ignored = vec!["example.com/internal".to_string()];
    let updated =
        updated_dependencies(&mut previous, &mut current, &ignored, &resolver).await.unwrap();

    let summary: Vec<_> = updated
        .iter()
        .map(|d| (d.name.as_str(), d.previous.as_str(), d.reference.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("golang.org/x/text", "", "cccccccccccc"),
            ("sigs.k8s.io/yaml", "aaaaaaaaaaaa", "bbbbbbbbbbbb"),
        ]
    );
}

#[tokio::test]
async fn test_go_mod_replace_applies_at_each_revision() {
    let project = TestProject::new().unwrap();
    project
        .commit_file(
            "go.mod",
            "module example.com/app\n\nrequire github.com/foo/bar v1.0.0\n",
            "initial",
        )
        .unwrap();
    project.git.tag("v1.0.0").unwrap();
    project
        .commit_file(
            "go.mod",
            "module example.com/app\n\nrequire github.com/foo/bar v1.0.0\n\n\
             replace github.com/foo/bar => github.com/foo/bar v0.0.0-20230101000000-0123456789ab\n",
            "pin fork",
        )
        .unwrap();

    let repo = GitRepo::new(project.project_path());
    let (format, before) = parse_manifest(&repo, "v1.0.0").await.unwrap();
    assert_eq!(format, ManifestFormat::GoMod);
    assert_eq!(before.get("github.com/foo/bar").unwrap().reference, "v1.0.0");

    let (_, after) = parse_manifest(&repo, "HEAD").await.unwrap();
    let bar = after.get("github.com/foo/bar").unwrap();
    assert_eq!(bar.reference, "0123456789ab");
    assert_eq!(bar.sha, "0123456789ab");
    assert_eq!(bar.git_url, "https://github.com/foo/bar");
}

/// Tags in a local dependency repository are resolved with `git ls-remote`
/// against its path, and the answers land in the cache.
#[tokio::test]
async fn test_vendor_conf_tags_resolved_through_ls_remote() {
    let project = TestProject::new().unwrap();
    let lib = project.create_dep_repo("lib").unwrap();
    lib.commit_as("lib.go", "package lib\n", "lib: initial", "Lib Author", "lib@example.com").unwrap();
    lib.git.tag_annotated("v1.0.0", "first").unwrap();
    lib.git.tag("v1.0.1").unwrap();
    lib.commit_as("lib.go", "package lib // v1.1\n", "lib: feature", "Lib Author", "lib@example.com")
        .unwrap();
    lib.git.tag("v1.1.0").unwrap();

    let url = lib.path.display().to_string();
    let other = project.create_dep_repo("other").unwrap();
    other.commit_as("o.go", "package o\n", "other: initial", "Other", "o@example.com").unwrap();
    other.git.tag("v1.0.0").unwrap();
    other.git.tag("v1.0.1").unwrap();
    let other_url = other.path.display().to_string();

    project
        .commit_file(
            "vendor.conf",
            &format!("example.com/lib v1.0.0 {url}\nexample.com/other v1.0.0 {other_url}\n"),
            "v1 deps",
        )
        .unwrap();
    project.git.tag("v1.0.0").unwrap();
    project
        .commit_file(
            "vendor.conf",
            &format!("example.com/lib v1.1.0 {url}\nexample.com/other v1.0.1 {other_url}\n"),
            "v2 deps",
        )
        .unwrap();
    project.git.tag("v2.0.0").unwrap();

    let repo = GitRepo::new(project.project_path());
    let mut previous = parse_dependencies(&repo, "v1.0.0", &BTreeMap::new()).await.unwrap();
    let mut current = parse_dependencies(&repo, "v2.0.0", &BTreeMap::new()).await.unwrap();

    let remote = GitRemote::new().unwrap();
    let cache = DirCache::new(project.cache_path().join("object")).unwrap();
    let resolver = Resolver::new(&remote, &cache);
    let updated = updated_dependencies(&mut previous, &mut current, &[], &resolver).await.unwrap();

    // `other` moved between two tags of the same commit
    assert_eq!(updated.len(), 1);
    let dep = &updated[0];
    assert_eq!(dep.name, "example.com/lib");
    assert_eq!(dep.previous, "v1.0.0");
    assert_eq!(dep.reference, "v1.1.0");

    let expected = lib.git.rev_parse("v1.1.0").unwrap();
    assert_eq!(dep.sha, &expected[..12]);
    let first = lib.git.rev_parse("v1.0.0").unwrap();
    assert_eq!(previous.get("example.com/lib").unwrap().sha, &first[..12]);

    let entries = std::fs::read_dir(project.cache_path().join("object")).unwrap().count();
    assert_eq!(entries, 4);
}
