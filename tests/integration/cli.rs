//! End-to-end runs of the `mvn-assist` binary.

use anyhow::Result;
use mvn_assist::models::RawDependencyNode;
use mvn_assist::test_utils::{gav, raw};
use predicates::prelude::*;

use crate::common::{PomBuilder, TestProject};

/// app -> client:1.0 -> commons:1.2, app -> commons:1.1 (lost mediation)
fn setup() -> Result<TestProject> {
    let project = TestProject::new()?;
    project.write_pom(
        &PomBuilder::new("org.demo", "app", "1.0.0")
            .dependency("org.lib", "client", Some("1.0"))
            .dependency_with("org.junit", "junit", |d| d.version("4.13.2").scope("test"))
            .build(),
    )?;
    project.write_graph(&RawDependencyNode::root(vec![
        raw("org.lib:client:1.0", "compile").with_child(raw("org.c:commons:1.2", "compile")),
        raw("org.c:commons:1.1", "compile"),
        raw("org.junit:junit:4.13.2", "test").with_child(raw("org.hamcrest:hamcrest:1.3", "test")),
    ]))?;
    project.write_dependency_list(&[
        ("org.lib:client:1.0", "compile"),
        ("org.c:commons:1.2", "compile"),
        ("org.junit:junit:4.13.2", "test"),
    ])?;
    Ok(project)
}

#[test]
fn test_analyze_json_prints_projection() -> Result<()> {
    let project = setup()?;
    let output = project.command()?.args(["analyze", "--format", "json"]).output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let top = json["children"].as_array().unwrap();
    assert_eq!(top.len(), 3);
    assert_eq!(top[0]["artifactId"], "client");
    assert_eq!(top[0]["children"][0]["version"], "1.2");
    assert_eq!(top[1]["droppedByConflict"], true);
    // hamcrest is test scope below depth 1, filtered out of the export
    assert_eq!(top[2]["scope"], "test");
    assert!(top[2].get("children").is_none());
    Ok(())
}

#[test]
fn test_analyze_tree_marks_conflicts() -> Result<()> {
    let project = setup()?;
    project
        .command()?
        .args(["analyze", "--depth", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("├── org.lib:client:1.0 [compile]"))
        .stdout(predicate::str::contains("│   └── org.c:commons:1.2 [compile]"))
        .stdout(predicate::str::contains("org.c:commons:1.1 [compile] (dropped by conflict)"));
    Ok(())
}

#[test]
fn test_exclude_then_exclude_again() -> Result<()> {
    let project = setup()?;
    let args = [
        "exclude",
        "--dependency",
        "org.lib:client:1.0",
        "--exclusion",
        "org.c:commons",
        "--format",
        "json",
    ];

    project
        .command()?
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""message":"Exclusion added successfully""#));
    let patched = project.read_pom()?;
    assert!(patched.contains("<artifactId>commons</artifactId>"));

    project
        .command()?
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""message":"Exclusion already exists""#));
    assert_eq!(project.read_pom()?, patched);
    Ok(())
}

#[test]
fn test_exclude_unknown_dependency_fails() -> Result<()> {
    let project = setup()?;
    let before = project.read_pom()?;

    project
        .command()?
        .args(["exclude", "--dependency", "org.missing:lib", "--exclusion", "org.c:commons"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
    assert_eq!(project.read_pom()?, before);
    Ok(())
}

#[test]
fn test_exclude_rejects_malformed_coordinates() -> Result<()> {
    let project = setup()?;
    project
        .command()?
        .args(["exclude", "--dependency", "org.lib:client", "--exclusion", "commons"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid coordinate"));
    Ok(())
}

#[test]
fn test_conflicts_lists_dropped_release() -> Result<()> {
    let project = setup()?;
    let output = project.command()?.args(["conflicts", "--format", "json", "--dropped-only"]).output()?;
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["artifactId"], "commons");
    assert_eq!(entries[0]["version"], "1.1");
    Ok(())
}

#[test]
fn test_path_points_into_parent_pom() -> Result<()> {
    let project = setup()?;
    project.repo().install_pom(
        &gav("org.lib:client:1.0"),
        &PomBuilder::new("org.lib", "client", "1.0").dependency("org.c", "commons", Some("1.2")).build(),
    )?;

    let output = project
        .command()?
        .args(["path", "--dependency", "org.c:commons:1.2", "--format", "json"])
        .output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["success"], true);
    assert_eq!(json["parentArtifactId"], "client");
    assert_eq!(json["parentVersion"], "1.0");
    assert!(json["parentPomPath"].as_str().unwrap().ends_with("client-1.0.pom"));
    assert_eq!(json["lineNumber"], 10);
    assert_eq!(json["artifactIdStart"], 18);
    assert_eq!(json["artifactIdEnd"], 25);
    Ok(())
}

#[test]
fn test_path_for_direct_dependency_fails() -> Result<()> {
    let project = setup()?;
    project
        .command()?
        .args(["path", "--dependency", "org.lib:client"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dependency path not found"));
    Ok(())
}

#[test]
fn test_missing_manifest_is_reported() -> Result<()> {
    let project = setup()?;
    project
        .command()?
        .args(["analyze", "nowhere/pom.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest file not found"));
    Ok(())
}

#[test]
fn test_invalid_format_is_rejected() -> Result<()> {
    let project = setup()?;
    project
        .command()?
        .args(["analyze", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format 'yaml'"));
    Ok(())
}
