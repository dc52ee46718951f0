//! Result cache: TTL and mtime gating, independence from the patch path.

use anyhow::Result;
use mvn_assist::config::AssistConfig;
use mvn_assist::models::{DependencyTarget, GroupArtifact, ManifestModel, RawDependencyNode};
use mvn_assist::service::{DependencyService, ErrorPayload};
use mvn_assist::test_utils::{FixedClasspath, FixedModel, FixedResolver, effective, raw};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::common::{PomBuilder, TestProject};

fn graph() -> RawDependencyNode {
    RawDependencyNode::root(vec![
        raw("org.foo:bar:1.0", "compile").with_child(raw("org.baz:qux:2.0", "compile")),
    ])
}

fn service_with(config: &AssistConfig, resolver: Arc<FixedResolver>) -> Result<DependencyService> {
    DependencyService::new(
        config,
        resolver,
        Arc::new(FixedModel(ManifestModel::default())),
        Arc::new(FixedClasspath::new(effective(&[
            ("org.foo:bar:1.0", "compile"),
            ("org.baz:qux:2.0", "compile"),
        ]))),
    )
}

fn touch(path: &Path, seconds_ahead: u64) -> Result<()> {
    let file = File::options().write(true).open(path)?;
    file.set_modified(SystemTime::now() + Duration::from_secs(seconds_ahead))?;
    Ok(())
}

#[tokio::test]
async fn test_repeat_analysis_served_from_cache() -> Result<()> {
    let project = TestProject::new()?;
    project.write_pom(&PomBuilder::new("org.demo", "app", "1").dependency("org.foo", "bar", Some("1.0")).build())?;
    let resolver = Arc::new(FixedResolver::new(graph()));
    let service = service_with(&project.config(), Arc::clone(&resolver))?;

    let first = service.analyze(&project.pom_path()).await;
    let second = service.analyze(&project.pom_path()).await;

    assert_eq!(first, second);
    assert_eq!(resolver.calls(), 1);
    assert_eq!(service.cache_stats().results, 1);
    Ok(())
}

#[tokio::test]
async fn test_manifest_change_forces_recompute() -> Result<()> {
    let project = TestProject::new()?;
    project.write_pom(&PomBuilder::new("org.demo", "app", "1").build())?;
    let resolver = Arc::new(FixedResolver::new(graph()));
    let service = service_with(&project.config(), Arc::clone(&resolver))?;

    service.analyze(&project.pom_path()).await;
    touch(&project.pom_path(), 60)?;
    service.analyze(&project.pom_path()).await;

    assert_eq!(resolver.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_zero_ttl_never_serves_cached_payloads() -> Result<()> {
    let project = TestProject::new()?;
    project.write_pom(&PomBuilder::new("org.demo", "app", "1").build())?;
    let config = AssistConfig {
        cache_ttl_secs: 0,
        ..project.config()
    };
    let resolver = Arc::new(FixedResolver::new(graph()));
    let service = service_with(&config, Arc::clone(&resolver))?;

    service.analyze(&project.pom_path()).await;
    service.analyze(&project.pom_path()).await;
    assert_eq!(resolver.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_inserted_exclusion_invalidates_cached_analysis() -> Result<()> {
    let project = TestProject::new()?;
    project.write_pom(&PomBuilder::new("org.demo", "app", "1").dependency("org.foo", "bar", Some("1.0")).build())?;
    let resolver = Arc::new(FixedResolver::new(graph()));
    let service = service_with(&project.config(), Arc::clone(&resolver))?;

    service.analyze(&project.pom_path()).await;
    let payload = service
        .insert_exclusion(
            &project.pom_path(),
            &DependencyTarget::new("org.foo", "bar", Some("1.0")),
            &GroupArtifact::new("org.baz", "qux"),
        )
        .await;
    assert!(payload.success);
    assert_eq!(service.cache_stats().results, 0);

    service.analyze(&project.pom_path()).await;
    assert_eq!(resolver.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_failed_patch_leaves_cache_alone() -> Result<()> {
    let project = TestProject::new()?;
    project.write_pom(&PomBuilder::new("org.demo", "app", "1").dependency("org.foo", "bar", Some("1.0")).build())?;
    let resolver = Arc::new(FixedResolver::new(graph()));
    let service = service_with(&project.config(), Arc::clone(&resolver))?;

    let before = service.analyze(&project.pom_path()).await;
    let payload = service
        .insert_exclusion(
            &project.pom_path(),
            &DependencyTarget::new("org.missing", "bar", None),
            &GroupArtifact::new("org.baz", "qux"),
        )
        .await;
    assert!(!payload.success);

    assert_eq!(service.analyze(&project.pom_path()).await, before);
    assert_eq!(resolver.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_analysis_failure_is_a_payload_and_not_cached() -> Result<()> {
    let project = TestProject::new()?;
    project.write_pom(&PomBuilder::new("org.demo", "app", "1").build())?;
    // File collaborators with no exported graph on disk
    let service = project.service()?;

    let payload = service.analyze(&project.pom_path()).await;
    let error: ErrorPayload = serde_json::from_str(&payload)?;
    assert!(error.error.starts_with("Dependency analysis exception"));
    assert_eq!(service.cache_stats().results, 0);
    Ok(())
}

#[tokio::test]
async fn test_shutdown_clears_result_and_size_caches() -> Result<()> {
    let project = TestProject::new()?;
    project.write_pom(&PomBuilder::new("org.demo", "app", "1").build())?;
    project.repo().install_jar(&mvn_assist::test_utils::gav("org.foo:bar:1.0"), 64)?;
    let service = service_with(&project.config(), Arc::new(FixedResolver::new(graph())))?;

    let payload = service.analyze(&project.pom_path()).await;
    assert!(payload.contains("\"size\":64"));
    let stats = service.cache_stats();
    assert_eq!(stats.results, 1);
    assert_eq!(stats.sizes, 2);

    service.shutdown();
    let stats = service.cache_stats();
    assert_eq!((stats.results, stats.sizes), (0, 0));
    Ok(())
}
