use std::path::{Path, PathBuf};

use depresolve::build_model::*;
use depresolve::types::*;

fn model(declared: Vec<RawDependency>) -> ProjectBuildModel {
    ProjectBuildModel::new(declared, vec![PathBuf::from("/home/dev/.m2/repository")])
}

#[test]
fn test_declared_jar_path_wins() {
    let mut dep = RawDependency::new("org.example", "widgets", "1.0", "provided");
    dep.jar_path = Some("/libs/widgets.jar".to_string());
    let model = model(vec![dep.clone()]);

    let found = model
        .dependency_for_artifact(Path::new("/libs/widgets.jar"))
        .unwrap();
    assert_eq!(found, Some(dep));
}

#[test]
fn test_maven_repository_layout() {
    let model = model(vec![]);
    let found = model
        .dependency_for_artifact(Path::new(
            "/home/dev/.m2/repository/com/google/guava/guava/31.1-jre/guava-31.1-jre.jar",
        ))
        .unwrap()
        .expect("layout is recognized");

    assert_eq!(found.group_id, "com.google.guava");
    assert_eq!(found.artifact_id, "guava");
    assert_eq!(found.version, "31.1-jre");
    assert_eq!(found.scope, DEFAULT_SCOPE);
}

#[test]
fn test_maven_layout_with_classifier() {
    let model = model(vec![]);
    let found = model
        .dependency_for_artifact(Path::new(
            "/home/dev/.m2/repository/org/example/widgets/1.0/widgets-1.0-sources.jar",
        ))
        .unwrap()
        .unwrap();
    assert_eq!(found.unit_name(), "org.example/widgets");
}

#[test]
fn test_inferred_coordinates_adopt_declared_scope() {
    let mut declared = RawDependency::new("org.example", "widgets", "0.9", "test");
    declared.repo_uri = Some("https://github.com/example/widgets".to_string());
    let model = model(vec![declared]);

    let found = model
        .dependency_for_artifact(Path::new(
            "/home/dev/.m2/repository/org/example/widgets/1.0/widgets-1.0.jar",
        ))
        .unwrap()
        .unwrap();
    assert_eq!(found.version, "1.0");
    assert_eq!(found.scope, "test");
    assert_eq!(
        found.repo_uri.as_deref(),
        Some("https://github.com/example/widgets")
    );
}

#[test]
fn test_gradle_cache_layout() {
    let model = model(vec![]);
    let found = model
        .dependency_for_artifact(Path::new(
            "/home/dev/.gradle/caches/modules-2/files-2.1/org.slf4j/slf4j-api/1.7.36/6c62681a2f655b49963a5983b8b0950a6120ae14/slf4j-api-1.7.36.jar",
        ))
        .unwrap()
        .expect("gradle layout is recognized");

    assert_eq!(found.group_id, "org.slf4j");
    assert_eq!(found.artifact_id, "slf4j-api");
    assert_eq!(found.version, "1.7.36");
}

#[test]
fn test_unrecognized_archives() {
    let model = model(vec![]);
    assert_eq!(
        model
            .dependency_for_artifact(Path::new("/opt/app/lib/widgets.jar"))
            .unwrap(),
        None
    );
    // file name does not match artifact and version
    assert_eq!(
        model
            .dependency_for_artifact(Path::new(
                "/home/dev/.m2/repository/org/example/widgets/1.0/other-1.0.jar"
            ))
            .unwrap(),
        None
    );
    // too shallow to carry a group
    assert_eq!(
        model
            .dependency_for_artifact(Path::new("/home/dev/.m2/repository/widgets/1.0/widgets-1.0.jar"))
            .unwrap(),
        None
    );
}

#[test]
fn test_from_unit_uses_declared_dependencies() {
    let mut unit = SourceUnit::new("acme/app");
    let mut dep = RawDependency::new("acme", "core", "1.0", "compile");
    dep.jar_path = Some("/work/core/build/libs/core-1.0.jar".to_string());
    unit.dependencies.push(dep.clone());

    let model = ProjectBuildModel::from_unit(&unit, vec![]);
    assert_eq!(
        model
            .dependency_for_artifact(Path::new("/work/core/build/libs/core-1.0.jar"))
            .unwrap(),
        Some(dep)
    );
}
