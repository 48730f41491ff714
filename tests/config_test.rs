use std::path::Path;

use depresolve::config::*;
use depresolve::errors::ResolveError;
use depresolve::types::{ArtifactRepository, RepositoryAuth};
use tempfile::TempDir;

#[test]
fn test_default_config_points_at_central() {
    let config = ResolverConfig::default();
    assert_eq!(config.central_url, MAVEN_CENTRAL_URL);
    assert!(config.repositories.is_empty());
    assert_eq!(config.fetch_timeout_secs, 30);
}

#[test]
fn test_candidate_repositories_start_with_central() {
    let config = ResolverConfig {
        repositories: vec![
            ArtifactRepository::new("corp", "https://repo.corp.test/maven"),
            ArtifactRepository::new("snapshots", "https://repo.corp.test/snapshots"),
        ],
        ..ResolverConfig::default()
    };
    let ids: Vec<String> = config
        .candidate_repositories()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["central", "corp", "snapshots"]);
}

#[test]
fn test_load_missing_config_returns_default() {
    let dir = TempDir::new().unwrap();
    let config = load_config(dir.path()).unwrap();
    assert_eq!(config, ResolverConfig::default());
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let mut repo = ArtifactRepository::new("corp", "https://repo.corp.test/maven");
    repo.auth = Some(RepositoryAuth {
        username: "ci".to_string(),
        password: "secret".to_string(),
    });
    let config = ResolverConfig {
        repositories: vec![repo],
        fetch_timeout_secs: 10,
        ..ResolverConfig::default()
    };
    save_config(dir.path(), &config).unwrap();
    assert!(get_config_path(dir.path()).exists());
    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(get_depresolve_dir(dir.path())).unwrap();
    std::fs::write(
        get_config_path(dir.path()),
        r#"{"repositories": [{"id": "corp", "url": "https://repo.corp.test"}]}"#,
    )
    .unwrap();

    let config = load_config(dir.path()).unwrap();
    assert_eq!(config.central_url, MAVEN_CENTRAL_URL);
    assert_eq!(config.repositories.len(), 1);
    assert!(config.repositories[0].auth.is_none());
}

#[test]
fn test_invalid_config_is_config_error() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(get_depresolve_dir(dir.path())).unwrap();
    std::fs::write(get_config_path(dir.path()), "{ not json").unwrap();

    let err = load_config(dir.path()).unwrap_err();
    assert!(matches!(err, ResolveError::Config { .. }));
}

#[test]
fn test_overrides_path_defaults_inside_depresolve_dir() {
    let root = Path::new("/work");
    let config = ResolverConfig::default();
    assert_eq!(
        config.overrides_path(root),
        Path::new("/work/.depresolve/overrides.toml")
    );

    let custom = ResolverConfig {
        overrides_file: Some("build/overrides.toml".to_string()),
        ..ResolverConfig::default()
    };
    assert_eq!(
        custom.overrides_path(root),
        Path::new("/work/build/overrides.toml")
    );
}

#[test]
fn test_local_repository_roots_are_project_relative() {
    let config = ResolverConfig {
        local_repositories: vec!["vendor/m2".to_string()],
        ..ResolverConfig::default()
    };
    let roots = config.local_repository_roots(Path::new("/work"));
    assert_eq!(roots[0], Path::new("/work/vendor/m2"));
}

#[test]
fn test_missing_overrides_file_is_empty_table() {
    let dir = TempDir::new().unwrap();
    let table = load_overrides(&dir.path().join("overrides.toml")).unwrap();
    assert!(table.is_empty());
}

#[test]
fn test_load_overrides_keeps_file_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("overrides.toml");
    std::fs::write(
        &path,
        r#"
[[override]]
pattern = "^org\\.example/special$"
url = "https://git.example.org/special"

[[override]]
pattern = "^org\\.example/(.*)$"
url = "https://github.com/example/${1}"
"#,
    )
    .unwrap();

    let table = load_overrides(&path).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.lookup("org.example/special").as_deref(),
        Some("https://git.example.org/special")
    );
    assert_eq!(
        table.lookup("org.example/widgets").as_deref(),
        Some("https://github.com/example/widgets")
    );
    assert_eq!(table.lookup("com.other/thing"), None);
}

#[test]
fn test_invalid_override_pattern_is_config_error() {
    let err = parse_overrides(
        r#"
[[override]]
pattern = "^(unclosed"
url = "https://example.org"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ResolveError::Config { .. }));
}

#[test]
fn test_init_project_writes_defaults_and_override_template() {
    let dir = TempDir::new().unwrap();
    let path = init_project(dir.path(), false).unwrap();

    assert_eq!(path, get_config_path(dir.path()));
    assert_eq!(load_config(dir.path()).unwrap(), ResolverConfig::default());
    let overrides = ResolverConfig::default().overrides_path(dir.path());
    assert!(overrides.exists());
    assert!(load_overrides(&overrides).unwrap().is_empty());
}

#[test]
fn test_init_project_keeps_existing_config_unless_forced() {
    let dir = TempDir::new().unwrap();
    let custom = ResolverConfig {
        fetch_timeout_secs: 5,
        ..ResolverConfig::default()
    };
    save_config(dir.path(), &custom).unwrap();
    let overrides = custom.overrides_path(dir.path());
    std::fs::write(&overrides, "[[override]]\npattern = \"^a/b$\"\nurl = \"https://x\"\n").unwrap();

    let err = init_project(dir.path(), false).unwrap_err();
    assert!(matches!(err, ResolveError::Config { .. }));
    assert_eq!(load_config(dir.path()).unwrap(), custom);

    init_project(dir.path(), true).unwrap();
    assert_eq!(load_config(dir.path()).unwrap(), ResolverConfig::default());
    assert_eq!(load_overrides(&overrides).unwrap().len(), 1, "override table is never replaced");
}
