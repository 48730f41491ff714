use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{ResolveError, Result};
use crate::overrides::OverrideTable;
use crate::types::ArtifactRepository;

/// Name of the configuration file stored inside the `.depresolve` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the override table file stored inside the `.depresolve` directory.
pub const OVERRIDES_FILENAME: &str = "overrides.toml";

/// Name of the hidden directory holding resolver settings.
pub const DEPRESOLVE_DIR: &str = ".depresolve";

/// Public repository that is always tried before any configured one.
pub const MAVEN_CENTRAL_URL: &str = "https://repo1.maven.org/maven2/";

/// Configuration for dependency and origin resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Base URL of the central repository, prepended to `repositories`.
    pub central_url: String,
    /// Additional artifact repositories, tried in order after central.
    pub repositories: Vec<ArtifactRepository>,
    /// Upper bound for a single POM download, in seconds.
    pub fetch_timeout_secs: u64,
    /// Override table location; relative paths are taken from the project
    /// root. Defaults to `.depresolve/overrides.toml`.
    pub overrides_file: Option<String>,
    /// Extra Maven-layout repositories to map archives back to coordinates.
    pub local_repositories: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            version: 1,
            central_url: MAVEN_CENTRAL_URL.to_string(),
            repositories: Vec::new(),
            fetch_timeout_secs: 30,
            overrides_file: None,
            local_repositories: Vec::new(),
        }
    }
}

impl ResolverConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Central first, then the configured repositories in order.
    pub fn candidate_repositories(&self) -> Vec<ArtifactRepository> {
        let mut candidates = Vec::with_capacity(self.repositories.len() + 1);
        candidates.push(ArtifactRepository::new("central", &self.central_url));
        candidates.extend(self.repositories.iter().cloned());
        candidates
    }

    /// Maven-layout roots: the configured ones, then `~/.m2/repository`.
    pub fn local_repository_roots(&self, project_root: &Path) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = self
            .local_repositories
            .iter()
            .map(|r| project_root.join(r))
            .collect();
        if let Some(home) = dirs::home_dir() {
            roots.push(home.join(".m2").join("repository"));
        }
        roots
    }

    /// Resolves the override table location against `project_root`.
    pub fn overrides_path(&self, project_root: &Path) -> PathBuf {
        match &self.overrides_file {
            Some(file) => project_root.join(file),
            None => get_depresolve_dir(project_root).join(OVERRIDES_FILENAME),
        }
    }
}

/// Returns the path to the `.depresolve` directory within the given project root.
pub fn get_depresolve_dir(project_root: &Path) -> PathBuf {
    project_root.join(DEPRESOLVE_DIR)
}

/// Returns the path to the configuration file (`config.json`) within the `.depresolve` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_depresolve_dir(project_root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns the default configuration.
pub fn load_config(project_root: &Path) -> Result<ResolverConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(ResolverConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| ResolveError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: ResolverConfig =
        serde_json::from_str(&contents).map_err(|e| ResolveError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;

    Ok(config)
}

/// Starter override table written by [`init_project`].
const OVERRIDES_TEMPLATE: &str = r##"# Clone URL overrides, matched against "<groupId>/<artifactId>".
# The first matching pattern wins. Use ${1} rather than $1 when a capture
# group is followed by text.
#
# [[override]]
# pattern = "^org\\.example/(.*)$"
# url = "https://github.com/example/${1}"
"##;

/// Saves the configuration to `.depresolve/config.json`.
pub fn save_config(project_root: &Path, config: &ResolverConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config).map_err(|e| ResolveError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;
    write_atomic(&get_config_path(project_root), &json)
}

/// Writes a default configuration and a commented override table into
/// `.depresolve/`, returning the configuration path.
///
/// An existing configuration is kept unless `force` is set. An existing
/// override table is never replaced.
pub fn init_project(project_root: &Path, force: bool) -> Result<PathBuf> {
    let config_path = get_config_path(project_root);
    if config_path.exists() && !force {
        return Err(ResolveError::Config {
            message: format!(
                "'{}' already exists; pass --force to overwrite it",
                config_path.display()
            ),
        });
    }
    let config = ResolverConfig::default();
    save_config(project_root, &config)?;

    let overrides_path = config.overrides_path(project_root);
    if !overrides_path.exists() {
        write_atomic(&overrides_path, OVERRIDES_TEMPLATE)?;
    }
    Ok(config_path)
}

/// Writes `contents` next to `path` and renames it into place, creating the
/// parent directory first.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ResolveError::Config {
            message: format!("failed to create directory '{}': {}", parent.display(), e),
        })?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)
        .and_then(|()| fs::rename(&tmp_path, path))
        .map_err(|e| ResolveError::Config {
            message: format!("failed to write '{}': {}", path.display(), e),
        })
}

#[derive(Debug, Deserialize)]
struct OverridesFile {
    #[serde(default, rename = "override")]
    rules: Vec<OverrideRule>,
}

#[derive(Debug, Deserialize)]
struct OverrideRule {
    pattern: String,
    url: String,
}

/// Parses an override table from TOML:
///
/// ```toml
/// [[override]]
/// pattern = "^org\\.example/.*$"
/// url = "https://github.com/example/$0"
/// ```
///
/// Rules keep their file order.
pub fn parse_overrides(contents: &str) -> Result<OverrideTable> {
    let file: OverridesFile = toml::from_str(contents).map_err(|e| ResolveError::Config {
        message: format!("failed to parse override table: {}", e),
    })?;
    OverrideTable::from_pairs(file.rules.into_iter().map(|r| (r.pattern, r.url)))
}

/// Loads the override table from `path`. A missing file yields an empty table.
pub fn load_overrides(path: &Path) -> Result<OverrideTable> {
    if !path.exists() {
        return Ok(OverrideTable::new());
    }
    let contents = fs::read_to_string(path).map_err(|e| ResolveError::Config {
        message: format!("failed to read override table '{}': {}", path.display(), e),
    })?;
    parse_overrides(&contents)
}
